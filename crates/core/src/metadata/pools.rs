//! Fixed phrase, trait and artwork pools.

/// Name given to every placeholder token.
pub const PLACEHOLDER_NAME: &str = "Chest";

/// Description given to every placeholder token.
pub const PLACEHOLDER_DESCRIPTION: &str = "Placeholder NFT";

/// Artwork shown for a token until it is revealed.
pub const PLACEHOLDER_IMAGE: &str =
    "https://res.cloudinary.com/richardiral/image/upload/v1727980612/chestimage.png";

/// Artwork a revealed token may receive.
pub const ARTWORK_URLS: [&str; 2] = [
    "https://metadata.sequence.app/projects/30957/collections/690/tokens/0/image.png",
    "https://metadata.sequence.app/projects/30957/collections/690/tokens/1/image.png",
];

/// Recognized trait names.
pub const ATTRIBUTE_NAMES: [&str; 10] = [
    "sharpness",
    "weight",
    "balance",
    "durability",
    "magic",
    "attackPower",
    "elementalAffinity",
    "edgeRetention",
    "speed",
    "criticalHitChance",
];

/// Smallest value an attribute can take.
pub const ATTRIBUTE_VALUE_MIN: u32 = 1;

/// Largest value an attribute can take.
pub const ATTRIBUTE_VALUE_MAX: u32 = 1500;

pub(crate) const ADJECTIVES: [&str; 7] = [
    "mighty",
    "ancient",
    "powerful",
    "enchanted",
    "cursed",
    "legendary",
    "forgotten",
];

pub(crate) const ORIGINS: [&str; 5] = [
    "forged in the fires of a dying star",
    "blessed by ancient gods",
    "crafted by the hands of giants",
    "lost in the void of time",
    "imbued with the souls of fallen warriors",
];

pub(crate) const POWERS: [&str; 5] = [
    "capable of shattering mountains",
    "that cleaves through space and time",
    "which never dulls",
    "with the power to summon storms",
    "that grows stronger with every battle",
];

/// Upper bound (exclusive) of the numeric suffix in a revealed name.
pub(crate) const IDENTIFIER_SPACE: usize = 1000;

/// Asset ids are 10-digit positive integers.
pub(crate) const ASSET_ID_MIN: u64 = 1_000_000_000;
pub(crate) const ASSET_ID_MAX: u64 = 9_999_999_999;
