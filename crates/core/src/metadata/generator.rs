//! Placeholder and revealed metadata generation.

use super::pools::{
    ADJECTIVES, ARTWORK_URLS, ASSET_ID_MAX, ASSET_ID_MIN, ATTRIBUTE_NAMES, ATTRIBUTE_VALUE_MAX,
    ATTRIBUTE_VALUE_MIN, IDENTIFIER_SPACE, ORIGINS, PLACEHOLDER_DESCRIPTION, PLACEHOLDER_IMAGE,
    PLACEHOLDER_NAME, POWERS,
};
use super::random::{RandomSource, StdRandom};
use super::types::{AttributeMap, AttributeRecord, ItemMetadata};
use super::MetadataError;

/// Number of attributes every revealed item carries.
pub const REVEALED_ATTRIBUTE_COUNT: usize = 4;

/// Produces metadata records from the fixed pools and an injected
/// random source.
pub struct MetadataGenerator {
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for MetadataGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataGenerator").finish_non_exhaustive()
    }
}

impl Default for MetadataGenerator {
    fn default() -> Self {
        Self::new(StdRandom::from_entropy())
    }
}

impl MetadataGenerator {
    pub fn new(rng: impl RandomSource + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// `"Divine Axe #DDD"` with a zero-padded suffix in `000..=999`.
    pub fn generate_identifier(&mut self) -> String {
        let suffix = self.rng.pick_index(IDENTIFIER_SPACE);
        format!("Divine Axe #{:03}", suffix)
    }

    /// One-sentence flavour text built from three independent draws.
    pub fn generate_narrative(&mut self) -> String {
        let adjective = ADJECTIVES[self.rng.pick_index(ADJECTIVES.len())];
        let origin = ORIGINS[self.rng.pick_index(ORIGINS.len())];
        let power = POWERS[self.rng.pick_index(POWERS.len())];
        format!("This {} axe, {}, {}.", adjective, origin, power)
    }

    /// Draws `count` distinct trait names without replacement, each with a
    /// value in `1..=1500`.
    pub fn generate_attribute_set(
        &mut self,
        count: usize,
    ) -> Result<Vec<AttributeRecord>, MetadataError> {
        if count > ATTRIBUTE_NAMES.len() {
            return Err(MetadataError::AttributesExhausted {
                requested: count,
                available: ATTRIBUTE_NAMES.len(),
            });
        }

        Ok(self.draw_attributes(count))
    }

    fn draw_attributes(&mut self, count: usize) -> Vec<AttributeRecord> {
        let mut available: Vec<&str> = ATTRIBUTE_NAMES.to_vec();
        let mut attributes = Vec::with_capacity(count);

        while attributes.len() < count && !available.is_empty() {
            let name = available.remove(self.rng.pick_index(available.len()));
            let value = self
                .rng
                .int_inclusive(ATTRIBUTE_VALUE_MIN as u64, ATTRIBUTE_VALUE_MAX as u64)
                as u32;
            attributes.push(AttributeRecord::new(name, value));
        }

        attributes
    }

    /// Picks one of the revealed artwork URLs.
    pub fn select_random_artwork(&mut self) -> &'static str {
        ARTWORK_URLS[self.rng.pick_index(ARTWORK_URLS.len())]
    }

    /// Identifier for a freshly created asset slot.
    pub fn generate_asset_id(&mut self) -> u64 {
        self.rng.int_inclusive(ASSET_ID_MIN, ASSET_ID_MAX)
    }

    /// `count` independent revealed records.
    pub fn generate_revealed_batch(&mut self, count: usize) -> Vec<ItemMetadata> {
        (0..count).map(|_| self.generate_revealed_item()).collect()
    }

    fn generate_revealed_item(&mut self) -> ItemMetadata {
        let name = self.generate_identifier();
        let description = self.generate_narrative();
        let image = self.select_random_artwork().to_string();
        let attributes = self.draw_attributes(REVEALED_ATTRIBUTE_COUNT);

        ItemMetadata {
            name,
            description,
            image,
            attributes,
        }
    }

    /// `count` identical placeholder records.
    pub fn generate_placeholder_batch(&self, count: usize) -> Vec<ItemMetadata> {
        let placeholder = ItemMetadata {
            name: PLACEHOLDER_NAME.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            attributes: Vec::new(),
        };
        vec![placeholder; count]
    }
}

/// Folds an attribute sequence into one mapping, later entries winning.
///
/// Returns `None` for an empty sequence: there is nothing to persist, which
/// is not the same as persisting an empty mapping.
pub fn merge_attribute_sequence(attributes: &[AttributeRecord]) -> Option<AttributeMap> {
    if attributes.is_empty() {
        return None;
    }

    Some(
        attributes
            .iter()
            .map(|attribute| (attribute.name.clone(), attribute.value))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedRandom, SequenceRandom};
    use std::collections::HashSet;

    fn seeded() -> MetadataGenerator {
        MetadataGenerator::new(StdRandom::seeded(1234))
    }

    #[test]
    fn test_identifier_with_fixed_draw() {
        let mut generator = MetadataGenerator::new(FixedRandom(0.005));
        assert_eq!(generator.generate_identifier(), "Divine Axe #005");
    }

    #[test]
    fn test_identifier_format() {
        let pattern = regex_lite::Regex::new(r"^Divine Axe #\d{3}$").unwrap();
        let mut generator = seeded();
        for _ in 0..200 {
            let name = generator.generate_identifier();
            assert!(pattern.is_match(&name), "unexpected name: {}", name);
        }
    }

    #[test]
    fn test_identifier_extremes() {
        assert_eq!(
            MetadataGenerator::new(FixedRandom(0.0)).generate_identifier(),
            "Divine Axe #000"
        );
        assert_eq!(
            MetadataGenerator::new(FixedRandom(0.9999)).generate_identifier(),
            "Divine Axe #999"
        );
    }

    #[test]
    fn test_narrative_uses_each_pool() {
        let mut generator = MetadataGenerator::new(SequenceRandom::new(vec![0.0, 0.5, 0.99]));
        assert_eq!(
            generator.generate_narrative(),
            "This mighty axe, crafted by the hands of giants, that grows stronger with every battle."
        );
    }

    #[test]
    fn test_narrative_structure() {
        let mut generator = seeded();
        for _ in 0..50 {
            let narrative = generator.generate_narrative();
            assert!(narrative.starts_with("This "));
            assert!(narrative.ends_with('.'));
            assert!(ADJECTIVES.iter().any(|a| narrative.contains(a)));
            assert!(ORIGINS.iter().any(|o| narrative.contains(o)));
            assert!(POWERS.iter().any(|p| narrative.contains(p)));
        }
    }

    #[test]
    fn test_attribute_set_distinct_keys_for_every_size() {
        let mut generator = seeded();
        for count in 1..=ATTRIBUTE_NAMES.len() {
            let attributes = generator.generate_attribute_set(count).unwrap();
            assert_eq!(attributes.len(), count);

            let names: HashSet<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
            assert_eq!(names.len(), count);
            assert!(names.iter().all(|n| ATTRIBUTE_NAMES.contains(n)));
            assert!(attributes
                .iter()
                .all(|a| (ATTRIBUTE_VALUE_MIN..=ATTRIBUTE_VALUE_MAX).contains(&a.value)));
        }
    }

    #[test]
    fn test_attribute_set_full_pool_with_constant_draw() {
        // A constant draw always takes the first remaining name.
        let mut generator = MetadataGenerator::new(FixedRandom(0.0));
        let attributes = generator.generate_attribute_set(10).unwrap();
        let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ATTRIBUTE_NAMES.to_vec());
        assert!(attributes.iter().all(|a| a.value == 1));
    }

    #[test]
    fn test_attribute_set_exceeding_pool_fails() {
        let mut generator = seeded();
        let err = generator.generate_attribute_set(20).unwrap_err();
        assert_eq!(
            err,
            MetadataError::AttributesExhausted {
                requested: 20,
                available: 10
            }
        );
        assert!(err
            .to_string()
            .starts_with("Requested attributes exceed available options"));
    }

    #[test]
    fn test_attribute_set_empty() {
        assert!(seeded().generate_attribute_set(0).unwrap().is_empty());
    }

    #[test]
    fn test_select_random_artwork() {
        assert_eq!(
            MetadataGenerator::new(FixedRandom(0.2)).select_random_artwork(),
            ARTWORK_URLS[0]
        );
        assert_eq!(
            MetadataGenerator::new(FixedRandom(0.7)).select_random_artwork(),
            ARTWORK_URLS[1]
        );
    }

    #[test]
    fn test_asset_id_has_ten_digits() {
        let mut generator = seeded();
        for _ in 0..100 {
            assert_eq!(generator.generate_asset_id().to_string().len(), 10);
        }
    }

    #[test]
    fn test_revealed_batch() {
        let items = seeded().generate_revealed_batch(5);
        assert_eq!(items.len(), 5);
        for item in &items {
            assert_eq!(item.attributes.len(), REVEALED_ATTRIBUTE_COUNT);
            assert!(ARTWORK_URLS.contains(&item.image.as_str()));
            assert!(item.name.starts_with("Divine Axe #"));
        }
    }

    #[test]
    fn test_revealed_batch_zero() {
        assert!(seeded().generate_revealed_batch(0).is_empty());
    }

    #[test]
    fn test_placeholder_batch() {
        let items = seeded().generate_placeholder_batch(5);
        assert_eq!(items.len(), 5);
        for item in &items {
            assert_eq!(item.name, "Chest");
            assert_eq!(item.description, "Placeholder NFT");
            assert_eq!(item.image, PLACEHOLDER_IMAGE);
            assert!(item.attributes.is_empty());
        }
        assert!(items.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_merge_empty_is_none() {
        assert_eq!(merge_attribute_sequence(&[]), None);
    }

    #[test]
    fn test_merge_later_entries_win() {
        let merged = merge_attribute_sequence(&[
            AttributeRecord::new("sharpness", 100),
            AttributeRecord::new("sharpness", 200),
        ])
        .unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["sharpness"], 200);
    }

    #[test]
    fn test_merge_keeps_distinct_keys() {
        let merged = merge_attribute_sequence(&[
            AttributeRecord::new("speed", 3),
            AttributeRecord::new("magic", 9),
        ])
        .unwrap();
        assert_eq!(merged.get("speed"), Some(&3));
        assert_eq!(merged.get("magic"), Some(&9));
    }
}
