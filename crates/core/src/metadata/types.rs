//! Metadata record types.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Attributes folded into one mapping, as persisted on a token.
pub type AttributeMap = BTreeMap<String, u32>;

/// One named numeric trait.
///
/// On the wire this is a single-key object such as `{"sharpness": 100}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    pub name: String,
    pub value: u32,
}

impl AttributeRecord {
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Serialize for AttributeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, u32>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(D::Error::custom(format!(
                "attribute record must have exactly one key, found {}",
                map.len()
            )));
        }
        let (name, value) = map
            .into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("empty attribute record"))?;
        Ok(Self { name, value })
    }
}

/// Metadata for one token, before it is sent to the collection service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub name: String,
    pub description: String,
    /// Source artwork URL.
    pub image: String,
    /// Ordered attributes; keys are pairwise distinct.
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}
