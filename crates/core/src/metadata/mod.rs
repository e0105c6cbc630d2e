//! Metadata generation for placeholder and revealed tokens.
//!
//! Everything in this module is pure: randomness comes from an injected
//! [`RandomSource`], so a generator seeded with a fixed source produces
//! the same records every time.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokensmith_core::metadata::{MetadataGenerator, StdRandom};
//!
//! let mut generator = MetadataGenerator::new(StdRandom::seeded(7));
//! let items = generator.generate_revealed_batch(10);
//! assert!(items.iter().all(|item| item.attributes.len() == 4));
//! ```

mod generator;
mod pools;
mod random;
mod types;

pub use generator::{merge_attribute_sequence, MetadataGenerator, REVEALED_ATTRIBUTE_COUNT};
pub use pools::{
    ARTWORK_URLS, ATTRIBUTE_NAMES, ATTRIBUTE_VALUE_MAX, ATTRIBUTE_VALUE_MIN, PLACEHOLDER_DESCRIPTION,
    PLACEHOLDER_IMAGE, PLACEHOLDER_NAME,
};
pub use random::{RandomSource, StdRandom};
pub use types::{AttributeMap, AttributeRecord, ItemMetadata};

use thiserror::Error;

/// Errors raised while generating metadata.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// More distinct attributes were requested than the pool holds.
    #[error("Requested attributes exceed available options ({requested} > {available})")]
    AttributesExhausted { requested: usize, available: usize },
}
