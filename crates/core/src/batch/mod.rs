//! Batch orchestration for the two-phase mint/reveal workflow.
//!
//! - **Placeholder mint**: create token → create image slot → upload
//!   placeholder artwork → finalize token, for each of up to 500 items.
//! - **Reveal**: list the collection, keep tokens with an image slot, then
//!   upload fresh artwork and rewrite name/description/attributes.
//!
//! Items are independent: a failure is recorded in that item's
//! [`ItemResult`] and never stops its siblings.

mod config;
mod runner;
mod types;

pub use config::BatchConfig;
pub use runner::BatchOrchestrator;
pub use types::{
    BatchError, BatchReport, BatchRequest, ItemResult, ItemStage, RevealRequest, ValidationError,
    MAX_BATCH_SIZE,
};
pub use crate::transfer::AccessKeys;
