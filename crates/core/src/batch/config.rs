//! Batch orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for batch runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Items processed at once (0 = all items of the batch at once).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_items: usize,

    /// Token id of the first minted item.
    #[serde(default)]
    pub start_token_id: u64,

    /// Page size of the listing that seeds a reveal.
    #[serde(default = "default_page_size")]
    pub list_page_size: u32,

    /// Fail an item when its artwork upload fails instead of recording the
    /// failed upload on an otherwise finalized token.
    #[serde(default)]
    pub strict_uploads: bool,
}

fn default_max_concurrent() -> usize {
    16
}

fn default_page_size() -> u32 {
    10_000
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_items: default_max_concurrent(),
            start_token_id: 0,
            list_page_size: default_page_size(),
            strict_uploads: false,
        }
    }
}

impl BatchConfig {
    /// Sets the concurrency limit.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent_items = max;
        self
    }

    /// Sets the first token id.
    pub fn with_start_token_id(mut self, start: u64) -> Self {
        self.start_token_id = start;
        self
    }

    /// Escalates upload failures to item failures.
    pub fn with_strict_uploads(mut self, strict: bool) -> Self {
        self.strict_uploads = strict;
        self
    }

    /// Effective concurrency for a batch of `items`.
    pub(crate) fn concurrency_for(&self, items: usize) -> usize {
        match self.max_concurrent_items {
            0 => items.max(1),
            max => max,
        }
    }
}
