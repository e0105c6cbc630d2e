//! Artwork transfer into remote asset slots.
//!
//! A transfer has two halves with different failure policies:
//! - reading the source artwork is a hard failure ([`TransferError`]) that
//!   aborts the owning item;
//! - the upload itself is soft: it resolves to [`UploadOutcome::Failed`] so
//!   the item can still be finalized.

mod http;
mod types;

pub use http::HttpAssetTransferer;
pub use types::{AccessKeys, AssetTarget, UploadOutcome, UPLOAD_FIELD, UPLOAD_FILENAME};

use async_trait::async_trait;
use thiserror::Error;

/// Hard failures of an asset transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The source artwork could not be read.
    #[error("Failed to fetch file from {url}: {status}")]
    Fetch { url: String, status: String },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl TransferError {
    pub fn fetch(url: impl Into<String>, status: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            status: status.into(),
        }
    }
}

/// Copies a source image into a token's asset slot.
#[async_trait]
pub trait AssetTransferer: Send + Sync {
    /// Fetch `source_url` and upload it into `target`.
    async fn transfer_asset(
        &self,
        source_url: &str,
        target: &AssetTarget,
        keys: &AccessKeys,
    ) -> Result<UploadOutcome, TransferError>;
}
