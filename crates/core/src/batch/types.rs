//! Types for the batch orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::remote::{RemoteError, TokenRecord};
use crate::transfer::{AccessKeys, TransferError, UploadOutcome};

/// Largest number of items one batch may touch.
pub const MAX_BATCH_SIZE: u32 = 500;

/// Rejections raised before a batch starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantity outside `1..=MAX_BATCH_SIZE`.
    #[error("Invalid batch size {quantity}: send between 1 and {max} items")]
    QuantityOutOfRange { quantity: u32, max: u32 },

    /// An identity field or key is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Reveal found more eligible tokens than one batch may update.
    #[error("{eligible} tokens are eligible for reveal; at most {max} can be updated per batch")]
    TooManyEligible { eligible: usize, max: u32 },
}

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The collection listing that seeds a reveal failed.
    #[error("collection service error: {0}")]
    Remote(#[from] RemoteError),
}

/// Failure of a single item; never escapes the item's task.
#[derive(Debug, Error)]
pub(crate) enum ItemError {
    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    Transfer(#[from] TransferError),

    /// Upload failure escalated by `strict_uploads`.
    #[error("asset upload failed: {0}")]
    Upload(String),
}

fn check_identity(
    project_id: u64,
    collection_id: u64,
    keys: &AccessKeys,
) -> Result<(), ValidationError> {
    if project_id == 0 {
        return Err(ValidationError::MissingField("project_id"));
    }
    if collection_id == 0 {
        return Err(ValidationError::MissingField("collection_id"));
    }
    if keys.jwt_access_key.trim().is_empty() {
        return Err(ValidationError::MissingField("jwt_access_key"));
    }
    if keys.project_access_key.trim().is_empty() {
        return Err(ValidationError::MissingField("project_access_key"));
    }
    Ok(())
}

/// Input for a placeholder mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub quantity: u32,
    pub collection_id: u64,
    pub project_id: u64,
    pub keys: AccessKeys,
}

impl BatchRequest {
    /// Checks everything that can be checked without the network.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity == 0 || self.quantity > MAX_BATCH_SIZE {
            return Err(ValidationError::QuantityOutOfRange {
                quantity: self.quantity,
                max: MAX_BATCH_SIZE,
            });
        }
        check_identity(self.project_id, self.collection_id, &self.keys)
    }
}

/// Input for a reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealRequest {
    pub collection_id: u64,
    pub project_id: u64,
    pub keys: AccessKeys,
}

impl RevealRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_identity(self.project_id, self.collection_id, &self.keys)
    }
}

/// Progress of one item through its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStage {
    Pending,
    TokenReady,
    AssetSlotReady,
    ArtworkTransferred,
    MetadataFinalized,
}

impl std::fmt::Display for ItemStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::TokenReady => "token_ready",
            Self::AssetSlotReady => "asset_slot_ready",
            Self::ArtworkTransferred => "artwork_transferred",
            Self::MetadataFinalized => "metadata_finalized",
        };
        f.write_str(name)
    }
}

/// Outcome of one batch position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ItemResult {
    Success {
        token_id: String,
        token: TokenRecord,
        upload: UploadOutcome,
    },
    Failed {
        token_id: String,
        /// Last stage the item reached.
        stage: ItemStage,
        error: String,
    },
}

impl ItemResult {
    pub fn token_id(&self) -> &str {
        match self {
            Self::Success { token_id, .. } | Self::Failed { token_id, .. } => token_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Process-level output of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub message: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: usize,
    pub failed: usize,
    pub metadata_statuses: Vec<ItemResult>,
}

impl BatchReport {
    pub(crate) fn new(
        batch_id: Uuid,
        message: impl Into<String>,
        started_at: DateTime<Utc>,
        metadata_statuses: Vec<ItemResult>,
    ) -> Self {
        let succeeded = metadata_statuses.iter().filter(|r| r.is_success()).count();
        Self {
            batch_id,
            message: message.into(),
            status: "success".to_string(),
            started_at,
            finished_at: Utc::now(),
            succeeded,
            failed: metadata_statuses.len() - succeeded,
            metadata_statuses,
        }
    }
}
