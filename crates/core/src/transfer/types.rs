//! Types shared by asset transfer implementations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Multipart field carrying the file.
pub const UPLOAD_FIELD: &str = "file";

/// Filename sent with every upload.
pub const UPLOAD_FILENAME: &str = "image.png";

/// Project credentials for the metadata service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeys {
    /// Sent as `X-Access-Key`.
    pub project_access_key: String,
    /// Sent as `Authorization: Bearer`.
    pub jwt_access_key: String,
}

impl AccessKeys {
    pub fn new(project_access_key: impl Into<String>, jwt_access_key: impl Into<String>) -> Self {
        Self {
            project_access_key: project_access_key.into(),
            jwt_access_key: jwt_access_key.into(),
        }
    }
}

impl std::fmt::Debug for AccessKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeys")
            .field("project_access_key", &"<redacted>")
            .field("jwt_access_key", &"<redacted>")
            .finish()
    }
}

/// Where an uploaded file lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTarget {
    pub project_id: u64,
    pub collection_id: u64,
    pub asset_id: u64,
    pub token_id: String,
}

/// Result of the upload half of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// The service accepted the file; its JSON reply is kept as-is.
    Uploaded { response: Value },
    /// The upload was attempted and failed.
    Failed { reason: String },
}

impl UploadOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }
}
