//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits
//! and deterministic random sources, so batch pipelines can be exercised
//! without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokensmith_core::testing::{fixtures, MockAssetTransferer, MockCollectionClient};
//!
//! let client = MockCollectionClient::new();
//! let transferer = MockAssetTransferer::new();
//!
//! // Make token 2's artwork unreachable
//! transferer.fail_fetch_for("2").await;
//!
//! // Run a batch, then inspect what was called...
//! ```

mod mock_asset_transferer;
mod mock_collection_client;
mod random;

pub use mock_asset_transferer::{MockAssetTransferer, RecordedTransfer};
pub use mock_collection_client::{MockCollectionClient, MockOperation, RecordedCall};
pub use random::{FixedRandom, SequenceRandom};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::batch::{BatchRequest, RevealRequest};
    use crate::remote::{Asset, TokenDetail, TokenRecord, IMAGE_FIELD};
    use crate::transfer::AccessKeys;

    /// Project used by fixtures.
    pub const PROJECT_ID: u64 = 30957;

    /// Collection used by fixtures.
    pub const COLLECTION_ID: u64 = 892189;

    /// Credentials with recognizable values.
    pub fn access_keys() -> AccessKeys {
        AccessKeys::new("test-access-key", "test-jwt-key")
    }

    /// A valid placeholder-mint request.
    pub fn batch_request(quantity: u32) -> BatchRequest {
        BatchRequest {
            quantity,
            collection_id: COLLECTION_ID,
            project_id: PROJECT_ID,
            keys: access_keys(),
        }
    }

    /// A valid reveal request.
    pub fn reveal_request() -> RevealRequest {
        RevealRequest {
            collection_id: COLLECTION_ID,
            project_id: PROJECT_ID,
            keys: access_keys(),
        }
    }

    /// A minted placeholder token, optionally with an `image` slot.
    pub fn placeholder_token(token_id: &str, with_image: bool) -> TokenDetail {
        let assets = if with_image {
            vec![Asset {
                id: 1_000_000_000 + token_id.parse::<u64>().unwrap_or(0),
                collection_id: COLLECTION_ID,
                token_id: Some(token_id.to_string()),
                metadata_field: IMAGE_FIELD.to_string(),
                ..Default::default()
            }]
        } else {
            Vec::new()
        };

        TokenDetail {
            token: TokenRecord {
                token_id: token_id.to_string(),
                name: "Chest".to_string(),
                description: Some("Placeholder NFT".to_string()),
                decimals: Some(0),
                ..Default::default()
            },
            assets,
        }
    }
}
