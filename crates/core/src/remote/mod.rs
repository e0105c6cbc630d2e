//! Remote collection service.
//!
//! The batch pipeline only depends on the [`CollectionClient`] trait, which
//! covers the five operations it consumes. [`HttpCollectionClient`] talks to
//! the hosted metadata service; tests substitute
//! [`crate::testing::MockCollectionClient`].

mod http;
mod types;

pub use http::{HttpCollectionClient, DEFAULT_METADATA_HOST};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by the collection service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Token or collection does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Service returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Token and asset CRUD on the collection service.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Create a token in a collection.
    async fn create_token(
        &self,
        request: CreateTokenRequest,
    ) -> Result<CreateTokenResponse, RemoteError>;

    /// Create an asset slot bound to a token field.
    async fn create_asset(
        &self,
        request: CreateAssetRequest,
    ) -> Result<CreateAssetResponse, RemoteError>;

    /// Replace a token's metadata.
    async fn update_token(
        &self,
        request: UpdateTokenRequest,
    ) -> Result<UpdateTokenResponse, RemoteError>;

    /// List tokens of a collection, one page at a time.
    async fn list_tokens(
        &self,
        request: ListTokensRequest,
    ) -> Result<ListTokensResponse, RemoteError>;

    /// Fetch one token together with its asset slots.
    async fn get_token(&self, request: GetTokenRequest) -> Result<TokenDetail, RemoteError>;
}
