//! Mock collection service for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::remote::{
    CollectionClient, CreateAssetRequest, CreateAssetResponse, CreateTokenRequest,
    CreateTokenResponse, GetTokenRequest, ListTokensRequest, ListTokensResponse, RemoteError,
    TokenDetail, UpdateTokenRequest, UpdateTokenResponse,
};

/// Per-token operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    CreateToken,
    CreateAsset,
    UpdateToken,
    GetToken,
}

/// A recorded service call for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    CreateToken(CreateTokenRequest),
    CreateAsset(CreateAssetRequest),
    UpdateToken(UpdateTokenRequest),
    ListTokens(ListTokensRequest),
    GetToken(GetTokenRequest),
}

impl RecordedCall {
    pub fn operation(&self) -> Option<MockOperation> {
        match self {
            Self::CreateToken(_) => Some(MockOperation::CreateToken),
            Self::CreateAsset(_) => Some(MockOperation::CreateAsset),
            Self::UpdateToken(_) => Some(MockOperation::UpdateToken),
            Self::GetToken(_) => Some(MockOperation::GetToken),
            Self::ListTokens(_) => None,
        }
    }
}

/// In-memory implementation of the CollectionClient trait.
///
/// Provides controllable behavior for testing:
/// - Tokens and asset slots live in memory, in creation order
/// - Every call is recorded for assertions
/// - Failures can be injected per operation and token
///
/// # Example
///
/// ```rust,ignore
/// use tokensmith_core::testing::{fixtures, MockCollectionClient, MockOperation};
///
/// let client = MockCollectionClient::new();
/// client.add_token(fixtures::placeholder_token("0", true)).await;
/// client.fail_on(MockOperation::UpdateToken, "0", "conflict").await;
/// ```
#[derive(Debug)]
pub struct MockCollectionClient {
    /// Tokens in listing order.
    tokens: Arc<RwLock<Vec<TokenDetail>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    /// Injected failures keyed by operation and token id.
    failures: Arc<RwLock<HashMap<(MockOperation, String), String>>>,
    /// If set, listing fails with this message.
    list_failure: Arc<RwLock<Option<String>>>,
}

impl Default for MockCollectionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCollectionClient {
    /// Create an empty mock collection.
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            list_failure: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Collection contents
    // =========================================================================

    /// Add an existing token.
    pub async fn add_token(&self, detail: TokenDetail) {
        self.tokens.write().await.push(detail);
    }

    /// Add several existing tokens.
    pub async fn add_tokens(&self, details: impl IntoIterator<Item = TokenDetail>) {
        self.tokens.write().await.extend(details);
    }

    /// Current state of a token.
    pub async fn token(&self, token_id: &str) -> Option<TokenDetail> {
        self.tokens
            .read()
            .await
            .iter()
            .find(|detail| detail.token.token_id == token_id)
            .cloned()
    }

    /// Number of tokens in the collection.
    pub async fn token_count(&self) -> usize {
        self.tokens.read().await.len()
    }

    // =========================================================================
    // Call recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Total number of calls made.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Number of calls made for one operation.
    pub async fn calls_for(&self, operation: MockOperation) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| call.operation() == Some(operation))
            .count()
    }

    /// Recorded token updates, in call order.
    pub async fn recorded_updates(&self) -> Vec<UpdateTokenRequest> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|call| match call {
                RecordedCall::UpdateToken(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Error injection
    // =========================================================================

    /// Make `operation` fail for `token_id`.
    pub async fn fail_on(&self, operation: MockOperation, token_id: &str, message: &str) {
        self.failures
            .write()
            .await
            .insert((operation, token_id.to_string()), message.to_string());
    }

    /// Make the collection listing fail.
    pub async fn fail_listing(&self, message: &str) {
        *self.list_failure.write().await = Some(message.to_string());
    }

    /// Clear all injected failures.
    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
        *self.list_failure.write().await = None;
    }

    async fn record(&self, call: RecordedCall) {
        self.calls.write().await.push(call);
    }

    async fn injected(&self, operation: MockOperation, token_id: &str) -> Result<(), RemoteError> {
        match self
            .failures
            .read()
            .await
            .get(&(operation, token_id.to_string()))
        {
            Some(message) => Err(RemoteError::ApiError {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollectionClient for MockCollectionClient {
    async fn create_token(
        &self,
        request: CreateTokenRequest,
    ) -> Result<CreateTokenResponse, RemoteError> {
        self.record(RecordedCall::CreateToken(request.clone())).await;
        self.injected(MockOperation::CreateToken, &request.token.token_id)
            .await?;

        let mut tokens = self.tokens.write().await;
        if tokens
            .iter()
            .any(|detail| detail.token.token_id == request.token.token_id)
        {
            return Err(RemoteError::ApiError {
                status: 409,
                message: format!("token {} already exists", request.token.token_id),
            });
        }
        tokens.push(TokenDetail {
            token: request.token.clone(),
            assets: Vec::new(),
        });

        Ok(CreateTokenResponse {
            token: request.token,
            assets: Vec::new(),
        })
    }

    async fn create_asset(
        &self,
        request: CreateAssetRequest,
    ) -> Result<CreateAssetResponse, RemoteError> {
        self.record(RecordedCall::CreateAsset(request.clone())).await;
        let token_id = request.asset.token_id.clone().unwrap_or_default();
        self.injected(MockOperation::CreateAsset, &token_id).await?;

        let mut tokens = self.tokens.write().await;
        let detail = tokens
            .iter_mut()
            .find(|detail| detail.token.token_id == token_id)
            .ok_or_else(|| RemoteError::NotFound(format!("token {}", token_id)))?;
        detail.assets.push(request.asset.clone());

        Ok(CreateAssetResponse {
            asset: request.asset,
        })
    }

    async fn update_token(
        &self,
        request: UpdateTokenRequest,
    ) -> Result<UpdateTokenResponse, RemoteError> {
        self.record(RecordedCall::UpdateToken(request.clone())).await;
        self.injected(MockOperation::UpdateToken, &request.token_id)
            .await?;

        let mut tokens = self.tokens.write().await;
        let detail = tokens
            .iter_mut()
            .find(|detail| detail.token.token_id == request.token_id)
            .ok_or_else(|| RemoteError::NotFound(format!("token {}", request.token_id)))?;
        detail.token = request.token.clone();

        Ok(UpdateTokenResponse {
            token: request.token,
        })
    }

    async fn list_tokens(
        &self,
        request: ListTokensRequest,
    ) -> Result<ListTokensResponse, RemoteError> {
        self.record(RecordedCall::ListTokens(request.clone())).await;
        if let Some(message) = self.list_failure.read().await.clone() {
            return Err(RemoteError::ApiError {
                status: 500,
                message,
            });
        }

        let page_size = request
            .page
            .as_ref()
            .and_then(|page| page.page_size)
            .map(|size| size as usize)
            .unwrap_or(usize::MAX);

        let tokens = self
            .tokens
            .read()
            .await
            .iter()
            .take(page_size)
            .map(|detail| detail.token.clone())
            .collect();

        Ok(ListTokensResponse {
            page: request.page,
            tokens,
        })
    }

    async fn get_token(&self, request: GetTokenRequest) -> Result<TokenDetail, RemoteError> {
        self.record(RecordedCall::GetToken(request.clone())).await;
        self.injected(MockOperation::GetToken, &request.token_id)
            .await?;

        self.token(&request.token_id)
            .await
            .ok_or_else(|| RemoteError::NotFound(format!("token {}", request.token_id)))
    }
}
