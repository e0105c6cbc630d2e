//! HTTP client for the hosted metadata service.
//!
//! The service exposes its collection operations as JSON-RPC style
//! endpoints: `POST {host}/rpc/Collections/{Method}` with a JSON body and a
//! bearer JWT.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{
    CreateAssetRequest, CreateAssetResponse, CreateTokenRequest, CreateTokenResponse,
    GetTokenRequest, ListTokensRequest, ListTokensResponse, TokenDetail, UpdateTokenRequest,
    UpdateTokenResponse,
};
use super::{CollectionClient, RemoteError};

/// Default metadata service host.
pub const DEFAULT_METADATA_HOST: &str = "https://metadata.sequence.app";

/// Error body returned by the service on failure.
#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    cause: Option<String>,
}

impl RpcErrorBody {
    fn message(self) -> String {
        let base = self
            .msg
            .or(self.error)
            .unwrap_or_else(|| "unknown error".to_string());
        match self.cause {
            Some(cause) if !cause.is_empty() => format!("{}: {}", base, cause),
            _ => base,
        }
    }
}

/// Collection client backed by reqwest.
pub struct HttpCollectionClient {
    client: Client,
    base_url: String,
    jwt_access_key: String,
}

impl HttpCollectionClient {
    /// Create a client for `base_url` authenticated with a JWT access key.
    pub fn new(
        base_url: impl Into<String>,
        jwt_access_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            jwt_access_key: jwt_access_key.into(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/rpc/Collections/{}", self.base_url, method)
    }

    async fn call<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp, RemoteError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(method);

        debug!(method, url = %url, "Collection service call");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.jwt_access_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RpcErrorBody>(&text)
                .map(RpcErrorBody::message)
                .unwrap_or(text);

            if status == 404 {
                return Err(RemoteError::NotFound(message));
            }
            return Err(RemoteError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| {
            RemoteError::ParseError(format!("Failed to parse {} response: {}", method, e))
        })
    }
}

#[async_trait]
impl CollectionClient for HttpCollectionClient {
    async fn create_token(
        &self,
        request: CreateTokenRequest,
    ) -> Result<CreateTokenResponse, RemoteError> {
        self.call("CreateToken", &request).await
    }

    async fn create_asset(
        &self,
        request: CreateAssetRequest,
    ) -> Result<CreateAssetResponse, RemoteError> {
        self.call("CreateAsset", &request).await
    }

    async fn update_token(
        &self,
        request: UpdateTokenRequest,
    ) -> Result<UpdateTokenResponse, RemoteError> {
        self.call("UpdateToken", &request).await
    }

    async fn list_tokens(
        &self,
        request: ListTokensRequest,
    ) -> Result<ListTokensResponse, RemoteError> {
        self.call("ListTokens", &request).await
    }

    async fn get_token(&self, request: GetTokenRequest) -> Result<TokenDetail, RemoteError> {
        self.call("GetToken", &request).await
    }
}
