//! reqwest-backed asset transferer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::{AccessKeys, AssetTarget, UploadOutcome, UPLOAD_FIELD, UPLOAD_FILENAME};
use super::{AssetTransferer, TransferError};

/// Fetches artwork over HTTP and PUTs it to the metadata service's upload
/// endpoint.
pub struct HttpAssetTransferer {
    client: Client,
    metadata_host: String,
}

impl HttpAssetTransferer {
    pub fn new(metadata_host: impl Into<String>, timeout: Duration) -> Result<Self, TransferError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            metadata_host: metadata_host.into().trim_end_matches('/').to_string(),
        })
    }

    /// `{host}/projects/{p}/collections/{c}/tokens/{t}/upload/{a}`
    pub fn upload_url(&self, target: &AssetTarget) -> String {
        format!(
            "{}/projects/{}/collections/{}/tokens/{}/upload/{}",
            self.metadata_host,
            target.project_id,
            target.collection_id,
            target.token_id,
            target.asset_id
        )
    }

    async fn fetch_source(&self, source_url: &str) -> Result<Vec<u8>, TransferError> {
        let response = self
            .client
            .get(source_url)
            .send()
            .await
            .map_err(|e| TransferError::fetch(source_url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::fetch(source_url, status.to_string()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransferError::fetch(source_url, e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        bytes: Vec<u8>,
        target: &AssetTarget,
        keys: &AccessKeys,
    ) -> Result<Value, String> {
        let part = Part::bytes(bytes).file_name(UPLOAD_FILENAME);
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .put(self.upload_url(target))
            .header("X-Access-Key", &keys.project_access_key)
            .bearer_auth(&keys.jwt_access_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("upload request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("upload rejected with {}: {}", status, body));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| format!("upload response was not JSON: {}", e))
    }
}

#[async_trait]
impl AssetTransferer for HttpAssetTransferer {
    async fn transfer_asset(
        &self,
        source_url: &str,
        target: &AssetTarget,
        keys: &AccessKeys,
    ) -> Result<UploadOutcome, TransferError> {
        let bytes = self.fetch_source(source_url).await?;

        debug!(
            token_id = %target.token_id,
            asset_id = target.asset_id,
            bytes = bytes.len(),
            "Uploading artwork"
        );

        match self.upload(bytes, target, keys).await {
            Ok(response) => Ok(UploadOutcome::Uploaded { response }),
            Err(reason) => {
                warn!(
                    token_id = %target.token_id,
                    asset_id = target.asset_id,
                    error = %reason,
                    "Asset upload failed"
                );
                Ok(UploadOutcome::Failed { reason })
            }
        }
    }
}
