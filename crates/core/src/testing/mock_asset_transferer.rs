//! Mock asset transferer for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::transfer::{AccessKeys, AssetTarget, AssetTransferer, TransferError, UploadOutcome};

/// A recorded transfer for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTransfer {
    pub source_url: String,
    pub target: AssetTarget,
    /// Whether the upload half succeeded.
    pub uploaded: bool,
}

/// Mock implementation of the AssetTransferer trait.
///
/// Provides controllable behavior for testing:
/// - Record every transfer
/// - Fail the source fetch (hard) or the upload (soft) for chosen tokens
/// - Simulate latency and track peak concurrency
#[derive(Debug)]
pub struct MockAssetTransferer {
    transfers: Arc<RwLock<Vec<RecordedTransfer>>>,
    /// Token ids whose source artwork cannot be fetched.
    fetch_failures: Arc<RwLock<HashSet<String>>>,
    /// Token ids whose upload fails.
    upload_failures: Arc<RwLock<HashSet<String>>>,
    /// Simulated transfer duration in milliseconds.
    transfer_duration_ms: Arc<RwLock<u64>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl Default for MockAssetTransferer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssetTransferer {
    /// Create a mock where every transfer succeeds immediately.
    pub fn new() -> Self {
        Self {
            transfers: Arc::new(RwLock::new(Vec::new())),
            fetch_failures: Arc::new(RwLock::new(HashSet::new())),
            upload_failures: Arc::new(RwLock::new(HashSet::new())),
            transfer_duration_ms: Arc::new(RwLock::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded transfers.
    pub async fn recorded_transfers(&self) -> Vec<RecordedTransfer> {
        self.transfers.read().await.clone()
    }

    /// Get the number of transfers attempted.
    pub async fn transfer_count(&self) -> usize {
        self.transfers.read().await.len()
    }

    /// Make the source fetch fail for `token_id`.
    pub async fn fail_fetch_for(&self, token_id: &str) {
        self.fetch_failures
            .write()
            .await
            .insert(token_id.to_string());
    }

    /// Make the upload fail for `token_id`.
    pub async fn fail_upload_for(&self, token_id: &str) {
        self.upload_failures
            .write()
            .await
            .insert(token_id.to_string());
    }

    /// Set the simulated transfer duration.
    pub async fn set_transfer_duration(&self, duration: Duration) {
        *self.transfer_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Highest number of transfers that were in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetTransferer for MockAssetTransferer {
    async fn transfer_asset(
        &self,
        source_url: &str,
        target: &AssetTarget,
        _keys: &AccessKeys,
    ) -> Result<UploadOutcome, TransferError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let duration_ms = *self.transfer_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fetch_failures.read().await.contains(&target.token_id) {
            return Err(TransferError::fetch(source_url, "404 Not Found"));
        }

        let uploaded = !self.upload_failures.read().await.contains(&target.token_id);
        self.transfers.write().await.push(RecordedTransfer {
            source_url: source_url.to_string(),
            target: target.clone(),
            uploaded,
        });

        if uploaded {
            Ok(UploadOutcome::Uploaded {
                response: serde_json::json!({
                    "url": format!(
                        "https://assets.test/{}/{}.png",
                        target.token_id, target.asset_id
                    ),
                }),
            })
        } else {
            Ok(UploadOutcome::failed("simulated upload failure"))
        }
    }
}
