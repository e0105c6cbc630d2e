//! Batch lifecycle integration tests.
//!
//! These tests drive both pipelines against the in-memory collection and
//! transferer mocks:
//! placeholder mint: create token -> create slot -> upload -> finalize
//! reveal: list -> detail -> filter image slots -> upload -> update

use std::sync::Arc;
use std::time::Duration;

use regex_lite::Regex;

use tokensmith_core::{
    metadata::{ARTWORK_URLS, PLACEHOLDER_IMAGE},
    testing::{fixtures, MockAssetTransferer, MockCollectionClient, MockOperation, RecordedCall},
    AssetTransferer, BatchConfig, BatchError, BatchOrchestrator, CollectionClient, ItemResult,
    ItemStage, MetadataGenerator, StdRandom, UploadOutcome, ValidationError,
};

/// Test helper owning the mocks behind an orchestrator.
struct TestHarness {
    client: Arc<MockCollectionClient>,
    transferer: Arc<MockAssetTransferer>,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            client: Arc::new(MockCollectionClient::new()),
            transferer: Arc::new(MockAssetTransferer::new()),
        }
    }

    fn orchestrator(&self) -> BatchOrchestrator {
        self.orchestrator_with(BatchConfig::default())
    }

    fn orchestrator_with(&self, config: BatchConfig) -> BatchOrchestrator {
        BatchOrchestrator::new(
            config,
            Arc::clone(&self.client) as Arc<dyn CollectionClient>,
            Arc::clone(&self.transferer) as Arc<dyn AssetTransferer>,
            MetadataGenerator::new(StdRandom::seeded(7)),
        )
    }

    /// Ten placeholder tokens; only ids 1, 4 and 7 carry an image slot.
    async fn seed_partially_minted_collection(&self) {
        self.client
            .add_tokens((0..10).map(|i| {
                let with_image = matches!(i, 1 | 4 | 7);
                fixtures::placeholder_token(&i.to_string(), with_image)
            }))
            .await;
    }
}

fn token_ids(results: &[ItemResult]) -> Vec<&str> {
    results.iter().map(ItemResult::token_id).collect()
}

// =============================================================================
// Placeholder mint
// =============================================================================

#[tokio::test]
async fn test_mint_creates_every_placeholder() {
    let harness = TestHarness::new();
    let report = harness
        .orchestrator()
        .run_placeholder_mint(&fixtures::batch_request(5))
        .await
        .unwrap();

    assert_eq!(report.message, "Created Tokens");
    assert_eq!(report.status, "success");
    assert_eq!(report.succeeded, 5);
    assert_eq!(report.failed, 0);
    assert_eq!(token_ids(&report.metadata_statuses), vec!["0", "1", "2", "3", "4"]);

    for i in 0..5 {
        let detail = harness.client.token(&i.to_string()).await.unwrap();
        assert_eq!(detail.token.name, "Chest");
        assert_eq!(detail.token.description.as_deref(), Some("Placeholder NFT"));
        assert_eq!(detail.token.decimals, Some(0));
        // Placeholders have no attributes to persist.
        assert!(detail.token.properties.is_none());
        assert!(detail.image_asset().is_some());
    }

    let transfers = harness.transferer.recorded_transfers().await;
    assert_eq!(transfers.len(), 5);
    assert!(transfers.iter().all(|t| t.source_url == PLACEHOLDER_IMAGE));

    let updates = harness.client.recorded_updates().await;
    assert_eq!(updates.len(), 5);
    assert!(updates.iter().all(|u| u.private == Some(false)));
}

#[tokio::test]
async fn test_mint_calls_steps_in_order_for_each_item() {
    let harness = TestHarness::new();
    harness
        .orchestrator()
        .run_placeholder_mint(&fixtures::batch_request(1))
        .await
        .unwrap();

    let calls = harness.client.recorded_calls().await;
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], RecordedCall::CreateToken(_)));
    assert!(matches!(calls[1], RecordedCall::CreateAsset(_)));
    assert!(matches!(calls[2], RecordedCall::UpdateToken(_)));

    // The upload goes into the slot that was just created.
    let asset_id = match &calls[1] {
        RecordedCall::CreateAsset(request) => request.asset.id,
        other => panic!("unexpected call {:?}", other),
    };
    let transfers = harness.transferer.recorded_transfers().await;
    assert_eq!(transfers[0].target.asset_id, asset_id);
    assert_eq!(transfers[0].target.token_id, "0");
    assert_eq!(asset_id.to_string().len(), 10);
}

#[tokio::test]
async fn test_mint_rejects_oversized_batch_without_network() {
    let harness = TestHarness::new();
    let err = harness
        .orchestrator()
        .run_placeholder_mint(&fixtures::batch_request(501))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Validation(ValidationError::QuantityOutOfRange { quantity: 501, .. })
    ));
    assert_eq!(harness.client.call_count().await, 0);
    assert_eq!(harness.transferer.transfer_count().await, 0);
}

#[tokio::test]
async fn test_mint_rejects_missing_identity_without_network() {
    let harness = TestHarness::new();
    let mut request = fixtures::batch_request(5);
    request.collection_id = 0;

    let err = harness
        .orchestrator()
        .run_placeholder_mint(&request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Validation(ValidationError::MissingField("collection_id"))
    ));
    assert_eq!(harness.client.call_count().await, 0);
}

#[tokio::test]
async fn test_mint_isolates_failed_artwork_fetch() {
    let harness = TestHarness::new();
    harness.transferer.fail_fetch_for("2").await;

    let report = harness
        .orchestrator()
        .run_placeholder_mint(&fixtures::batch_request(5))
        .await
        .unwrap();

    let results = &report.metadata_statuses;
    assert_eq!(results.len(), 5);
    for (index, result) in results.iter().enumerate() {
        if index == 2 {
            match result {
                ItemResult::Failed {
                    token_id,
                    stage,
                    error,
                } => {
                    assert_eq!(token_id, "2");
                    assert_eq!(*stage, ItemStage::AssetSlotReady);
                    assert!(error.contains("Failed to fetch file from"));
                }
                other => panic!("expected failure, got {:?}", other),
            }
        } else {
            assert!(result.is_success(), "item {} should succeed", index);
        }
    }
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.failed, 1);
    // The failed item never reached finalization.
    assert_eq!(harness.client.calls_for(MockOperation::UpdateToken).await, 4);
}

#[tokio::test]
async fn test_mint_records_soft_upload_failure() {
    let harness = TestHarness::new();
    harness.transferer.fail_upload_for("2").await;

    let report = harness
        .orchestrator()
        .run_placeholder_mint(&fixtures::batch_request(5))
        .await
        .unwrap();

    assert_eq!(report.succeeded, 5);
    match &report.metadata_statuses[2] {
        ItemResult::Success { upload, .. } => {
            assert!(matches!(upload, UploadOutcome::Failed { .. }));
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(harness.client.calls_for(MockOperation::UpdateToken).await, 5);
}

#[tokio::test]
async fn test_mint_strict_uploads_fail_the_item() {
    let harness = TestHarness::new();
    harness.transferer.fail_upload_for("2").await;

    let report = harness
        .orchestrator_with(BatchConfig::default().with_strict_uploads(true))
        .run_placeholder_mint(&fixtures::batch_request(5))
        .await
        .unwrap();

    let failed: Vec<&str> = report
        .metadata_statuses
        .iter()
        .filter(|r| !r.is_success())
        .map(ItemResult::token_id)
        .collect();
    assert_eq!(failed, vec!["2"]);
    assert!(matches!(
        report.metadata_statuses[2],
        ItemResult::Failed {
            stage: ItemStage::AssetSlotReady,
            ..
        }
    ));
}

#[tokio::test]
async fn test_mint_remote_failure_reports_reached_stage() {
    let harness = TestHarness::new();
    harness
        .client
        .fail_on(MockOperation::CreateToken, "0", "quota exceeded")
        .await;
    harness
        .client
        .fail_on(MockOperation::CreateAsset, "1", "slot conflict")
        .await;
    harness
        .client
        .fail_on(MockOperation::UpdateToken, "2", "write timeout")
        .await;

    let report = harness
        .orchestrator()
        .run_placeholder_mint(&fixtures::batch_request(4))
        .await
        .unwrap();

    let stages: Vec<Option<ItemStage>> = report
        .metadata_statuses
        .iter()
        .map(|r| match r {
            ItemResult::Failed { stage, .. } => Some(*stage),
            ItemResult::Success { .. } => None,
        })
        .collect();
    assert_eq!(
        stages,
        vec![
            Some(ItemStage::Pending),
            Some(ItemStage::TokenReady),
            Some(ItemStage::ArtworkTransferred),
            None,
        ]
    );
}

#[tokio::test]
async fn test_mint_uses_start_token_id() {
    let harness = TestHarness::new();
    let report = harness
        .orchestrator_with(BatchConfig::default().with_start_token_id(100))
        .run_placeholder_mint(&fixtures::batch_request(3))
        .await
        .unwrap();

    assert_eq!(token_ids(&report.metadata_statuses), vec!["100", "101", "102"]);
}

#[tokio::test]
async fn test_mint_respects_concurrency_limit() {
    let harness = TestHarness::new();
    harness
        .transferer
        .set_transfer_duration(Duration::from_millis(20))
        .await;

    let report = harness
        .orchestrator_with(BatchConfig::default().with_max_concurrent(2))
        .run_placeholder_mint(&fixtures::batch_request(10))
        .await
        .unwrap();

    assert_eq!(report.succeeded, 10);
    let peak = harness.transferer.peak_in_flight();
    assert!(peak >= 1 && peak <= 2, "peak in flight was {}", peak);
}

#[tokio::test]
async fn test_mint_report_json_shape() {
    let harness = TestHarness::new();
    let report = harness
        .orchestrator()
        .run_placeholder_mint(&fixtures::batch_request(2))
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["message"], "Created Tokens");
    let statuses = value["metadataStatuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0]["status"], "success");
    assert_eq!(statuses[0]["tokenId"], "0");
    assert_eq!(statuses[0]["upload"]["status"], "uploaded");
}

// =============================================================================
// Reveal
// =============================================================================

#[tokio::test]
async fn test_reveal_only_touches_tokens_with_image_slot() {
    let harness = TestHarness::new();
    harness.seed_partially_minted_collection().await;

    let report = harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap();

    assert_eq!(report.message, "Updated Tokens");
    assert_eq!(token_ids(&report.metadata_statuses), vec!["1", "4", "7"]);
    assert_eq!(report.succeeded, 3);

    assert_eq!(harness.client.calls_for(MockOperation::GetToken).await, 10);
    let updates = harness.client.recorded_updates().await;
    assert_eq!(updates.len(), 3);

    let name_pattern = Regex::new(r"^Divine Axe #\d{3}$").unwrap();
    for update in &updates {
        assert!(name_pattern.is_match(&update.token.name));
        assert_eq!(update.token.attributes.as_ref().map(Vec::len), Some(4));
        assert_eq!(update.token.properties.as_ref().map(|p| p.len()), Some(4));
        let image = update.token.image.as_deref().unwrap();
        assert!(ARTWORK_URLS.contains(&image));
    }

    // Tokens without a slot keep their placeholder metadata.
    let untouched = harness.client.token("0").await.unwrap();
    assert_eq!(untouched.token.name, "Chest");
}

#[tokio::test]
async fn test_reveal_uploads_into_existing_slot() {
    let harness = TestHarness::new();
    harness.seed_partially_minted_collection().await;

    harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap();

    let transfers = harness.transferer.recorded_transfers().await;
    assert_eq!(transfers.len(), 3);
    for transfer in &transfers {
        let detail = harness.client.token(&transfer.target.token_id).await.unwrap();
        let slot = detail.image_asset().unwrap();
        assert_eq!(transfer.target.asset_id, slot.id);
        // The uploaded artwork is the one written into the metadata.
        assert_eq!(detail.token.image.as_deref(), Some(transfer.source_url.as_str()));
    }
    // No new slots are created during a reveal.
    assert_eq!(harness.client.calls_for(MockOperation::CreateAsset).await, 0);
}

#[tokio::test]
async fn test_reveal_lists_once_with_large_page() {
    let harness = TestHarness::new();
    harness.seed_partially_minted_collection().await;

    harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap();

    let listings: Vec<_> = harness
        .client
        .recorded_calls()
        .await
        .into_iter()
        .filter_map(|call| match call {
            RecordedCall::ListTokens(request) => Some(request),
            _ => None,
        })
        .collect();
    assert_eq!(listings.len(), 1);
    assert_eq!(
        listings[0].page.as_ref().and_then(|p| p.page_size),
        Some(10_000)
    );
}

#[tokio::test]
async fn test_reveal_keeps_placeholder_extra_fields() {
    let harness = TestHarness::new();
    let mut detail = fixtures::placeholder_token("3", true);
    detail
        .token
        .extra
        .insert("external_url".to_string(), "https://example.com/3".into());
    harness.client.add_token(detail).await;

    harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap();

    let revealed = harness.client.token("3").await.unwrap();
    assert_ne!(revealed.token.name, "Chest");
    assert_eq!(revealed.token.decimals, Some(0));
    assert_eq!(revealed.token.extra["external_url"], "https://example.com/3");
}

#[tokio::test]
async fn test_reveal_isolates_item_failures() {
    let harness = TestHarness::new();
    harness.seed_partially_minted_collection().await;
    harness.transferer.fail_fetch_for("1").await;
    harness
        .client
        .fail_on(MockOperation::UpdateToken, "7", "conflict")
        .await;

    let report = harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap();

    assert_eq!(token_ids(&report.metadata_statuses), vec!["1", "4", "7"]);
    assert!(matches!(
        report.metadata_statuses[0],
        ItemResult::Failed {
            stage: ItemStage::AssetSlotReady,
            ..
        }
    ));
    assert!(report.metadata_statuses[1].is_success());
    assert!(matches!(
        report.metadata_statuses[2],
        ItemResult::Failed {
            stage: ItemStage::ArtworkTransferred,
            ..
        }
    ));
}

#[tokio::test]
async fn test_reveal_detail_failure_is_reported_in_position() {
    let harness = TestHarness::new();
    harness.seed_partially_minted_collection().await;
    harness
        .client
        .fail_on(MockOperation::GetToken, "4", "unavailable")
        .await;

    let report = harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap();

    assert_eq!(token_ids(&report.metadata_statuses), vec!["1", "4", "7"]);
    assert!(matches!(
        report.metadata_statuses[1],
        ItemResult::Failed {
            stage: ItemStage::Pending,
            ..
        }
    ));
    assert_eq!(harness.client.recorded_updates().await.len(), 2);
}

#[tokio::test]
async fn test_reveal_listing_failure_aborts_batch() {
    let harness = TestHarness::new();
    harness.client.fail_listing("collection locked").await;

    let err = harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::Remote(_)));
    assert_eq!(harness.transferer.transfer_count().await, 0);
}

#[tokio::test]
async fn test_reveal_rejects_missing_keys_without_network() {
    let harness = TestHarness::new();
    let mut request = fixtures::reveal_request();
    request.keys.project_access_key.clear();

    let err = harness
        .orchestrator()
        .run_reveal_batch(&request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Validation(ValidationError::MissingField("project_access_key"))
    ));
    assert_eq!(harness.client.call_count().await, 0);
}

#[tokio::test]
async fn test_reveal_rejects_too_many_eligible_tokens() {
    let harness = TestHarness::new();
    harness
        .client
        .add_tokens((0..501).map(|i| fixtures::placeholder_token(&i.to_string(), true)))
        .await;

    let err = harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Validation(ValidationError::TooManyEligible { eligible: 501, .. })
    ));
    assert_eq!(harness.client.recorded_updates().await.len(), 0);
    assert_eq!(harness.transferer.transfer_count().await, 0);
}

#[tokio::test]
async fn test_reveal_empty_collection() {
    let harness = TestHarness::new();
    let report = harness
        .orchestrator()
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap();

    assert!(report.metadata_statuses.is_empty());
    assert_eq!(report.status, "success");
}

#[tokio::test]
async fn test_mint_then_reveal() {
    let harness = TestHarness::new();
    let orchestrator = harness.orchestrator();

    let minted = orchestrator
        .run_placeholder_mint(&fixtures::batch_request(4))
        .await
        .unwrap();
    assert_eq!(minted.succeeded, 4);

    let revealed = orchestrator
        .run_reveal_batch(&fixtures::reveal_request())
        .await
        .unwrap();
    assert_eq!(revealed.succeeded, 4);

    for i in 0..4 {
        let detail = harness.client.token(&i.to_string()).await.unwrap();
        assert!(detail.token.name.starts_with("Divine Axe #"));
    }
}
