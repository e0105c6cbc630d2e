//! Batch orchestrator implementation.
//!
//! Every item runs its own pipeline; the orchestrator fans items out with
//! bounded concurrency and collects one [`ItemResult`] per item, in item
//! order. Item failures are folded into the results and never abort the
//! batch.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::metadata::{merge_attribute_sequence, AttributeMap, ItemMetadata, MetadataGenerator};
use crate::remote::{
    Asset, CollectionClient, CreateAssetRequest, CreateTokenRequest, GetTokenRequest,
    ListTokensRequest, Page, RemoteError, TokenDetail, TokenRecord, UpdateTokenRequest,
    IMAGE_FIELD,
};
use crate::transfer::{AccessKeys, AssetTarget, AssetTransferer, UploadOutcome};

use super::config::BatchConfig;
use super::types::{
    BatchError, BatchReport, BatchRequest, ItemError, ItemResult, ItemStage, RevealRequest,
    ValidationError, MAX_BATCH_SIZE,
};

/// One placeholder to mint.
struct MintJob {
    token_id: String,
    asset_id: u64,
    metadata: ItemMetadata,
}

/// One listed token that carries an image slot.
struct RevealTarget {
    position: usize,
    token: TokenRecord,
    asset_id: u64,
}

/// Runs placeholder-mint and reveal batches against a collection.
pub struct BatchOrchestrator {
    config: BatchConfig,
    client: Arc<dyn CollectionClient>,
    transferer: Arc<dyn AssetTransferer>,
    generator: Mutex<MetadataGenerator>,
}

impl BatchOrchestrator {
    pub fn new(
        config: BatchConfig,
        client: Arc<dyn CollectionClient>,
        transferer: Arc<dyn AssetTransferer>,
        generator: MetadataGenerator,
    ) -> Self {
        Self {
            config,
            client,
            transferer,
            generator: Mutex::new(generator),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Mint `request.quantity` placeholder tokens.
    ///
    /// Fails without touching the network when the request is invalid.
    /// Otherwise returns one result per item, in item order.
    pub async fn run_placeholder_mint(
        &self,
        request: &BatchRequest,
    ) -> Result<BatchReport, BatchError> {
        request.validate()?;

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let quantity = request.quantity as usize;

        info!(
            batch_id = %batch_id,
            quantity,
            collection_id = request.collection_id,
            start_token_id = self.config.start_token_id,
            "Starting placeholder mint"
        );

        let jobs: Vec<MintJob> = {
            let mut generator = self.generator.lock().await;
            generator
                .generate_placeholder_batch(quantity)
                .into_iter()
                .enumerate()
                .map(|(index, metadata)| MintJob {
                    token_id: (self.config.start_token_id + index as u64).to_string(),
                    asset_id: generator.generate_asset_id(),
                    metadata,
                })
                .collect()
        };

        let results: Vec<ItemResult> = stream::iter(jobs)
            .map(|job| self.mint_item(request, job))
            .buffered(self.config.concurrency_for(quantity))
            .collect()
            .await;

        let report = BatchReport::new(batch_id, "Created Tokens", started_at, results);
        info!(
            batch_id = %batch_id,
            succeeded = report.succeeded,
            failed = report.failed,
            "Placeholder mint finished"
        );
        Ok(report)
    }

    async fn mint_item(&self, request: &BatchRequest, job: MintJob) -> ItemResult {
        let mut stage = ItemStage::Pending;

        match self.mint_steps(request, &job, &mut stage).await {
            Ok((token, upload)) => {
                debug!(token_id = %job.token_id, "Placeholder minted");
                ItemResult::Success {
                    token_id: job.token_id,
                    token,
                    upload,
                }
            }
            Err(e) => {
                warn!(
                    token_id = %job.token_id,
                    stage = %stage,
                    error = %e,
                    "Placeholder mint failed"
                );
                ItemResult::Failed {
                    token_id: job.token_id,
                    stage,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn mint_steps(
        &self,
        request: &BatchRequest,
        job: &MintJob,
        stage: &mut ItemStage,
    ) -> Result<(TokenRecord, UploadOutcome), ItemError> {
        let created = self
            .client
            .create_token(CreateTokenRequest {
                project_id: request.project_id,
                collection_id: request.collection_id,
                token: TokenRecord {
                    token_id: job.token_id.clone(),
                    name: job.metadata.name.clone(),
                    description: Some(job.metadata.description.clone()),
                    decimals: Some(0),
                    properties: merge_attribute_sequence(&job.metadata.attributes)
                        .map(properties_from),
                    ..Default::default()
                },
                private: None,
            })
            .await?;
        *stage = ItemStage::TokenReady;

        let slot = self
            .client
            .create_asset(CreateAssetRequest {
                project_id: request.project_id,
                asset: Asset {
                    id: job.asset_id,
                    collection_id: request.collection_id,
                    token_id: Some(job.token_id.clone()),
                    metadata_field: IMAGE_FIELD.to_string(),
                    ..Default::default()
                },
            })
            .await?;
        *stage = ItemStage::AssetSlotReady;

        let target = AssetTarget {
            project_id: request.project_id,
            collection_id: request.collection_id,
            asset_id: slot.asset.id,
            token_id: job.token_id.clone(),
        };
        let upload = self.transfer(&job.metadata.image, &target, &request.keys).await?;
        *stage = ItemStage::ArtworkTransferred;

        let token = created.token;
        let finalized = self
            .client
            .update_token(UpdateTokenRequest {
                project_id: request.project_id,
                collection_id: request.collection_id,
                token_id: token.token_id.clone(),
                token,
                private: Some(false),
            })
            .await?;
        *stage = ItemStage::MetadataFinalized;

        Ok((finalized.token, upload))
    }

    /// Reveal every token of the collection that has an image slot.
    ///
    /// Tokens are listed once and their details fetched concurrently; the
    /// eligible list built from that single pass is what generated metadata
    /// is paired with, so pairing is stable within a batch.
    pub async fn run_reveal_batch(
        &self,
        request: &RevealRequest,
    ) -> Result<BatchReport, BatchError> {
        request.validate()?;

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();

        let listing = self
            .client
            .list_tokens(ListTokensRequest {
                project_id: request.project_id,
                collection_id: request.collection_id,
                page: Some(Page::with_size(self.config.list_page_size)),
            })
            .await?;

        let listed = listing.tokens.len();
        info!(
            batch_id = %batch_id,
            collection_id = request.collection_id,
            listed,
            "Starting reveal"
        );

        let details: Vec<(String, Result<TokenDetail, RemoteError>)> =
            stream::iter(listing.tokens)
                .map(|token| async move {
                    let detail = self
                        .client
                        .get_token(GetTokenRequest {
                            project_id: request.project_id,
                            collection_id: request.collection_id,
                            token_id: token.token_id.clone(),
                        })
                        .await;
                    (token.token_id, detail)
                })
                .buffered(self.config.concurrency_for(listed))
                .collect()
                .await;

        let mut results: Vec<(usize, ItemResult)> = Vec::new();
        let mut targets: Vec<RevealTarget> = Vec::new();

        for (position, (token_id, detail)) in details.into_iter().enumerate() {
            match detail {
                Ok(detail) => match detail.image_asset().map(|asset| asset.id) {
                    Some(asset_id) => targets.push(RevealTarget {
                        position,
                        token: detail.token,
                        asset_id,
                    }),
                    None => debug!(token_id = %token_id, "Token has no image slot, skipping"),
                },
                Err(e) => {
                    warn!(token_id = %token_id, error = %e, "Failed to fetch token detail");
                    results.push((
                        position,
                        ItemResult::Failed {
                            token_id,
                            stage: ItemStage::Pending,
                            error: e.to_string(),
                        },
                    ));
                }
            }
        }

        if targets.len() > MAX_BATCH_SIZE as usize {
            return Err(ValidationError::TooManyEligible {
                eligible: targets.len(),
                max: MAX_BATCH_SIZE,
            }
            .into());
        }

        let eligible = targets.len();
        let revealed = self.generator.lock().await.generate_revealed_batch(eligible);

        debug!(batch_id = %batch_id, eligible, "Revealing eligible tokens");

        let revealed_results: Vec<(usize, ItemResult)> =
            stream::iter(targets.into_iter().zip(revealed))
                .map(|(target, metadata)| async move {
                    let position = target.position;
                    (position, self.reveal_item(request, target, metadata).await)
                })
                .buffered(self.config.concurrency_for(eligible))
                .collect()
                .await;

        results.extend(revealed_results);
        results.sort_by_key(|(position, _)| *position);

        let report = BatchReport::new(
            batch_id,
            "Updated Tokens",
            started_at,
            results.into_iter().map(|(_, result)| result).collect(),
        );
        info!(
            batch_id = %batch_id,
            eligible,
            succeeded = report.succeeded,
            failed = report.failed,
            "Reveal finished"
        );
        Ok(report)
    }

    async fn reveal_item(
        &self,
        request: &RevealRequest,
        target: RevealTarget,
        metadata: ItemMetadata,
    ) -> ItemResult {
        let token_id = target.token.token_id.clone();
        // The token and its image slot already exist.
        let mut stage = ItemStage::AssetSlotReady;

        match self.reveal_steps(request, target, metadata, &mut stage).await {
            Ok((token, upload)) => {
                debug!(token_id = %token_id, name = %token.name, "Token revealed");
                ItemResult::Success {
                    token_id,
                    token,
                    upload,
                }
            }
            Err(e) => {
                warn!(token_id = %token_id, stage = %stage, error = %e, "Reveal failed");
                ItemResult::Failed {
                    token_id,
                    stage,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn reveal_steps(
        &self,
        request: &RevealRequest,
        target: RevealTarget,
        metadata: ItemMetadata,
        stage: &mut ItemStage,
    ) -> Result<(TokenRecord, UploadOutcome), ItemError> {
        let token_id = target.token.token_id.clone();
        let asset_target = AssetTarget {
            project_id: request.project_id,
            collection_id: request.collection_id,
            asset_id: target.asset_id,
            token_id: token_id.clone(),
        };
        let upload = self.transfer(&metadata.image, &asset_target, &request.keys).await?;
        *stage = ItemStage::ArtworkTransferred;

        let attributes: Vec<Map<String, Value>> = metadata
            .attributes
            .iter()
            .map(|attribute| {
                let mut entry = Map::new();
                entry.insert(attribute.name.clone(), Value::from(attribute.value));
                entry
            })
            .collect();

        let token = TokenRecord {
            token_id: token_id.clone(),
            name: metadata.name,
            description: Some(metadata.description),
            image: Some(metadata.image),
            properties: merge_attribute_sequence(&metadata.attributes).map(properties_from),
            attributes: Some(attributes),
            ..target.token
        };

        let updated = self
            .client
            .update_token(UpdateTokenRequest {
                project_id: request.project_id,
                collection_id: request.collection_id,
                token_id,
                token,
                private: Some(false),
            })
            .await?;
        *stage = ItemStage::MetadataFinalized;

        Ok((updated.token, upload))
    }

    /// Transfer artwork, escalating a failed upload when `strict_uploads`
    /// is set.
    async fn transfer(
        &self,
        source_url: &str,
        target: &AssetTarget,
        keys: &AccessKeys,
    ) -> Result<UploadOutcome, ItemError> {
        let outcome = self
            .transferer
            .transfer_asset(source_url, target, keys)
            .await?;

        match outcome {
            UploadOutcome::Failed { reason } if self.config.strict_uploads => {
                Err(ItemError::Upload(reason))
            }
            outcome => Ok(outcome),
        }
    }
}

fn properties_from(attributes: AttributeMap) -> Map<String, Value> {
    attributes
        .into_iter()
        .map(|(name, value)| (name, Value::from(value)))
        .collect()
}
