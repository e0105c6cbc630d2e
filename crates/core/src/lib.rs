pub mod batch;
pub mod config;
pub mod metadata;
pub mod remote;
pub mod testing;
pub mod transfer;

pub use batch::{
    BatchConfig, BatchError, BatchOrchestrator, BatchReport, BatchRequest, ItemResult, ItemStage,
    RevealRequest, ValidationError, MAX_BATCH_SIZE,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config, ConfigError,
    SanitizedConfig,
};
pub use metadata::{
    merge_attribute_sequence, AttributeRecord, ItemMetadata, MetadataError, MetadataGenerator,
    RandomSource, StdRandom,
};
pub use remote::{CollectionClient, HttpCollectionClient, RemoteError, TokenDetail, TokenRecord};
pub use transfer::{
    AccessKeys, AssetTarget, AssetTransferer, HttpAssetTransferer, TransferError, UploadOutcome,
};
