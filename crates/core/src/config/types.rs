use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ConfigError;
use crate::batch::{BatchConfig, BatchRequest, RevealRequest};
use crate::remote::DEFAULT_METADATA_HOST;
use crate::transfer::AccessKeys;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub mint: MintConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Metadata service connection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub metadata_host: String,
    /// Timeout for every HTTP call, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            metadata_host: default_host(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_host() -> String {
    DEFAULT_METADATA_HOST.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Project identity and credentials.
///
/// Every field is optional here so that a missing one can be reported by
/// name when a request is built.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub collection_id: Option<u64>,
    #[serde(default)]
    pub project_access_key: Option<String>,
    #[serde(default)]
    pub jwt_access_key: Option<String>,
}

/// Placeholder mint settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MintConfig {
    /// Number of placeholders to create
    #[serde(default)]
    pub quantity: Option<u32>,
}

fn non_empty(value: &Option<String>, field: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingField(field)),
    }
}

fn non_zero(value: Option<u64>, field: &'static str) -> Result<u64, ConfigError> {
    match value {
        Some(v) if v != 0 => Ok(v),
        _ => Err(ConfigError::MissingField(field)),
    }
}

impl ProjectConfig {
    /// Both access keys, or the name of the first one missing.
    pub fn access_keys(&self) -> Result<AccessKeys, ConfigError> {
        let jwt_access_key = non_empty(&self.jwt_access_key, "project.jwt_access_key")?;
        let project_access_key =
            non_empty(&self.project_access_key, "project.project_access_key")?;
        Ok(AccessKeys {
            project_access_key,
            jwt_access_key,
        })
    }

    pub fn project_id(&self) -> Result<u64, ConfigError> {
        non_zero(self.project_id, "project.project_id")
    }

    pub fn collection_id(&self) -> Result<u64, ConfigError> {
        non_zero(self.collection_id, "project.collection_id")
    }
}

impl Config {
    /// Build a placeholder-mint request; `quantity` overrides `mint.quantity`.
    pub fn batch_request(&self, quantity: Option<u32>) -> Result<BatchRequest, ConfigError> {
        let keys = self.project.access_keys()?;
        let project_id = self.project.project_id()?;
        let collection_id = self.project.collection_id()?;
        let quantity = quantity
            .or(self.mint.quantity)
            .ok_or(ConfigError::MissingField("mint.quantity"))?;

        Ok(BatchRequest {
            quantity,
            collection_id,
            project_id,
            keys,
        })
    }

    /// Build a reveal request.
    pub fn reveal_request(&self) -> Result<RevealRequest, ConfigError> {
        Ok(RevealRequest {
            keys: self.project.access_keys()?,
            project_id: self.project.project_id()?,
            collection_id: self.project.collection_id()?,
        })
    }
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub service: ServiceConfig,
    pub project: SanitizedProjectConfig,
    pub mint: MintConfig,
    pub batch: BatchConfig,
}

/// Project config with keys hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProjectConfig {
    pub project_id: Option<u64>,
    pub collection_id: Option<u64>,
    pub project_access_key_configured: bool,
    pub jwt_access_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let configured = |key: &Option<String>| key.as_ref().is_some_and(|k| !k.is_empty());
        Self {
            service: config.service.clone(),
            project: SanitizedProjectConfig {
                project_id: config.project.project_id,
                collection_id: config.project.collection_id,
                project_access_key_configured: configured(&config.project.project_access_key),
                jwt_access_key_configured: configured(&config.project.jwt_access_key),
            },
            mint: config.mint.clone(),
            batch: config.batch.clone(),
        }
    }
}
