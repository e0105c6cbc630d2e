//! tokensmith - batch placeholder minting and reveal.
//!
//! Runs one batch per invocation and prints its report as JSON on stdout.
//! Logs go to stderr so the report can be piped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokensmith_core::{
    load_config, load_config_from_env, validate_config, AssetTransferer, BatchOrchestrator,
    BatchReport, CollectionClient, Config, HttpAssetTransferer, HttpCollectionClient,
    MetadataGenerator, SanitizedConfig,
};

/// Config file used when `--config` is not given
const DEFAULT_CONFIG_PATH: &str = "tokensmith.toml";

/// Command-line arguments for tokensmith
#[derive(Parser, Debug)]
#[command(name = "tokensmith")]
#[command(about = "Batch placeholder minting and reveal for token collections")]
#[command(version)]
struct Args {
    /// Configuration file (TOML); environment variables override it
    #[arg(short, long, global = true, env = "TOKENSMITH_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum items in flight per batch (0 = unbounded)
    #[arg(long, global = true)]
    max_concurrent: Option<usize>,

    /// Fail an item when its artwork upload is rejected
    #[arg(long, global = true)]
    strict_uploads: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mint a batch of placeholder tokens
    Mint {
        /// Number of tokens to mint (1-500); falls back to `mint.quantity`
        #[arg(short, long)]
        quantity: Option<u32>,
    },
    /// Reveal every token in the collection that has an image slot
    Reveal,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    info!(config = %sanitized, "Configuration loaded");

    let report = match args.command {
        Command::Mint { quantity } => {
            let request = config
                .batch_request(quantity)
                .context("Incomplete mint configuration")?;
            let orchestrator = build_orchestrator(&config, &request.keys.jwt_access_key)?;
            orchestrator.run_placeholder_mint(&request).await?
        }
        Command::Reveal => {
            let request = config
                .reveal_request()
                .context("Incomplete reveal configuration")?;
            let orchestrator = build_orchestrator(&config, &request.keys.jwt_access_key)?;
            orchestrator.run_reveal_batch(&request).await?
        }
    };

    print_report(&report)
}

/// Load from an explicit path, the default file if present, or the
/// environment alone.
fn load(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
            load_config(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH))
        }
        None => {
            info!("No config file, reading configuration from environment");
            load_config_from_env().context("Failed to load config from environment")
        }
    }
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(max) = args.max_concurrent {
        config.batch.max_concurrent_items = max;
    }
    if args.strict_uploads {
        config.batch.strict_uploads = true;
    }
}

fn build_orchestrator(config: &Config, jwt_access_key: &str) -> Result<BatchOrchestrator> {
    let timeout = config.service.timeout();

    let client: Arc<dyn CollectionClient> = Arc::new(
        HttpCollectionClient::new(&config.service.metadata_host, jwt_access_key, timeout)
            .context("Failed to create collection client")?,
    );
    let transferer: Arc<dyn AssetTransferer> = Arc::new(
        HttpAssetTransferer::new(&config.service.metadata_host, timeout)
            .context("Failed to create asset transferer")?,
    );

    info!(
        host = %config.service.metadata_host,
        max_concurrent = config.batch.max_concurrent_items,
        "Collection service ready"
    );

    Ok(BatchOrchestrator::new(
        config.batch.clone(),
        client,
        transferer,
        MetadataGenerator::default(),
    ))
}

fn print_report(report: &BatchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_mint_with_quantity() {
        let args = Args::try_parse_from(["tokensmith", "mint", "--quantity", "25"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Mint { quantity: Some(25) }
        ));
        assert!(!args.strict_uploads);
    }

    #[test]
    fn test_parse_reveal_with_global_flags() {
        let args = Args::try_parse_from([
            "tokensmith",
            "reveal",
            "--config",
            "prod.toml",
            "--max-concurrent",
            "4",
            "--strict-uploads",
        ])
        .unwrap();
        assert!(matches!(args.command, Command::Reveal));
        assert_eq!(args.config, Some(PathBuf::from("prod.toml")));
        assert_eq!(args.max_concurrent, Some(4));
        assert!(args.strict_uploads);
    }

    #[test]
    fn test_overrides_apply_to_batch_config() {
        let args = Args::try_parse_from([
            "tokensmith",
            "mint",
            "--max-concurrent",
            "0",
            "--strict-uploads",
        ])
        .unwrap();
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.batch.max_concurrent_items, 0);
        assert!(config.batch.strict_uploads);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokensmith.toml");
        std::fs::write(
            &path,
            "[project]\nproject_id = 30957\ncollection_id = 892189\n\n[mint]\nquantity = 3\n",
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.project.project_id, Some(30957));
        assert_eq!(config.mint.quantity, Some(3));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
