use clap::Parser;
use eyre::{eyre, WrapErr};
use std::path::PathBuf;
use tabstore_cache::{FileBackend, StorageManager};
use tabstore_config::{ConfigLoader, PartialConfig};

mod commands;
mod execute;
mod output;

use commands::Commands;

#[derive(Parser)]
#[command(name = "tabstore")]
#[command(about = "Inspect and maintain a quota-managed key/value store", long_about = None)]
#[command(version)]
struct Cli {
    /// Storage document to operate on (defaults to the user data directory)
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Configuration file, bypassing discovery
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Quota ceiling in bytes
    #[arg(long, global = true)]
    quota_bytes: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn open_manager(&self) -> eyre::Result<StorageManager> {
        let overrides = PartialConfig {
            quota_bytes: self.quota_bytes,
            ..PartialConfig::default()
        };
        let mut loader = ConfigLoader::new().cli_overrides(overrides);
        if let Some(path) = &self.config {
            loader = loader.config_path(path.clone());
        }
        let loaded = loader.load().wrap_err("Failed to load configuration")?;
        tracing::debug!("Configuration source: {:?}", loaded.source);

        let store = match &self.store {
            Some(path) => path.clone(),
            None => default_store_path()
                .ok_or_else(|| eyre!("No data directory available, pass --store"))?,
        };

        let backend = FileBackend::open(store).with_capacity(loaded.config.quota_bytes);
        let manager = StorageManager::builder()
            .with_backend(backend)
            .with_config(loaded.config)
            .build()?;
        Ok(manager)
    }
}

fn default_store_path() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join("tabstore").join("storage.json"))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tabstore_utils::tracing::init("info").map_err(|e| eyre!("Failed to initialize logging: {e}"))?;

    let cli = Cli::parse();
    let manager = cli.open_manager()?;
    cli.command.execute(&manager).await
}
