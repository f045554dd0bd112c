//! Configuration loader for tabstore
//!
//! Layers are applied in increasing precedence: built-in defaults, the JSON
//! config file, `TABSTORE_*` environment variables, and command line
//! overrides. The result is validated before it is handed out.

use crate::config::{ConfigSource, ManagerConfig, PartialConfig};
use serde::Deserialize;
use std::path::PathBuf;
use tabstore_core::{
    CleanupStrategy, Error, RecoveryHint, Result, SerializationOp, TABSTORE_AUTO_CLEANUP_VAR,
    TABSTORE_COMPRESSION_THRESHOLD_VAR, TABSTORE_CONFIG_VAR, TABSTORE_LARGEST_ITEMS_VAR,
    TABSTORE_QUOTA_BYTES_VAR,
};

/// On-disk layout: settings live under a `storage` object
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    storage: Option<PartialConfig>,
}

/// A validated configuration and the highest-precedence layer that shaped it
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ManagerConfig,
    pub source: ConfigSource,
}

/// Configuration loader that handles precedence
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Explicit config file, bypassing discovery
    config_path: Option<PathBuf>,
    /// Command line overrides (highest precedence)
    cli: PartialConfig,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the config file from this path instead of the discovered one
    pub fn config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Apply command line arguments on top of every other layer
    pub fn cli_overrides(mut self, overrides: PartialConfig) -> Self {
        self.cli = overrides;
        self
    }

    /// Load configuration with full precedence handling
    pub fn load(self) -> Result<LoadedConfig> {
        let mut config = ManagerConfig::default();
        let mut source = ConfigSource::Default;

        if let Some((path, file_config)) = self.load_from_config_file()? {
            config.apply(file_config);
            source = ConfigSource::ConfigFile(path);
        }

        if let Some(env_config) = Self::load_from_env()? {
            config.apply(env_config);
            source = ConfigSource::EnvironmentVariable("TABSTORE_*".to_string());
        }

        if !self.cli.is_empty() {
            config.apply(self.cli);
            source = ConfigSource::CommandLine;
        }

        config.validate()?;
        tracing::debug!(?source, quota_bytes = config.quota_bytes, "Loaded storage configuration");

        Ok(LoadedConfig { config, source })
    }

    /// Load configuration from config file
    fn load_from_config_file(&self) -> Result<Option<(PathBuf, PartialConfig)>> {
        let config_path = match &self.config_path {
            Some(path) => path.clone(),
            None => match Self::get_config_file_path() {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| Error::file_system(&config_path, "read config file", e))?;

        let file: ConfigFile = serde_json::from_str(&content).map_err(|e| Error::Serialization {
            key: config_path.display().to_string(),
            operation: SerializationOp::Deserialize,
            source: e,
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check config file syntax".to_string(),
            },
        })?;

        Ok(file.storage.map(|storage| (config_path, storage)))
    }

    /// Load configuration from environment variables
    fn load_from_env() -> Result<Option<PartialConfig>> {
        let mut partial = PartialConfig::default();

        if let Some(quota_bytes) = parse_env::<u64>(TABSTORE_QUOTA_BYTES_VAR)? {
            partial.quota_bytes = Some(quota_bytes);
        }

        if let Some(threshold) = parse_env::<usize>(TABSTORE_COMPRESSION_THRESHOLD_VAR)? {
            partial.compression_threshold = Some(threshold);
        }

        if let Some(largest_items) = parse_env::<usize>(TABSTORE_LARGEST_ITEMS_VAR)? {
            partial.largest_items = Some(largest_items);
        }

        if let Ok(strategy) = std::env::var(TABSTORE_AUTO_CLEANUP_VAR) {
            let strategy = strategy
                .parse::<CleanupStrategy>()
                .map_err(|message| Error::configuration(format!("{TABSTORE_AUTO_CLEANUP_VAR}: {message}")))?;
            partial.auto_cleanup = Some(strategy);
        }

        if partial.is_empty() {
            Ok(None)
        } else {
            Ok(Some(partial))
        }
    }

    /// Get the configuration file path
    fn get_config_file_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var(TABSTORE_CONFIG_VAR) {
            return Some(PathBuf::from(explicit));
        }

        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg_config_home) => PathBuf::from(xdg_config_home),
            Err(_) => dirs::config_dir()?,
        };

        Some(config_dir.join("tabstore").join("config.json"))
    }
}

fn parse_env<T: std::str::FromStr>(var: &str) -> Result<Option<T>> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::configuration(format!("{var} has an invalid value '{raw}'"))),
        Err(_) => Ok(None),
    }
}
