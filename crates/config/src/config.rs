//! Storage manager configuration with validation

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tabstore_core::{
    CategoryRule, CleanupStrategy, Error, Result, CRITICAL_PERCENTAGE,
    DEFAULT_COMPRESSION_LEVEL, DEFAULT_COMPRESSION_THRESHOLD, DEFAULT_LARGEST_ITEMS,
    DEFAULT_QUOTA_BYTES, WARNING_PERCENTAGE,
};

/// Tunables of the storage manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Quota ceiling in bytes, used when the backend reports no capacity
    pub quota_bytes: u64,
    /// Payloads longer than this are compressed when compression is requested
    pub compression_threshold: usize,
    /// gzip level (0-9)
    pub compression_level: u32,
    /// Number of entries listed in health reports
    pub largest_items: usize,
    /// Usage percentage that triggers a cleanup warning
    pub warning_percentage: f64,
    /// Usage percentage that triggers a critical recommendation
    pub critical_percentage: f64,
    /// Strategy run when a write hits the quota
    pub auto_cleanup: CleanupStrategy,
    /// Extra key-name rules, tried before the built-in ones
    pub category_rules: Vec<CategoryRule>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            quota_bytes: DEFAULT_QUOTA_BYTES,
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            largest_items: DEFAULT_LARGEST_ITEMS,
            warning_percentage: WARNING_PERCENTAGE,
            critical_percentage: CRITICAL_PERCENTAGE,
            auto_cleanup: CleanupStrategy::Priority,
            category_rules: Vec::new(),
        }
    }
}

impl ManagerConfig {
    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.quota_bytes == 0 {
            return Err(Error::configuration("quota_bytes must be greater than zero"));
        }

        for (name, value) in [
            ("warning_percentage", self.warning_percentage),
            ("critical_percentage", self.critical_percentage),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::configuration(format!(
                    "{name} must be within 0..=100, got {value}"
                )));
            }
        }

        if self.warning_percentage > self.critical_percentage {
            return Err(Error::configuration(format!(
                "warning_percentage ({}) exceeds critical_percentage ({})",
                self.warning_percentage, self.critical_percentage
            )));
        }

        if self.compression_level > 9 {
            return Err(Error::configuration(format!(
                "compression_level must be within 0..=9, got {}",
                self.compression_level
            )));
        }

        Ok(())
    }

    /// Overlay every value present in `partial`
    pub fn apply(&mut self, partial: PartialConfig) {
        if let Some(quota_bytes) = partial.quota_bytes {
            self.quota_bytes = quota_bytes;
        }
        if let Some(threshold) = partial.compression_threshold {
            self.compression_threshold = threshold;
        }
        if let Some(level) = partial.compression_level {
            self.compression_level = level;
        }
        if let Some(largest_items) = partial.largest_items {
            self.largest_items = largest_items;
        }
        if let Some(warning) = partial.warning_percentage {
            self.warning_percentage = warning;
        }
        if let Some(critical) = partial.critical_percentage {
            self.critical_percentage = critical;
        }
        if let Some(strategy) = partial.auto_cleanup {
            self.auto_cleanup = strategy;
        }
        // Rules are additive across sources
        self.category_rules.extend(partial.category_rules);
    }
}

/// A configuration layer where every setting is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub quota_bytes: Option<u64>,
    pub compression_threshold: Option<usize>,
    pub compression_level: Option<u32>,
    pub largest_items: Option<usize>,
    pub warning_percentage: Option<f64>,
    pub critical_percentage: Option<f64>,
    pub auto_cleanup: Option<CleanupStrategy>,
    pub category_rules: Vec<CategoryRule>,
}

impl PartialConfig {
    /// Whether this layer sets anything at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
    /// Command line argument
    CommandLine,
}
