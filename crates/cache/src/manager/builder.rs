//! Storage manager builder and initialization

use super::StorageManager;
use crate::backend::{MemoryBackend, StorageBackend};
use crate::categorizer::Categorizer;
use crate::clock::{Clock, SystemClock};
use crate::codec::Codec;
use crate::health::HealthReporter;
use crate::notifier::ChangeNotifier;
use crate::quota::QuotaTracker;
use std::sync::Arc;
use tabstore_config::ManagerConfig;
use tabstore_core::Result;
use tracing::debug;

/// Builder for StorageManager
pub struct StorageManagerBuilder {
    backend: Option<Arc<dyn StorageBackend>>,
    config: Option<ManagerConfig>,
    clock: Option<Arc<dyn Clock>>,
}

impl StorageManagerBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            config: None,
            clock: None,
        }
    }

    pub fn with_backend(self, backend: impl StorageBackend + 'static) -> Self {
        self.with_shared_backend(Arc::new(backend))
    }

    pub fn with_shared_backend(mut self, backend: Arc<dyn StorageBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration, compile key rules and attach to the backend
    pub fn build(self) -> Result<StorageManager> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let categorizer = Categorizer::new(&config.category_rules)?;
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(MemoryBackend::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        debug!(
            "Storage manager ready (quota ceiling {} bytes, {} extra key rules)",
            config.quota_bytes,
            config.category_rules.len()
        );

        Ok(StorageManager {
            codec: Codec::new(config.compression_threshold, config.compression_level),
            quota: QuotaTracker::new(config.quota_bytes),
            health: HealthReporter::from_config(&config),
            categorizer,
            backend,
            clock,
            notifier: ChangeNotifier::new(),
            config,
        })
    }
}

impl Default for StorageManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
