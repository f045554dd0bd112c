//! The storage manager: one owned entry point over a backend
//!
//! Every public operation is total. Internal failures are logged together
//! with their [`RecoveryHint`](tabstore_core::RecoveryHint) and turned into
//! the operation's empty result (`false`, `None`, `0`, a degraded snapshot).

mod builder;
mod operations;

pub use builder::StorageManagerBuilder;

use crate::backend::StorageBackend;
use crate::categorizer::Categorizer;
use crate::clock::Clock;
use crate::codec::Codec;
use crate::health::HealthReporter;
use crate::metadata::is_meta_key;
use crate::notifier::ChangeNotifier;
use crate::quota::QuotaTracker;
use std::sync::Arc;
use tabstore_config::ManagerConfig;
use tabstore_core::{
    Category, ChangeEvent, CleanupPlan, Error, EventKind, HealthReport, ListenerId,
    QuotaSnapshot, Result, SetOptions, StorageEntry,
};
use tracing::warn;

/// Quota-aware key/value manager
pub struct StorageManager {
    backend: Arc<dyn StorageBackend>,
    config: ManagerConfig,
    categorizer: Categorizer,
    codec: Codec,
    quota: QuotaTracker,
    health: HealthReporter,
    clock: Arc<dyn Clock>,
    notifier: ChangeNotifier,
}

impl StorageManager {
    pub fn builder() -> StorageManagerBuilder {
        StorageManagerBuilder::new()
    }

    /// Manager with default configuration over `backend`
    pub fn with_backend(backend: impl StorageBackend + 'static) -> Result<Self> {
        StorageManagerBuilder::new().with_backend(backend).build()
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Store `value` under `key`; `false` when it could not be stored
    pub fn set_item(&self, key: &str, value: &str, options: SetOptions) -> bool {
        if is_meta_key(key) {
            warn!("Refusing to write reserved key '{}'", key);
            return false;
        }
        match self.try_set_item(key, value, &options) {
            Ok(()) => true,
            Err(e) => {
                self.degrade("set_item", &e);
                false
            }
        }
    }

    /// Logical value stored under `key`
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.try_get_item(key).unwrap_or_else(|e| {
            self.degrade("get_item", &e);
            None
        })
    }

    pub fn remove_item(&self, key: &str) {
        if let Err(e) = self.try_remove_item(key) {
            self.degrade("remove_item", &e);
        }
    }

    /// Remove everything, metadata included
    pub fn clear(&self) {
        if let Err(e) = self.backend.clear() {
            self.degrade("clear", &e);
        }
    }

    pub fn get_quota(&self) -> QuotaSnapshot {
        self.quota.snapshot(self.backend()).unwrap_or_else(|e| {
            self.degrade("get_quota", &e);
            QuotaSnapshot::unavailable(self.quota.total(self.backend()))
        })
    }

    /// Every managed entry, largest first
    pub fn analyze_storage(&self) -> Vec<StorageEntry> {
        self.analyzer().analyze().unwrap_or_else(|e| {
            self.degrade("analyze_storage", &e);
            Vec::new()
        })
    }

    /// Run a cleanup pass; returns the bytes freed
    pub fn perform_cleanup(&self, plan: &CleanupPlan) -> u64 {
        self.cleanup_engine().perform(plan).unwrap_or_else(|e| {
            self.degrade("perform_cleanup", &e);
            0
        })
    }

    pub fn clear_category(&self, category: Category) -> u64 {
        self.cleanup_engine()
            .clear_category(category)
            .unwrap_or_else(|e| {
                self.degrade("clear_category", &e);
                0
            })
    }

    /// Like [`clear_category`](Self::clear_category), by wire name; unknown names free nothing
    pub fn clear_category_named(&self, name: &str) -> u64 {
        match name.parse::<Category>() {
            Ok(category) => self.clear_category(category),
            Err(e) => {
                warn!("Not clearing category: {}", e);
                0
            }
        }
    }

    /// Drop metadata left behind by values removed elsewhere
    pub fn prune_orphaned_metadata(&self) -> u64 {
        self.cleanup_engine()
            .prune_orphaned_metadata()
            .unwrap_or_else(|e| {
                self.degrade("prune_orphaned_metadata", &e);
                0
            })
    }

    pub fn get_health_report(&self) -> HealthReport {
        let quota = self.get_quota();
        let entries = self.analyze_storage();
        self.health.report(quota, &entries, self.clock.now_millis())
    }

    /// Register `listener` for changes made by other contexts
    ///
    /// The first listener subscribes the manager to the backend.
    pub fn add_event_listener<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        if let Err(e) = self.notifier.attach(self.backend()) {
            // Retried when the next listener is added
            self.degrade("add_event_listener", &e);
        }
        self.notifier.add_listener(kind, listener)
    }

    pub fn remove_event_listener(&self, kind: EventKind, id: ListenerId) -> bool {
        self.notifier.remove_listener(kind, id)
    }

    /// Log a swallowed failure with its recovery hint
    fn degrade(&self, operation: &'static str, error: &Error) {
        warn!(
            operation,
            recovery_hint = ?error.recovery_hint(),
            "Storage operation failed: {}",
            error
        );
    }
}
