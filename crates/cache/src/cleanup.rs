//! Cleanup passes: strategy-driven eviction, category purges, orphan repair

use crate::analysis::StorageAnalyzer;
use crate::backend::StorageBackend;
use crate::categorizer::Categorizer;
use crate::clock::Clock;
use crate::eviction::strategy_for;
use crate::metadata::{EntryHandle, MetadataStore};
use crate::quota::QuotaTracker;
use tabstore_core::{usage_percentage, Category, CleanupPlan, Result};
use tracing::{debug, info, warn};

/// Removes entries according to a [`CleanupPlan`]
pub struct CleanupEngine<'a> {
    backend: &'a dyn StorageBackend,
    categorizer: &'a Categorizer,
    quota: QuotaTracker,
    clock: &'a dyn Clock,
}

impl<'a> CleanupEngine<'a> {
    pub fn new(
        backend: &'a dyn StorageBackend,
        categorizer: &'a Categorizer,
        quota: QuotaTracker,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            backend,
            categorizer,
            quota,
            clock,
        }
    }

    fn analyzer(&self) -> StorageAnalyzer<'_> {
        StorageAnalyzer::new(self.backend, self.categorizer)
    }

    /// Run one pass and return the number of bytes freed
    pub fn perform(&self, plan: &CleanupPlan) -> Result<u64> {
        let strategy = strategy_for(plan.strategy);
        let snapshot = self.quota.snapshot(self.backend)?;
        let candidates =
            strategy.candidates(self.analyzer().analyze()?, plan, self.clock.now_millis());

        let mut used = snapshot.used;
        let mut freed = 0u64;
        let mut evicted = 0usize;

        for entry in candidates {
            if strategy.bounded() {
                if Self::satisfied(plan, used, snapshot.total, freed) {
                    break;
                }
                if plan.preserve_keys.contains(&entry.key) {
                    continue;
                }
            }

            match self.evict(&entry.key) {
                Ok(()) => {
                    debug!("Evicted '{}' ({} bytes)", entry.key, entry.size_bytes);
                    freed += entry.size_bytes;
                    used = used.saturating_sub(entry.size_bytes);
                    evicted += 1;
                }
                Err(e) => warn!("Failed to evict '{}': {}", entry.key, e),
            }
        }

        info!(
            "Cleanup ({}) evicted {} entries, freed {} bytes",
            strategy.name(),
            evicted,
            freed
        );
        Ok(freed)
    }

    fn satisfied(plan: &CleanupPlan, used: u64, total: u64, freed: u64) -> bool {
        if plan.min_bytes.is_some_and(|min| freed >= min) {
            return true;
        }
        usage_percentage(used, total) <= plan.target_percentage
    }

    /// Remove every entry of `category`
    pub fn clear_category(&self, category: Category) -> Result<u64> {
        let mut freed = 0;
        for entry in self.analyzer().analyze()? {
            if entry.category != category {
                continue;
            }
            match self.evict(&entry.key) {
                Ok(()) => freed += entry.size_bytes,
                Err(e) => warn!("Failed to remove '{}': {}", entry.key, e),
            }
        }

        info!("Cleared category {}: {} bytes freed", category, freed);
        Ok(freed)
    }

    /// Drop metadata records whose value has disappeared
    pub fn prune_orphaned_metadata(&self) -> Result<u64> {
        let metadata = MetadataStore::new(self.backend);
        let mut freed = 0;

        for handle in self.analyzer().orphaned_metadata()? {
            let size = metadata
                .read_raw(&handle)?
                .map_or(0, |raw| self.backend.entry_size(handle.meta_key(), &raw));
            metadata.remove(&handle)?;
            debug!("Pruned orphaned metadata for '{}'", handle.value_key());
            freed += size;
        }

        if freed > 0 {
            info!("Pruned {} bytes of orphaned metadata", freed);
        }
        Ok(freed)
    }

    /// Remove a value and its metadata; an already missing key is fine
    pub fn evict(&self, key: &str) -> Result<()> {
        let Some(handle) = EntryHandle::new(key) else {
            return Ok(());
        };
        self.backend.remove(handle.value_key())?;
        MetadataStore::new(self.backend).remove(&handle)
    }
}
