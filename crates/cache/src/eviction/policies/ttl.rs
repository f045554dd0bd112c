//! Expiry-based eviction

use crate::eviction::traits::EvictionStrategy;
use tabstore_core::{CleanupPlan, StorageEntry};

/// Removes every expired entry, whatever its priority, target or preservation
#[derive(Debug, Default, Clone, Copy)]
pub struct TtlStrategy;

impl EvictionStrategy for TtlStrategy {
    fn name(&self) -> &'static str {
        "ttl"
    }

    fn candidates(
        &self,
        entries: Vec<StorageEntry>,
        _plan: &CleanupPlan,
        now_millis: i64,
    ) -> Vec<StorageEntry> {
        entries
            .into_iter()
            .filter(|entry| entry.is_expired(now_millis))
            .collect()
    }

    fn bounded(&self) -> bool {
        false
    }
}
