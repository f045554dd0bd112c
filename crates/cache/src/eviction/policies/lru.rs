//! LRU (least recently written) eviction

use crate::eviction::traits::EvictionStrategy;
use tabstore_core::{CleanupPlan, StorageEntry};

/// Oldest `last_modified` first; reads never refresh recency
#[derive(Debug, Default, Clone, Copy)]
pub struct LruStrategy;

impl EvictionStrategy for LruStrategy {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn candidates(
        &self,
        mut entries: Vec<StorageEntry>,
        _plan: &CleanupPlan,
        _now_millis: i64,
    ) -> Vec<StorageEntry> {
        entries.sort_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.key.cmp(&b.key))
        });
        entries
    }
}
