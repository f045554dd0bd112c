//! Largest-first eviction

use crate::eviction::traits::EvictionStrategy;
use tabstore_core::{CleanupPlan, StorageEntry};

#[derive(Debug, Default, Clone, Copy)]
pub struct SizeStrategy;

impl EvictionStrategy for SizeStrategy {
    fn name(&self) -> &'static str {
        "size"
    }

    fn candidates(
        &self,
        mut entries: Vec<StorageEntry>,
        _plan: &CleanupPlan,
        _now_millis: i64,
    ) -> Vec<StorageEntry> {
        entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes).then_with(|| a.key.cmp(&b.key)));
        entries
    }
}
