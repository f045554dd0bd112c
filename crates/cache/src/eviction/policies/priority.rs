//! Priority-tiered eviction

use crate::eviction::traits::EvictionStrategy;
use tabstore_core::{CleanupPlan, Priority, StorageEntry};

/// Low, then normal, then (only when the plan allows it) critical entries;
/// oldest first within a tier
#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityStrategy;

impl EvictionStrategy for PriorityStrategy {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn candidates(
        &self,
        entries: Vec<StorageEntry>,
        plan: &CleanupPlan,
        _now_millis: i64,
    ) -> Vec<StorageEntry> {
        let mut candidates: Vec<StorageEntry> = entries
            .into_iter()
            .filter(|entry| plan.evict_critical || entry.priority != Priority::Critical)
            .collect();

        candidates.sort_by(|a, b| {
            a.priority
                .eviction_rank()
                .cmp(&b.priority.eviction_rank())
                .then_with(|| a.last_modified.cmp(&b.last_modified))
                .then_with(|| a.key.cmp(&b.key))
        });
        candidates
    }
}
