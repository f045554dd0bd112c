//! Core eviction strategy trait definition

use tabstore_core::{CleanupPlan, StorageEntry};

/// Eviction strategy trait
pub trait EvictionStrategy: Send + Sync {
    /// Wire name of the strategy
    fn name(&self) -> &'static str;

    /// Select eviction candidates from `entries`, in eviction order
    fn candidates(
        &self,
        entries: Vec<StorageEntry>,
        plan: &CleanupPlan,
        now_millis: i64,
    ) -> Vec<StorageEntry>;

    /// Whether the pass stops at the plan's target and honors preserved keys
    fn bounded(&self) -> bool {
        true
    }
}
