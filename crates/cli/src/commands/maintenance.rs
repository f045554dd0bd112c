use crate::output::print_json;
use serde_json::json;
use tabstore_cache::StorageManager;
use tabstore_core::{CleanupPlan, CleanupStrategy};

pub fn cleanup(
    manager: &StorageManager,
    strategy: CleanupStrategy,
    target: f64,
    preserve: Vec<String>,
    evict_critical: bool,
) -> eyre::Result<()> {
    let mut plan = CleanupPlan::new(strategy)
        .with_target(target)
        .preserving(preserve);
    if evict_critical {
        plan = plan.evicting_critical();
    }

    let freed = manager.perform_cleanup(&plan);
    print_json(&json!({
        "strategy": strategy,
        "freedBytes": freed,
        "quota": manager.get_quota(),
    }))
}

pub fn clear_category(manager: &StorageManager, category: &str) -> eyre::Result<()> {
    let freed = manager.clear_category_named(category);
    print_json(&json!({ "category": category, "freedBytes": freed }))
}

pub fn repair(manager: &StorageManager) -> eyre::Result<()> {
    let freed = manager.prune_orphaned_metadata();
    print_json(&json!({ "freedBytes": freed }))
}
