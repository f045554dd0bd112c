use crate::output::print_json;
use tabstore_cache::StorageManager;

pub fn quota(manager: &StorageManager) -> eyre::Result<()> {
    print_json(&manager.get_quota())
}

pub fn analyze(manager: &StorageManager) -> eyre::Result<()> {
    print_json(&manager.analyze_storage())
}

pub fn health(manager: &StorageManager) -> eyre::Result<()> {
    let report = manager.get_health_report();
    for recommendation in &report.recommendations {
        tracing::warn!("{}", recommendation);
    }
    print_json(&report)
}
