use crate::commands::{entries, maintenance, report, transfer, watch, Commands};
use tabstore_cache::StorageManager;

impl Commands {
    pub async fn execute(self, manager: &StorageManager) -> eyre::Result<()> {
        match self {
            Commands::Get { key } => entries::get(manager, &key),
            Commands::Set {
                key,
                value,
                compress,
                ttl_secs,
                priority,
            } => entries::set(manager, &key, &value, compress, ttl_secs, priority),
            Commands::Remove { key } => entries::remove(manager, &key),
            Commands::Clear => entries::clear(manager),

            Commands::Quota => report::quota(manager),
            Commands::Analyze => report::analyze(manager),
            Commands::Health => report::health(manager),

            Commands::Cleanup {
                strategy,
                target,
                preserve,
                evict_critical,
            } => maintenance::cleanup(manager, strategy, target, preserve, evict_critical),
            Commands::ClearCategory { category } => maintenance::clear_category(manager, &category),
            Commands::Repair => maintenance::repair(manager),

            Commands::Export { output } => transfer::export(manager, output.as_deref()),
            Commands::Import { file } => transfer::import(manager, &file),

            Commands::Watch => watch::execute(manager).await,
        }
    }
}
