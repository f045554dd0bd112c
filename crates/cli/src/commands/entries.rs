use eyre::bail;
use std::time::Duration;
use tabstore_cache::StorageManager;
use tabstore_core::{Priority, SetOptions};

pub fn get(manager: &StorageManager, key: &str) -> eyre::Result<()> {
    match manager.get_item(key) {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => bail!("No value stored under '{key}'"),
    }
}

pub fn set(
    manager: &StorageManager,
    key: &str,
    value: &str,
    compress: bool,
    ttl_secs: Option<u64>,
    priority: Option<Priority>,
) -> eyre::Result<()> {
    let mut options = SetOptions::new();
    if compress {
        options = options.compressed();
    }
    if let Some(secs) = ttl_secs {
        options = options.with_ttl(Duration::from_secs(secs));
    }
    if let Some(priority) = priority {
        options = options.with_priority(priority);
    }

    if !manager.set_item(key, value, options) {
        bail!("Could not store '{key}'");
    }
    tracing::info!("Stored '{}'", key);
    Ok(())
}

pub fn remove(manager: &StorageManager, key: &str) -> eyre::Result<()> {
    manager.remove_item(key);
    tracing::info!("Removed '{}'", key);
    Ok(())
}

pub fn clear(manager: &StorageManager) -> eyre::Result<()> {
    manager.clear();
    tracing::info!("Storage cleared");
    Ok(())
}
