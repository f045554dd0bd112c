use tabstore_cache::StorageManager;
use tabstore_core::EventKind;

/// Print foreign changes as JSON lines until Ctrl-C
pub async fn execute(manager: &StorageManager) -> eyre::Result<()> {
    let id = manager.add_event_listener(EventKind::Change, |event| {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!("Could not print change event: {}", e),
        }
    });

    tracing::info!("Watching for changes, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    manager.remove_event_listener(EventKind::Change, id);
    Ok(())
}
