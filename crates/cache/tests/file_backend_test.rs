//! Storage manager over the JSON file backend

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tabstore_cache::{
    ChangeEvent, CleanupPlan, CleanupStrategy, EventKind, FileBackend, SetOptions,
    StorageBackend, StorageManager,
};
use tempfile::TempDir;

type Recorded = Arc<Mutex<Vec<ChangeEvent>>>;

fn record_changes(manager: &StorageManager) -> Recorded {
    let seen: Recorded = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&seen);
    manager.add_event_listener(EventKind::Change, move |event| {
        captured.lock().push(event.clone());
    });
    seen
}

/// Poll until `done` holds for the recorded events or five seconds pass
fn wait_for(seen: &Recorded, done: impl Fn(&[ChangeEvent]) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done(&seen.lock()) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

#[test]
fn test_entries_persist_across_managers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");
    let large = "persisted payload ".repeat(100);

    {
        let manager = StorageManager::with_backend(FileBackend::open(&path)).unwrap();
        assert!(manager.set_item("vocab-deck", &large, SetOptions::new().compressed()));
        assert!(manager.set_item("user-settings", "{}", SetOptions::new()));
    }

    let manager = StorageManager::with_backend(FileBackend::open(&path)).unwrap();
    assert_eq!(manager.get_item("vocab-deck").as_deref(), Some(large.as_str()));
    assert_eq!(manager.analyze_storage().len(), 2);
}

#[test]
fn test_file_capacity_drives_cleanup() {
    let temp_dir = TempDir::new().unwrap();
    let backend = FileBackend::open(temp_dir.path().join("storage.json")).with_capacity(2_000);
    let manager = StorageManager::with_backend(backend).unwrap();

    for i in 0..20 {
        assert!(manager.set_item(&format!("search-cache-{i}"), &"r".repeat(150), SetOptions::new()));
    }
    let quota = manager.get_quota();
    assert_eq!(quota.total, 2_000);
    assert!(quota.used <= 2_000);

    manager.perform_cleanup(&CleanupPlan::new(CleanupStrategy::Priority));
    assert!(manager.analyze_storage().is_empty());
}

#[test]
fn test_writes_from_another_process_are_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");
    let manager = StorageManager::with_backend(FileBackend::open(&path)).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&seen);
    manager.add_event_listener(EventKind::Change, move |event| {
        captured.lock().push(event.key.clone());
    });

    // A second handle stands in for another process sharing the file
    FileBackend::open(&path).set("theme", "dark").unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while seen.lock().is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }

    assert_eq!(seen.lock().first(), Some(&Some("theme".to_string())));
    assert_eq!(manager.get_item("theme").as_deref(), Some("dark"));
}

#[test]
fn test_own_writes_are_never_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");
    let manager = StorageManager::with_backend(FileBackend::open(&path)).unwrap();
    let seen = record_changes(&manager);

    for i in 0..200 {
        assert!(manager.set_item(&format!("k{i}"), "v", SetOptions::new()));
    }
    manager.remove_item("k0");
    std::thread::sleep(Duration::from_millis(800));
    assert!(seen.lock().is_empty(), "own writes echoed: {:?}", seen.lock().len());

    // The watcher is still live for writes from elsewhere
    FileBackend::open(&path).set("theme", "dark").unwrap();
    assert!(wait_for(&seen, |events| !events.is_empty()));
    assert!(seen
        .lock()
        .iter()
        .all(|event| event.key.as_deref() == Some("theme")));
}

#[test]
fn test_removing_the_last_entry_is_not_a_clear() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");
    let listener = StorageManager::with_backend(FileBackend::open(&path)).unwrap();
    let other = StorageManager::with_backend(FileBackend::open(&path)).unwrap();
    let seen = record_changes(&listener);

    assert!(other.set_item("theme", "dark", SetOptions::new()));
    assert!(wait_for(&seen, |events| events.iter().any(|e| e.new_value.is_some())));

    other.remove_item("theme");
    let removed = ChangeEvent::new("theme", Some("dark".to_string()), None);
    assert!(wait_for(&seen, |events| events.contains(&removed)));
    std::thread::sleep(Duration::from_millis(300));
    assert!(seen.lock().iter().all(|event| event.key.is_some()));

    // A real clear is still reported as one keyless event
    assert!(other.set_item("theme", "light", SetOptions::new()));
    assert!(wait_for(&seen, |events| events.last().and_then(|e| e.new_value.as_deref()) == Some("light")));
    other.clear();
    assert!(wait_for(&seen, |events| events.contains(&ChangeEvent::cleared())));
}

#[test]
fn test_watcher_starts_with_the_first_listener() {
    let temp_dir = TempDir::new().unwrap();
    let directory = temp_dir.path().join("profile");
    let manager =
        StorageManager::with_backend(FileBackend::open(directory.join("storage.json"))).unwrap();

    assert_eq!(manager.get_item("theme"), None);
    assert_eq!(manager.get_quota().used, 0);
    assert!(!directory.exists());

    manager.add_event_listener(EventKind::Change, |_| {});
    assert!(directory.exists());
}
