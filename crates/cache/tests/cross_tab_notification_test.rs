//! Change notifications between tabs sharing one storage area

use parking_lot::Mutex;
use std::sync::Arc;
use tabstore_cache::{ChangeEvent, EventKind, MemoryBackend, SetOptions, StorageManager};

fn recorder(manager: &StorageManager) -> (tabstore_cache::ListenerId, Arc<Mutex<Vec<ChangeEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&seen);
    let id = manager.add_event_listener(EventKind::Change, move |event| {
        captured.lock().push(event.clone());
    });
    (id, seen)
}

#[test]
fn test_writes_in_one_tab_reach_listeners_in_another() {
    let first_tab = MemoryBackend::new();
    let second_tab = first_tab.open_tab();
    let writer = StorageManager::with_backend(first_tab).unwrap();
    let reader = StorageManager::with_backend(second_tab).unwrap();
    let (_, seen) = recorder(&reader);
    let (_, echoed) = recorder(&writer);

    writer.set_item("user-settings", r#"{"theme":"dark"}"#, SetOptions::new());
    writer.remove_item("user-settings");

    // Metadata traffic is internal and never surfaces
    assert_eq!(
        *seen.lock(),
        vec![
            ChangeEvent::new("user-settings", None, Some(r#"{"theme":"dark"}"#.to_string())),
            ChangeEvent::new("user-settings", Some(r#"{"theme":"dark"}"#.to_string()), None),
        ]
    );
    // A tab never hears about its own writes
    assert!(echoed.lock().is_empty());
    assert_eq!(reader.get_item("user-settings"), None);
}

#[test]
fn test_synthetic_event_reaches_each_listener_once() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = StorageManager::builder()
        .with_shared_backend(backend.clone())
        .build()
        .unwrap();
    let (first_id, first) = recorder(&manager);
    let (_, second) = recorder(&manager);
    let event = ChangeEvent::new("vocab", Some("old".into()), Some("new".into()));

    backend.dispatch_external(&event);

    assert_eq!(*first.lock(), vec![event.clone()]);
    assert_eq!(*second.lock(), vec![event.clone()]);

    assert!(manager.remove_event_listener(EventKind::Change, first_id));
    backend.dispatch_external(&event);
    backend.dispatch_external(&ChangeEvent::cleared());

    assert_eq!(first.lock().len(), 1);
    assert_eq!(*second.lock(), vec![event.clone(), event, ChangeEvent::cleared()]);
}

#[test]
fn test_listener_may_read_back_through_the_manager() {
    let first_tab = MemoryBackend::new();
    let second_tab = first_tab.open_tab();
    let writer = StorageManager::with_backend(first_tab).unwrap();
    let reader = Arc::new(StorageManager::with_backend(second_tab).unwrap());

    let observed = Arc::new(Mutex::new(None));
    let captured = Arc::clone(&observed);
    let weak_reader = Arc::downgrade(&reader);
    reader.add_event_listener(EventKind::Change, move |event| {
        if let (Some(reader), Some(key)) = (weak_reader.upgrade(), event.key.as_deref()) {
            *captured.lock() = reader.get_item(key);
        }
    });

    writer.set_item("session-token", "abc", SetOptions::new());

    assert_eq!(observed.lock().as_deref(), Some("abc"));
}
