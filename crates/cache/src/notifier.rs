//! Observer registry for changes made by other execution contexts

use crate::backend::{ChangeSink, StorageBackend};
use crate::metadata::is_meta_key;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tabstore_core::{ChangeEvent, EventKind, ListenerId, Result};
use tracing::trace;

/// Callback invoked for every foreign change
pub type ChangeListener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Fans backend change events out to registered listeners
#[derive(Default)]
pub struct ChangeNotifier {
    registry: Arc<Registry>,
    attached: Mutex<bool>,
}

#[derive(Default)]
struct Registry {
    listeners: RwLock<Vec<(ListenerId, ChangeListener)>>,
    next_id: AtomicU64,
}

impl Registry {
    fn dispatch(&self, event: &ChangeEvent) {
        if event.key.as_deref().is_some_and(is_meta_key) {
            return;
        }

        // Snapshot so listeners may (un)register while being notified
        let listeners: Vec<ChangeListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        trace!("Dispatching change of {:?} to {} listeners", event.key, listeners.len());
        for listener in listeners {
            listener(event);
        }
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `backend` so its foreign changes reach our listeners
    ///
    /// Only the first successful call subscribes; a failed attempt may be retried.
    pub fn attach(&self, backend: &dyn StorageBackend) -> Result<()> {
        let mut attached = self.attached.lock();
        if *attached {
            return Ok(());
        }

        let registry: Weak<Registry> = Arc::downgrade(&self.registry);
        let sink: ChangeSink = Arc::new(move |event: &ChangeEvent| {
            if let Some(registry) = registry.upgrade() {
                registry.dispatch(event);
            }
        });
        backend.subscribe(sink)?;
        *attached = true;
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        *self.attached.lock()
    }

    pub fn add_listener<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let EventKind::Change = kind;
        let id = ListenerId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Unregister a listener; `false` when `id` is unknown
    pub fn remove_listener(&self, kind: EventKind, id: ListenerId) -> bool {
        let EventKind::Change = kind;
        let mut listeners = self.registry.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners.read().len()
    }

    /// Deliver `event` as if it came from the backend
    pub fn dispatch(&self, event: &ChangeEvent) {
        self.registry.dispatch(event);
    }
}
