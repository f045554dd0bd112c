//! In-memory storage backend
//!
//! `MemoryBackend` models one storage area shared by any number of tab
//! handles. A write through one handle is reported to the subscribers of every
//! other handle, the way a browser fires `storage` events in sibling tabs.
//! Capacity limits and fault injection make quota and availability failures
//! reproducible in tests.

use super::traits::{ChangeSink, StorageBackend};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tabstore_core::{ChangeEvent, Error, Result};

/// In-memory storage backend
///
/// # Usage
///
/// ```
/// use tabstore_cache::backend::{MemoryBackend, StorageBackend};
///
/// let first_tab = MemoryBackend::with_capacity(1024);
/// let second_tab = first_tab.open_tab();
/// first_tab.set("theme", "dark").unwrap();
/// assert_eq!(second_tab.get("theme").unwrap().as_deref(), Some("dark"));
/// ```
pub struct MemoryBackend {
    tab: u64,
    area: Arc<SharedArea>,
}

struct SharedArea {
    state: Mutex<AreaState>,
    next_tab: AtomicU64,
}

struct AreaState {
    items: BTreeMap<String, String>,
    capacity: Option<u64>,
    subscribers: Vec<(u64, ChangeSink)>,
    /// Writes that will fail with a quota fault regardless of space
    pending_quota_faults: usize,
    available: bool,
}

impl AreaState {
    fn used(&self) -> u64 {
        self.items
            .iter()
            .map(|(key, value)| record_size(key, value))
            .sum()
    }

    fn ensure_available(&self, operation: &'static str) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(Error::backend_unavailable(operation, "storage is disabled"))
        }
    }

    fn sinks_except(&self, tab: u64) -> Vec<ChangeSink> {
        self.subscribers
            .iter()
            .filter(|(owner, _)| *owner != tab)
            .map(|(_, sink)| Arc::clone(sink))
            .collect()
    }
}

fn record_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

impl MemoryBackend {
    /// Create an unbounded area
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create an area that refuses writes beyond `capacity` bytes
    pub fn with_capacity(capacity: u64) -> Self {
        Self::build(Some(capacity))
    }

    fn build(capacity: Option<u64>) -> Self {
        Self {
            tab: 0,
            area: Arc::new(SharedArea {
                state: Mutex::new(AreaState {
                    items: BTreeMap::new(),
                    capacity,
                    subscribers: Vec::new(),
                    pending_quota_faults: 0,
                    available: true,
                }),
                next_tab: AtomicU64::new(1),
            }),
        }
    }

    /// Open another handle on the same area, as a second tab would
    #[must_use]
    pub fn open_tab(&self) -> Self {
        Self {
            tab: self.area.next_tab.fetch_add(1, Ordering::Relaxed),
            area: Arc::clone(&self.area),
        }
    }

    /// Make the next `count` writes fail with a quota fault
    pub fn inject_quota_faults(&self, count: usize) {
        self.area.state.lock().pending_quota_faults = count;
    }

    /// Simulate storage being disabled (or re-enabled) for the whole area
    pub fn set_available(&self, available: bool) {
        self.area.state.lock().available = available;
    }

    /// Deliver `event` to this handle's subscribers as if another tab caused it
    pub fn dispatch_external(&self, event: &ChangeEvent) {
        let sinks: Vec<ChangeSink> = {
            let state = self.area.state.lock();
            state
                .subscribers
                .iter()
                .filter(|(owner, _)| *owner == self.tab)
                .map(|(_, sink)| Arc::clone(sink))
                .collect()
        };
        for sink in sinks {
            sink(event);
        }
    }

    /// Bytes currently stored in the area
    pub fn used_bytes(&self) -> u64 {
        self.area.state.lock().used()
    }

    /// Number of keys in the area, metadata included
    pub fn len(&self) -> usize {
        self.area.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listeners are invoked after the area lock is released
    fn notify(sinks: Vec<ChangeSink>, event: &ChangeEvent) {
        for sink in sinks {
            sink(event);
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let state = self.area.state.lock();
        state.ensure_available("get")?;
        Ok(state.items.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let (sinks, event) = {
            let mut state = self.area.state.lock();
            state.ensure_available("set")?;

            let requested = record_size(key, value);
            let used = state.used();

            if state.pending_quota_faults > 0 {
                state.pending_quota_faults -= 1;
                let available = state
                    .capacity
                    .map_or(0, |capacity| capacity.saturating_sub(used));
                return Err(Error::quota_exceeded(key, requested, available));
            }

            if let Some(capacity) = state.capacity {
                let replaced = state
                    .items
                    .get(key)
                    .map_or(0, |old| record_size(key, old));
                if used - replaced + requested > capacity {
                    return Err(Error::quota_exceeded(
                        key,
                        requested,
                        capacity.saturating_sub(used),
                    ));
                }
            }

            let old = state.items.insert(key.to_string(), value.to_string());
            if old.as_deref() == Some(value) {
                return Ok(());
            }
            (
                state.sinks_except(self.tab),
                ChangeEvent::new(key, old, Some(value.to_string())),
            )
        };

        Self::notify(sinks, &event);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let (sinks, event) = {
            let mut state = self.area.state.lock();
            state.ensure_available("remove")?;
            match state.items.remove(key) {
                Some(old) => (
                    state.sinks_except(self.tab),
                    ChangeEvent::new(key, Some(old), None),
                ),
                None => return Ok(()),
            }
        };

        Self::notify(sinks, &event);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let sinks = {
            let mut state = self.area.state.lock();
            state.ensure_available("clear")?;
            if state.items.is_empty() {
                return Ok(());
            }
            state.items.clear();
            state.sinks_except(self.tab)
        };

        Self::notify(sinks, &ChangeEvent::cleared());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let state = self.area.state.lock();
        state.ensure_available("keys")?;
        Ok(state.items.keys().cloned().collect())
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        let state = self.area.state.lock();
        state.ensure_available("entries")?;
        Ok(state
            .items
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn capacity(&self) -> Option<u64> {
        self.area.state.lock().capacity
    }

    fn subscribe(&self, sink: ChangeSink) -> Result<()> {
        let mut state = self.area.state.lock();
        state.ensure_available("subscribe")?;
        state.subscribers.push((self.tab, sink));
        Ok(())
    }
}
