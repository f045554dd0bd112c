//! JSON file storage backend
//!
//! The whole area lives in one JSON object on disk. Every operation reloads
//! the document, so several processes sharing the file see each other's
//! writes, and a filesystem watcher turns foreign modifications into
//! [`ChangeEvent`]s. Clearing deletes the document, so an absent file is what
//! distinguishes a clear from the removal of the last key.

use super::traits::{ChangeSink, StorageBackend};
use notify::{Event, EventKind as FsEventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabstore_core::{ChangeEvent, Error, Result};
use tabstore_utils::{read_optional_string, write_atomic_string};
use tracing::{debug, trace, warn};

type Document = BTreeMap<String, String>;

/// Storage area persisted as a JSON document
pub struct FileBackend {
    path: PathBuf,
    capacity: Option<u64>,
    /// Serializes read-modify-write cycles within this process
    io_lock: Mutex<()>,
    watch: Arc<WatchState>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

/// State shared with the watcher callback
struct WatchState {
    path: PathBuf,
    /// Document contents as last seen by this handle
    last_seen: Mutex<Document>,
    sinks: Mutex<Vec<ChangeSink>>,
}

impl FileBackend {
    /// Open (without creating) the document at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            watch: Arc::new(WatchState {
                path: path.clone(),
                last_seen: Mutex::new(Document::new()),
                sinks: Mutex::new(Vec::new()),
            }),
            path,
            capacity: None,
            io_lock: Mutex::new(()),
            watcher: Mutex::new(None),
        }
    }

    /// Refuse writes that would grow the document beyond `capacity` bytes
    #[must_use]
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document> {
        Ok(read_document(&self.path)?.unwrap_or_default())
    }

    /// Persist `document` and apply the same mutation to the watcher's view
    ///
    /// The view stays locked across the write so the watcher never diffs this
    /// handle's own write against a stale snapshot.
    fn commit(&self, document: &Document, mutate: impl FnOnce(&mut Document)) -> Result<()> {
        let mut last_seen = self.watch.last_seen.lock();
        let content = serde_json::to_string_pretty(document)?;
        write_atomic_string(&self.path, &content)?;
        mutate(&mut last_seen);
        Ok(())
    }

    fn used(&self, document: &Document) -> u64 {
        document
            .iter()
            .map(|(key, value)| self.entry_size(key, value))
            .sum()
    }

    fn start_watching(&self) -> Result<()> {
        let mut guard = self.watcher.lock();
        if guard.is_some() {
            return Ok(());
        }

        *self.watch.last_seen.lock() = self.load()?;

        let state = Arc::clone(&self.watch);
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => state.handle(&event),
                Err(e) => warn!("Storage file watcher error: {}", e),
            }
        })
        .map_err(|e| Error::backend_unavailable("subscribe", e.to_string()))?;

        let directory = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(directory)
            .map_err(|e| Error::file_system(directory, "create storage directory", e))?;

        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| Error::backend_unavailable("subscribe", e.to_string()))?;

        debug!("Watching {} for external changes", self.path.display());
        *guard = Some(watcher);
        Ok(())
    }
}

impl WatchState {
    fn handle(&self, event: &Event) {
        if !matches!(
            event.kind,
            FsEventKind::Create(_) | FsEventKind::Modify(_) | FsEventKind::Remove(_)
        ) {
            return;
        }
        let file_name = self.path.file_name();
        if !event.paths.iter().any(|path| path.file_name() == file_name) {
            return;
        }

        let events = {
            let mut last_seen = self.last_seen.lock();
            let current = match read_document(&self.path) {
                Ok(current) => current,
                Err(e) => {
                    trace!("Skipping unreadable storage document: {}", e);
                    return;
                }
            };
            let events = diff_documents(&last_seen, current.as_ref());
            *last_seen = current.unwrap_or_default();
            events
        };
        if events.is_empty() {
            return;
        }

        let sinks: Vec<ChangeSink> = self.sinks.lock().iter().map(Arc::clone).collect();
        for event in &events {
            for sink in &sinks {
                sink(event);
            }
        }
    }
}

/// The document at `path`, `None` when the file does not exist
fn read_document(path: &Path) -> Result<Option<Document>> {
    match read_optional_string(path)? {
        None => Ok(None),
        Some(content) if content.trim().is_empty() => Ok(Some(Document::new())),
        Some(content) => serde_json::from_str(&content).map(Some).map_err(|e| {
            Error::corrupted(path.display().to_string(), format!("invalid storage document: {e}"))
        }),
    }
}

/// Changes turning `before` into `after`; a deleted document is a clear
fn diff_documents(before: &Document, after: Option<&Document>) -> Vec<ChangeEvent> {
    let Some(after) = after else {
        return if before.is_empty() {
            Vec::new()
        } else {
            vec![ChangeEvent::cleared()]
        };
    };

    let mut events = Vec::new();
    for (key, old) in before {
        match after.get(key) {
            None => events.push(ChangeEvent::new(key, Some(old.clone()), None)),
            Some(new) if new != old => {
                events.push(ChangeEvent::new(key, Some(old.clone()), Some(new.clone())));
            }
            Some(_) => {}
        }
    }
    for (key, new) in after {
        if !before.contains_key(key) {
            events.push(ChangeEvent::new(key, None, Some(new.clone())));
        }
    }
    events
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.io_lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.io_lock.lock();
        let mut document = self.load()?;

        if let Some(capacity) = self.capacity {
            let used = self.used(&document);
            let requested = self.entry_size(key, value);
            let replaced = document
                .get(key)
                .map_or(0, |old| self.entry_size(key, old));
            if used - replaced + requested > capacity {
                return Err(Error::quota_exceeded(
                    key,
                    requested,
                    capacity.saturating_sub(used),
                ));
            }
        }

        document.insert(key.to_string(), value.to_string());
        self.commit(&document, |seen| {
            seen.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.io_lock.lock();
        let mut document = self.load()?;
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.commit(&document, |seen| {
            seen.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.io_lock.lock();
        let mut last_seen = self.watch.last_seen.lock();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::file_system(&self.path, "clear storage document", e)),
        }
        last_seen.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let _guard = self.io_lock.lock();
        Ok(self.load()?.into_keys().collect())
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        let _guard = self.io_lock.lock();
        Ok(self.load()?.into_iter().collect())
    }

    fn capacity(&self) -> Option<u64> {
        self.capacity
    }

    fn subscribe(&self, sink: ChangeSink) -> Result<()> {
        self.start_watching()?;
        self.watch.sinks.lock().push(sink);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::open(temp_dir.path().join("storage.json"));

        assert_eq!(backend.get("anything").unwrap(), None);
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn test_values_persist_across_handles() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        FileBackend::open(&path).set("theme", "dark").unwrap();

        let reopened = FileBackend::open(&path);
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
        reopened.remove("theme").unwrap();
        assert_eq!(FileBackend::open(&path).get("theme").unwrap(), None);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::open(temp_dir.path().join("storage.json")).with_capacity(8);

        backend.set("ab", "cdef").unwrap();
        assert!(backend.set("gh", "ijkl").unwrap_err().is_quota_exceeded());
        backend.set("ab", "cdefgh").unwrap();
    }

    #[test]
    fn test_malformed_document_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, "[not an object").unwrap();

        let err = FileBackend::open(&path).keys().unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_diff_documents() {
        let before: Document = [("a", "1"), ("b", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let after: Document = [("b", "3"), ("c", "4")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let events = diff_documents(&before, Some(&after));
        assert_eq!(
            events,
            vec![
                ChangeEvent::new("a", Some("1".into()), None),
                ChangeEvent::new("b", Some("2".into()), Some("3".into())),
                ChangeEvent::new("c", None, Some("4".into())),
            ]
        );
        assert_eq!(diff_documents(&before, None), vec![ChangeEvent::cleared()]);
        assert!(diff_documents(&Document::new(), None).is_empty());
    }

    #[test]
    fn test_emptied_document_reports_each_removal() {
        let before: Document = [("theme", "dark"), ("__meta_theme", "{}")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let events = diff_documents(&before, Some(&Document::new()));

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event.key.is_some()));
        assert!(events.contains(&ChangeEvent::new("theme", Some("dark".into()), None)));
    }

    #[test]
    fn test_clear_deletes_the_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        let backend = FileBackend::open(&path);

        backend.set("theme", "dark").unwrap();
        backend.clear().unwrap();
        assert!(!path.exists());
        assert!(backend.keys().unwrap().is_empty());

        // Clearing an already absent document succeeds
        backend.clear().unwrap();
    }
}
