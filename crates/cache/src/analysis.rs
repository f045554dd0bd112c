//! Storage analysis: one computed [`StorageEntry`] per managed key

use crate::backend::StorageBackend;
use crate::categorizer::Categorizer;
use crate::metadata::{is_meta_key, EntryHandle};
use std::collections::{BTreeMap, HashSet};
use tabstore_core::{EntryMetadata, Result, StorageEntry};

pub struct StorageAnalyzer<'a> {
    backend: &'a dyn StorageBackend,
    categorizer: &'a Categorizer,
}

impl<'a> StorageAnalyzer<'a> {
    pub fn new(backend: &'a dyn StorageBackend, categorizer: &'a Categorizer) -> Self {
        Self {
            backend,
            categorizer,
        }
    }

    /// Every non-metadata entry, largest first (ties by key)
    pub fn analyze(&self) -> Result<Vec<StorageEntry>> {
        let records: BTreeMap<String, String> = self.backend.entries()?.into_iter().collect();

        let mut entries: Vec<StorageEntry> = records
            .iter()
            .filter_map(|(key, raw_value)| {
                let handle = EntryHandle::new(key)?;
                let raw_meta = records.get(handle.meta_key()).map(String::as_str);
                Some(self.build_entry(&handle, raw_value.clone(), raw_meta))
            })
            .collect();

        entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes).then_with(|| a.key.cmp(&b.key)));
        Ok(entries)
    }

    /// Computed view of one entry from its value and metadata records
    fn build_entry(
        &self,
        handle: &EntryHandle,
        raw_value: String,
        raw_meta: Option<&str>,
    ) -> StorageEntry {
        let metadata = raw_meta.and_then(|raw| serde_json::from_str::<EntryMetadata>(raw).ok());
        let meta_size = raw_meta.map_or(0, |raw| self.backend.entry_size(handle.meta_key(), raw));
        let size_bytes = self.backend.entry_size(handle.value_key(), &raw_value) + meta_size;

        match metadata {
            Some(metadata) => StorageEntry {
                key: handle.value_key().to_string(),
                raw_value,
                size_bytes,
                category: metadata.category,
                priority: metadata.priority,
                last_modified: metadata.last_modified,
                ttl_millis: metadata.ttl,
                compressed: metadata.compressed,
            },
            None => {
                let (category, priority) = self.categorizer.categorize(handle.value_key());
                StorageEntry {
                    key: handle.value_key().to_string(),
                    raw_value,
                    size_bytes,
                    category,
                    priority,
                    last_modified: 0,
                    ttl_millis: None,
                    compressed: false,
                }
            }
        }
    }

    /// Metadata records whose value key no longer exists
    pub fn orphaned_metadata(&self) -> Result<Vec<EntryHandle>> {
        let keys = self.backend.keys()?;
        let values: HashSet<&str> = keys
            .iter()
            .filter(|key| !is_meta_key(key))
            .map(String::as_str)
            .collect();

        Ok(keys
            .iter()
            .filter_map(|key| EntryHandle::from_meta_key(key))
            .filter(|handle| !values.contains(handle.value_key()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChangeSink, MemoryBackend};
    use crate::quota::QuotaTracker;
    use tabstore_core::{Category, Error, Priority};

    /// Answers bulk reads only; any per-key read fails
    struct SnapshotOnly(MemoryBackend);

    impl StorageBackend for SnapshotOnly {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Err(Error::backend_unavailable("get", format!("per-key read of '{key}'")))
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
        fn clear(&self) -> Result<()> {
            self.0.clear()
        }
        fn keys(&self) -> Result<Vec<String>> {
            self.0.keys()
        }
        fn entries(&self) -> Result<Vec<(String, String)>> {
            self.0.entries()
        }
        fn subscribe(&self, sink: ChangeSink) -> Result<()> {
            self.0.subscribe(sink)
        }
    }

    #[test]
    fn test_analysis_and_quota_read_one_snapshot() {
        let backend = SnapshotOnly(MemoryBackend::new());
        backend.set("notes", "abc").unwrap();
        backend.set("__meta_notes", r#"{"lastModified":7,"compressed":false,"category":"session","priority":"low","sizeBytes":8}"#).unwrap();
        backend.set("image-cache-1", "xxxxxxxxxx").unwrap();
        let categorizer = Categorizer::new(&[]).unwrap();

        let entries = StorageAnalyzer::new(&backend, &categorizer).analyze().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|entry| entry.category == Category::Session));

        let used = QuotaTracker::new(5_000).used(&backend).unwrap();
        assert_eq!(used, backend.0.used_bytes());
    }

    #[test]
    fn test_entries_without_metadata_are_categorized_by_name() {
        let backend = MemoryBackend::new();
        backend.set("image-cache-1", "xxxxxxxxxx").unwrap();
        backend.set("notes", "abc").unwrap();
        let categorizer = Categorizer::new(&[]).unwrap();

        let entries = StorageAnalyzer::new(&backend, &categorizer).analyze().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "image-cache-1");
        assert_eq!(entries[0].size_bytes, 23);
        assert_eq!(entries[0].category, Category::ImageCache);
        assert_eq!(entries[0].priority, Priority::Low);
        assert_eq!(entries[0].last_modified, 0);
        assert_eq!(entries[1].category, Category::Uncategorized);
    }

    #[test]
    fn test_metadata_overrides_and_counts_toward_size() {
        let backend = MemoryBackend::new();
        backend.set("notes", "abc").unwrap();
        let meta = r#"{"lastModified":7,"compressed":false,"category":"session","priority":"low","sizeBytes":8}"#;
        backend.set("__meta_notes", meta).unwrap();
        let categorizer = Categorizer::new(&[]).unwrap();

        let entries = StorageAnalyzer::new(&backend, &categorizer).analyze().unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.category, Category::Session);
        assert_eq!(entry.priority, Priority::Low);
        assert_eq!(entry.last_modified, 7);
        assert_eq!(entry.size_bytes, 8 + ("__meta_notes".len() + meta.len()) as u64);
    }

    #[test]
    fn test_orphaned_metadata() {
        let backend = MemoryBackend::new();
        backend.set("kept", "1").unwrap();
        backend.set("__meta_kept", "{}").unwrap();
        backend.set("__meta_gone", "{}").unwrap();
        let categorizer = Categorizer::new(&[]).unwrap();

        let orphans = StorageAnalyzer::new(&backend, &categorizer)
            .orphaned_metadata()
            .unwrap();

        assert_eq!(orphans, vec![EntryHandle::from_meta_key("__meta_gone").unwrap()]);
    }
}
