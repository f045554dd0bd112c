//! The metadata side channel
//!
//! Every managed value `key` may carry one metadata record stored under
//! `__meta_<key>`. [`EntryHandle`] pairs the two names so the rest of the
//! engine never builds metadata keys by hand.

use crate::backend::StorageBackend;
use tabstore_core::{EntryMetadata, Error, Result, SerializationOp, META_PREFIX};
use tracing::debug;

/// Whether `key` lives in the reserved metadata namespace
pub fn is_meta_key(key: &str) -> bool {
    key.starts_with(META_PREFIX)
}

/// A value key together with its metadata key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHandle {
    value_key: String,
    meta_key: String,
}

impl EntryHandle {
    /// Handle for a value key; `None` for keys in the metadata namespace
    pub fn new(key: &str) -> Option<Self> {
        if is_meta_key(key) {
            return None;
        }
        Some(Self {
            value_key: key.to_string(),
            meta_key: format!("{META_PREFIX}{key}"),
        })
    }

    /// Handle owning the metadata key `meta_key`
    pub fn from_meta_key(meta_key: &str) -> Option<Self> {
        let value_key = meta_key.strip_prefix(META_PREFIX)?;
        Some(Self {
            value_key: value_key.to_string(),
            meta_key: meta_key.to_string(),
        })
    }

    pub fn value_key(&self) -> &str {
        &self.value_key
    }

    pub fn meta_key(&self) -> &str {
        &self.meta_key
    }
}

/// Reads and writes metadata records through a backend
pub struct MetadataStore<'a> {
    backend: &'a dyn StorageBackend,
}

impl<'a> MetadataStore<'a> {
    pub fn new(backend: &'a dyn StorageBackend) -> Self {
        Self { backend }
    }

    /// Stored metadata JSON, unparsed
    pub fn read_raw(&self, handle: &EntryHandle) -> Result<Option<String>> {
        self.backend.get(handle.meta_key())
    }

    /// Parsed metadata; an unparseable record is reported as corruption
    pub fn read(&self, handle: &EntryHandle) -> Result<Option<EntryMetadata>> {
        match self.read_raw(handle)? {
            None => Ok(None),
            Some(raw) => parse(handle, &raw).map(Some),
        }
    }

    /// Parsed metadata, treating unreadable records as missing
    pub fn read_lenient(&self, handle: &EntryHandle) -> Result<Option<EntryMetadata>> {
        match self.read(handle) {
            Err(e) if e.is_corruption() => {
                debug!("Ignoring unreadable metadata for '{}': {}", handle.value_key(), e);
                Ok(None)
            }
            other => other,
        }
    }

    pub fn write_raw(&self, handle: &EntryHandle, raw: &str) -> Result<()> {
        self.backend.set(handle.meta_key(), raw)
    }

    pub fn remove(&self, handle: &EntryHandle) -> Result<()> {
        self.backend.remove(handle.meta_key())
    }
}

/// Serialize metadata to the JSON stored under the meta key
pub fn serialize(handle: &EntryHandle, metadata: &EntryMetadata) -> Result<String> {
    serde_json::to_string(metadata)
        .map_err(|e| Error::serialization(handle.meta_key(), SerializationOp::Serialize, e))
}

fn parse(handle: &EntryHandle, raw: &str) -> Result<EntryMetadata> {
    serde_json::from_str(raw)
        .map_err(|e| Error::corrupted(handle.meta_key(), format!("unreadable metadata: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use tabstore_core::{Category, Priority};

    #[test]
    fn test_handle_names() {
        let handle = EntryHandle::new("user-settings").unwrap();
        assert_eq!(handle.meta_key(), "__meta_user-settings");
        assert_eq!(EntryHandle::from_meta_key("__meta_user-settings"), Some(handle));
        assert_eq!(EntryHandle::new("__meta_x"), None);
        assert_eq!(EntryHandle::from_meta_key("plain"), None);
    }

    #[test]
    fn test_metadata_wire_format() {
        let backend = MemoryBackend::new();
        let store = MetadataStore::new(&backend);
        let handle = EntryHandle::new("vocab-list").unwrap();
        let metadata = EntryMetadata {
            last_modified: 42,
            ttl: None,
            compressed: false,
            category: Category::Vocabulary,
            priority: Priority::Normal,
            size_bytes: 12,
        };

        store.write_raw(&handle, &serialize(&handle, &metadata).unwrap()).unwrap();

        assert_eq!(
            backend.get("__meta_vocab-list").unwrap().as_deref(),
            Some(r#"{"lastModified":42,"compressed":false,"category":"vocabulary","priority":"normal","sizeBytes":12}"#)
        );
        assert_eq!(store.read(&handle).unwrap(), Some(metadata));
    }

    #[test]
    fn test_unreadable_metadata() {
        let backend = MemoryBackend::new();
        backend.set("__meta_k", "{broken").unwrap();
        let store = MetadataStore::new(&backend);
        let handle = EntryHandle::new("k").unwrap();

        assert!(store.read(&handle).unwrap_err().is_corruption());
        assert_eq!(store.read_lenient(&handle).unwrap(), None);
    }
}
