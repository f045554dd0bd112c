//! Core storage backend trait definition

use std::sync::Arc;
use tabstore_core::{ChangeEvent, Result};

/// Callback receiving changes made by other execution contexts
pub type ChangeSink = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Byte-oriented key/value medium with a finite capacity
///
/// Implementations serialize individual calls; multi-step sequences built on
/// top of them are not atomic across contexts.
pub trait StorageBackend: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, failing with `Error::QuotaExceeded` when full
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key
    fn clear(&self) -> Result<()>;

    /// List every stored key
    fn keys(&self) -> Result<Vec<String>>;

    /// Every stored key with its value, read as one snapshot where the medium allows
    fn entries(&self) -> Result<Vec<(String, String)>> {
        let mut entries = Vec::new();
        for key in self.keys()? {
            // Keys removed by another context mid-scan are skipped
            if let Some(value) = self.get(&key)? {
                entries.push((key, value));
            }
        }
        Ok(entries)
    }

    /// Best-effort capacity in bytes, `None` when the platform cannot tell
    fn capacity(&self) -> Option<u64> {
        None
    }

    /// Bytes a stored key/value pair occupies
    fn entry_size(&self, key: &str, value: &str) -> u64 {
        (key.len() + value.len()) as u64
    }

    /// Register for changes made through other handles on the same medium
    ///
    /// Changes made through this handle are never reported back to it.
    fn subscribe(&self, sink: ChangeSink) -> Result<()>;
}
