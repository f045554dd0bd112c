//! Fallible internals behind the manager's public operations

use super::StorageManager;
use crate::analysis::StorageAnalyzer;
use crate::cleanup::CleanupEngine;
use crate::metadata::{self, EntryHandle, MetadataStore};
use std::time::Duration;
use tabstore_core::{CleanupPlan, EntryMetadata, Error, Result, SetOptions};
use tracing::{debug, info, warn};

impl StorageManager {
    pub(crate) fn analyzer(&self) -> StorageAnalyzer<'_> {
        StorageAnalyzer::new(self.backend(), &self.categorizer)
    }

    pub(crate) fn cleanup_engine(&self) -> CleanupEngine<'_> {
        CleanupEngine::new(
            self.backend(),
            &self.categorizer,
            self.quota,
            self.clock.as_ref(),
        )
    }

    pub(crate) fn try_set_item(&self, key: &str, value: &str, options: &SetOptions) -> Result<()> {
        let handle = EntryHandle::new(key)
            .ok_or_else(|| Error::configuration(format!("'{key}' is a reserved metadata key")))?;

        let encoded = self.codec.encode(key, value, options.compress)?;
        let (category, default_priority) = self.categorizer.categorize(key);
        let entry_metadata = EntryMetadata {
            last_modified: self.clock.now_millis(),
            ttl: options.ttl.map(duration_millis),
            compressed: encoded.compressed,
            category,
            priority: options.priority.unwrap_or(default_priority),
            size_bytes: self.backend.entry_size(key, &encoded.raw),
        };
        let meta_json = metadata::serialize(&handle, &entry_metadata)?;

        match self.write_entry(&handle, &encoded.raw, &meta_json) {
            Err(e) if e.is_quota_exceeded() => {
                let needed = entry_metadata.size_bytes
                    + self.backend.entry_size(handle.meta_key(), &meta_json);
                warn!(
                    recovery_hint = ?e.recovery_hint(),
                    "Quota exceeded writing '{}', running {} cleanup for {} bytes",
                    key,
                    self.config.auto_cleanup,
                    needed
                );

                let plan = CleanupPlan::new(self.config.auto_cleanup)
                    .preserving([key])
                    .with_min_bytes(needed);
                let freed = self.cleanup_engine().perform(&plan)?;
                info!("Freed {} bytes, retrying write of '{}'", freed, key);

                self.write_entry(&handle, &encoded.raw, &meta_json)
                    .map_err(|e| match e {
                        Error::QuotaExceeded {
                            key,
                            requested,
                            available,
                            ..
                        } => Error::capacity_exhausted(key, requested, available),
                        other => other,
                    })
            }
            other => other,
        }
    }

    /// Write value then metadata, restoring the previous pair on a partial write
    fn write_entry(&self, handle: &EntryHandle, raw: &str, meta_json: &str) -> Result<()> {
        let store = MetadataStore::new(self.backend());
        let previous = self.backend.get(handle.value_key())?;

        self.backend.set(handle.value_key(), raw)?;
        if let Err(e) = store.write_raw(handle, meta_json) {
            self.rollback(handle, previous);
            return Err(e);
        }

        debug!("Stored '{}' ({} bytes)", handle.value_key(), raw.len());
        Ok(())
    }

    /// The metadata write failed, so only the value needs restoring
    fn rollback(&self, handle: &EntryHandle, previous: Option<String>) {
        let restored = match previous {
            Some(old) => self.backend.set(handle.value_key(), &old),
            None => self.backend.remove(handle.value_key()),
        };

        if let Err(e) = restored {
            warn!(
                "Could not restore '{}' after a failed write, removing it: {}",
                handle.value_key(),
                e
            );
            let _ = self.backend.remove(handle.value_key());
            let _ = MetadataStore::new(self.backend()).remove(handle);
        }
    }

    pub(crate) fn try_get_item(&self, key: &str) -> Result<Option<String>> {
        let Some(handle) = EntryHandle::new(key) else {
            return Ok(None);
        };
        let Some(raw) = self.backend.get(handle.value_key())? else {
            return Ok(None);
        };

        let compressed = MetadataStore::new(self.backend())
            .read_lenient(&handle)?
            .is_some_and(|entry_metadata| entry_metadata.compressed);
        self.logical_value(key, raw, compressed).map(Some)
    }

    /// Stored representation back to the value the caller wrote
    pub(crate) fn logical_value(&self, key: &str, raw: String, compressed: bool) -> Result<String> {
        if compressed {
            self.codec.decode(key, &raw, true)
        } else {
            Ok(raw)
        }
    }

    pub(crate) fn try_remove_item(&self, key: &str) -> Result<()> {
        let Some(handle) = EntryHandle::new(key) else {
            return Ok(());
        };
        self.backend.remove(handle.value_key())?;
        MetadataStore::new(self.backend()).remove(&handle)
    }
}

fn duration_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}
