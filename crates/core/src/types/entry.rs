//! Entry metadata and the analysed entry view

use super::category::{Category, Priority};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metadata persisted next to every managed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    /// Epoch milliseconds of the last successful write
    pub last_modified: i64,
    /// Time to live in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    pub compressed: bool,
    pub category: Category,
    pub priority: Priority,
    /// Size of the stored value record (key + stored value)
    pub size_bytes: u64,
}

impl EntryMetadata {
    /// Whether the entry outlived its TTL at `now_ms`
    #[must_use]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        is_expired(self.last_modified, self.ttl, now_ms)
    }
}

/// Computed view of one managed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEntry {
    pub key: String,
    /// Payload as stored, possibly compressed
    #[serde(skip)]
    pub raw_value: String,
    /// Footprint of the entry: value record plus metadata record
    pub size_bytes: u64,
    pub category: Category,
    pub priority: Priority,
    /// Epoch milliseconds; 0 when the entry carries no metadata
    pub last_modified: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_millis: Option<u64>,
    pub compressed: bool,
}

impl StorageEntry {
    #[must_use]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        is_expired(self.last_modified, self.ttl_millis, now_ms)
    }
}

fn is_expired(last_modified: i64, ttl: Option<u64>, now_ms: i64) -> bool {
    match ttl {
        Some(ttl) => {
            let ttl = i64::try_from(ttl).unwrap_or(i64::MAX);
            now_ms.saturating_sub(last_modified) > ttl
        }
        None => false,
    }
}

/// Options accepted by `set_item`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Compress the payload when it exceeds the compression threshold
    pub compress: bool,
    /// Expire the entry this long after the write
    pub ttl: Option<Duration>,
    /// Override the priority derived from the key's category
    pub priority: Option<Priority>,
}

impl SetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}
