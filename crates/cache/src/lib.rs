//! Quota-aware storage manager for tabstore
//!
//! This crate keeps a size-limited key/value medium healthy:
//! - Metadata side channel (category, priority, TTL, compression)
//! - Quota accounting and automatic recovery from quota faults
//! - Eviction strategies (`lru`, `ttl`, `size`, `priority`)
//! - Change notifications from other tabs or processes
//! - Health reports, import/export and a JSON convenience layer

pub mod analysis;
pub mod backend;
pub mod categorizer;
pub mod cleanup;
pub mod clock;
pub mod codec;
pub mod eviction;
pub mod health;
mod json;
pub mod manager;
pub mod metadata;
pub mod notifier;
pub mod quota;
mod transfer;

pub use backend::{ChangeSink, FileBackend, MemoryBackend, StorageBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{StorageManager, StorageManagerBuilder};
pub use tabstore_config::ManagerConfig;
pub use tabstore_core::{
    Category, ChangeEvent, CleanupPlan, CleanupStrategy, Error, EventKind, HealthReport,
    ListenerId, Priority, QuotaSnapshot, Result, SetOptions, StorageEntry,
};
