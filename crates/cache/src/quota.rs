//! Quota accounting over a backend

use crate::backend::StorageBackend;
use tabstore_core::{QuotaSnapshot, Result};

/// Measures how much of the backend is in use
#[derive(Debug, Clone, Copy)]
pub struct QuotaTracker {
    /// Ceiling used when the backend cannot report its capacity
    ceiling: u64,
}

impl QuotaTracker {
    pub fn new(ceiling: u64) -> Self {
        Self { ceiling }
    }

    pub fn total(&self, backend: &dyn StorageBackend) -> u64 {
        backend.capacity().unwrap_or(self.ceiling)
    }

    /// Sum of every stored record, metadata included
    pub fn used(&self, backend: &dyn StorageBackend) -> Result<u64> {
        Ok(backend
            .entries()?
            .iter()
            .map(|(key, value)| backend.entry_size(key, value))
            .sum())
    }

    pub fn snapshot(&self, backend: &dyn StorageBackend) -> Result<QuotaSnapshot> {
        Ok(QuotaSnapshot::new(self.used(backend)?, self.total(backend)))
    }
}
