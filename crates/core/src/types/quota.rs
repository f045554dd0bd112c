//! Quota snapshots

use serde::Serialize;

/// Point-in-time view of the backend's space usage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotaSnapshot {
    pub used: u64,
    pub total: u64,
    pub available: u64,
    /// `used / total * 100`, clamped to `[0, 100]`
    pub percentage: f64,
}

impl QuotaSnapshot {
    #[must_use]
    pub fn new(used: u64, total: u64) -> Self {
        Self {
            used,
            total,
            available: total.saturating_sub(used),
            percentage: usage_percentage(used, total),
        }
    }

    /// Snapshot reported when the backend cannot be read
    #[must_use]
    pub fn unavailable(total: u64) -> Self {
        Self::new(0, total)
    }
}

/// Percentage of `total` occupied by `used`, clamped to `[0, 100]`
#[must_use]
pub fn usage_percentage(used: u64, total: u64) -> f64 {
    if total == 0 {
        return if used > 0 { 100.0 } else { 0.0 };
    }
    (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}
