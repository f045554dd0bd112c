//! Storage health reporting

use std::collections::BTreeMap;
use tabstore_config::ManagerConfig;
use tabstore_core::{
    HealthReport, LargestItem, QuotaSnapshot, StorageEntry, CRITICAL_RECOMMENDATION,
    WARNING_RECOMMENDATION,
};

/// Builds [`HealthReport`]s from a quota snapshot and an analysis
#[derive(Debug, Clone, Copy)]
pub struct HealthReporter {
    largest_items: usize,
    warning_percentage: f64,
    critical_percentage: f64,
}

impl HealthReporter {
    pub fn new(largest_items: usize, warning_percentage: f64, critical_percentage: f64) -> Self {
        Self {
            largest_items,
            warning_percentage,
            critical_percentage,
        }
    }

    pub fn from_config(config: &ManagerConfig) -> Self {
        Self::new(
            config.largest_items,
            config.warning_percentage,
            config.critical_percentage,
        )
    }

    /// `entries` must already be sorted largest first
    pub fn report(
        &self,
        quota: QuotaSnapshot,
        entries: &[StorageEntry],
        now_millis: i64,
    ) -> HealthReport {
        let mut category_sizes = BTreeMap::new();
        for entry in entries {
            *category_sizes.entry(entry.category).or_insert(0) += entry.size_bytes;
        }

        HealthReport {
            quota,
            total_items: entries.len(),
            total_size: entries.iter().map(|entry| entry.size_bytes).sum(),
            largest_items: entries
                .iter()
                .take(self.largest_items)
                .map(|entry| LargestItem {
                    key: entry.key.clone(),
                    size_kb: kilobytes(entry.size_bytes),
                })
                .collect(),
            category_sizes,
            expired_items: entries
                .iter()
                .filter(|entry| entry.is_expired(now_millis))
                .count(),
            recommendations: self.recommendations(quota.percentage),
        }
    }

    pub fn recommendations(&self, percentage: f64) -> Vec<String> {
        if percentage >= self.critical_percentage {
            vec![CRITICAL_RECOMMENDATION.to_string()]
        } else if percentage >= self.warning_percentage {
            vec![WARNING_RECOMMENDATION.to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Bytes to KiB, rounded to two decimals
fn kilobytes(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}
