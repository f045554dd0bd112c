//! Health report types

use super::category::Category;
use super::quota::QuotaSnapshot;
use serde::Serialize;
use std::collections::BTreeMap;

/// One of the largest entries, sized in kilobytes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestItem {
    pub key: String,
    pub size_kb: f64,
}

/// Aggregated view of the storage area with actionable recommendations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub quota: QuotaSnapshot,
    pub total_items: usize,
    pub total_size: u64,
    pub largest_items: Vec<LargestItem>,
    pub category_sizes: BTreeMap<Category, u64>,
    pub expired_items: usize,
    pub recommendations: Vec<String>,
}
