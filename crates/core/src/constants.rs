/// Constants used throughout the tabstore codebase
// Reserved key namespace for the metadata side channel
pub const META_PREFIX: &str = "__meta_";

// Quota ceiling used when the backend cannot report its own capacity (5 MiB,
// the common Local Storage allowance)
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

// Compression
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 1024;
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

// Health reporting
pub const DEFAULT_LARGEST_ITEMS: usize = 10;
pub const WARNING_PERCENTAGE: f64 = 75.0;
pub const CRITICAL_PERCENTAGE: f64 = 90.0;
pub const WARNING_RECOMMENDATION: &str = "Warning: consider cleanup";
pub const CRITICAL_RECOMMENDATION: &str = "Critical: free space immediately";

// Environment variable names
pub const TABSTORE_CONFIG_VAR: &str = "TABSTORE_CONFIG";
pub const TABSTORE_QUOTA_BYTES_VAR: &str = "TABSTORE_QUOTA_BYTES";
pub const TABSTORE_COMPRESSION_THRESHOLD_VAR: &str = "TABSTORE_COMPRESSION_THRESHOLD";
pub const TABSTORE_LARGEST_ITEMS_VAR: &str = "TABSTORE_LARGEST_ITEMS";
pub const TABSTORE_AUTO_CLEANUP_VAR: &str = "TABSTORE_AUTO_CLEANUP";
