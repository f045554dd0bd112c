//! Cleanup strategies and plans

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Order in which entries are evicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupStrategy {
    /// Oldest `last_modified` first
    Lru,
    /// Every expired entry, nothing else
    Ttl,
    /// Largest entry first
    Size,
    /// Low, then normal, then critical priority
    Priority,
}

impl CleanupStrategy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CleanupStrategy::Lru => "lru",
            CleanupStrategy::Ttl => "ttl",
            CleanupStrategy::Size => "size",
            CleanupStrategy::Priority => "priority",
        }
    }
}

impl fmt::Display for CleanupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleanupStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lru" => Ok(CleanupStrategy::Lru),
            "ttl" => Ok(CleanupStrategy::Ttl),
            "size" => Ok(CleanupStrategy::Size),
            "priority" => Ok(CleanupStrategy::Priority),
            other => Err(format!("unknown cleanup strategy '{other}'")),
        }
    }
}

/// Parameters of one cleanup pass
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupPlan {
    pub strategy: CleanupStrategy,
    /// Stop once usage falls to this percentage (0 frees as much as possible)
    pub target_percentage: f64,
    /// Keys that no strategy other than `ttl` may remove
    pub preserve_keys: HashSet<String>,
    /// Stop once at least this many bytes were freed
    pub min_bytes: Option<u64>,
    /// Let the `priority` strategy fall through to critical entries
    pub evict_critical: bool,
}

impl CleanupPlan {
    #[must_use]
    pub fn new(strategy: CleanupStrategy) -> Self {
        Self {
            strategy,
            target_percentage: 0.0,
            preserve_keys: HashSet::new(),
            min_bytes: None,
            evict_critical: false,
        }
    }

    #[must_use]
    pub fn with_target(mut self, percentage: f64) -> Self {
        self.target_percentage = percentage.clamp(0.0, 100.0);
        self
    }

    #[must_use]
    pub fn preserving<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preserve_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_min_bytes(mut self, bytes: u64) -> Self {
        self.min_bytes = Some(bytes);
        self
    }

    #[must_use]
    pub fn evicting_critical(mut self) -> Self {
        self.evict_critical = true;
        self
    }
}

impl Default for CleanupPlan {
    fn default() -> Self {
        Self::new(CleanupStrategy::Priority)
    }
}
