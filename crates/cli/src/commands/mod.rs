use clap::Subcommand;
use std::path::PathBuf;
use tabstore_core::{CleanupStrategy, Priority};

pub mod entries;
pub mod maintenance;
pub mod report;
pub mod transfer;
pub mod watch;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value stored under a key
    Get { key: String },

    /// Store a value under a key
    Set {
        key: String,
        value: String,

        /// Compress the value when it is larger than the compression threshold
        #[arg(long)]
        compress: bool,

        /// Expire the entry after this many seconds
        #[arg(long, value_name = "SECONDS")]
        ttl_secs: Option<u64>,

        /// Override the priority derived from the key name (critical, normal, low)
        #[arg(long)]
        priority: Option<Priority>,
    },

    /// Remove a key and its metadata
    #[command(visible_alias = "rm")]
    Remove { key: String },

    /// Remove every key
    Clear,

    /// Show quota usage
    Quota,

    /// List every entry, largest first
    Analyze,

    /// Evict entries until usage falls to the target
    Cleanup {
        /// Eviction order (lru, ttl, size, priority)
        #[arg(long, default_value = "priority")]
        strategy: CleanupStrategy,

        /// Usage percentage to stop at
        #[arg(long, default_value_t = 0.0)]
        target: f64,

        /// Keys that must not be evicted (repeatable)
        #[arg(long = "preserve", value_name = "KEY")]
        preserve: Vec<String>,

        /// Let the priority strategy evict critical entries too
        #[arg(long)]
        evict_critical: bool,
    },

    /// Remove every entry of a category
    ClearCategory { category: String },

    /// Show a health report with recommendations
    Health,

    /// Export every entry as a JSON object
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Import entries from a JSON object file
    Import { file: PathBuf },

    /// Drop metadata whose value has disappeared
    Repair,

    /// Print changes made by other processes until interrupted
    Watch,
}
