//! Core domain types for `tabstore`.
//!
//! ## Organization
//!
//! - **`category`**: Semantic categories, eviction priorities and naming rules
//! - **`entry`**: Persisted entry metadata, the analysed entry view and write options
//! - **`quota`**: Quota snapshots
//! - **`cleanup`**: Cleanup strategies and plans
//! - **`health`**: Health reports
//! - **`events`**: Cross-context change events and listener handles

pub mod category;
pub mod cleanup;
pub mod entry;
pub mod events;
pub mod health;
pub mod quota;

// Re-export all public types for convenient access
pub use category::*;
pub use cleanup::*;
pub use entry::*;
pub use events::*;
pub use health::*;
pub use quota::*;
