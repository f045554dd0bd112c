//! Eviction strategies for cleanup passes
//!
//! Each strategy picks the candidates of a pass and the order in which they are
//! removed. The [`CleanupEngine`](crate::cleanup::CleanupEngine) walks that
//! order until its stop condition holds.

mod factory;
mod policies;
mod traits;

// Re-export public API
pub use factory::{create_eviction_strategy, strategy_for};
pub use policies::{LruStrategy, PriorityStrategy, SizeStrategy, TtlStrategy};
pub use traits::EvictionStrategy;
