//! Eviction strategy implementations

mod lru;
mod priority;
mod size;
mod ttl;

pub use lru::LruStrategy;
pub use priority::PriorityStrategy;
pub use size::SizeStrategy;
pub use ttl::TtlStrategy;
