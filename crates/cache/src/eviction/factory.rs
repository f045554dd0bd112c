//! Factory for creating eviction strategies

use tabstore_core::{CleanupStrategy, Error, Result};

use super::policies::{LruStrategy, PriorityStrategy, SizeStrategy, TtlStrategy};
use super::traits::EvictionStrategy;

/// Eviction strategy factory
pub fn create_eviction_strategy(name: &str) -> Result<Box<dyn EvictionStrategy>> {
    let strategy: CleanupStrategy = name
        .parse()
        .map_err(|_| Error::configuration(format!("Unknown cleanup strategy: {name}")))?;
    Ok(strategy_for(strategy))
}

pub fn strategy_for(strategy: CleanupStrategy) -> Box<dyn EvictionStrategy> {
    match strategy {
        CleanupStrategy::Lru => Box::new(LruStrategy),
        CleanupStrategy::Ttl => Box::new(TtlStrategy),
        CleanupStrategy::Size => Box::new(SizeStrategy),
        CleanupStrategy::Priority => Box::new(PriorityStrategy),
    }
}
