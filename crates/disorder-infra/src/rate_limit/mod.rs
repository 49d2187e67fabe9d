//! Counter store implementations - Redis and in-memory fallback.

mod memory;

use std::sync::Arc;

use disorder_core::ports::CounterStore;

pub use memory::InMemoryCounterStore;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisCounterStore};

#[cfg(feature = "redis")]
use disorder_core::ports::CounterStoreError;

/// Connect the shared Redis counter store, or fall back to in-process
/// counters when Redis is unreachable and the fallback is enabled.
#[cfg(feature = "redis")]
pub async fn connect_counter_store(
    config: &RedisConfig,
) -> Result<Arc<dyn CounterStore>, CounterStoreError> {
    match RedisCounterStore::new(config).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) if config.fallback_to_memory => {
            tracing::warn!(
                url = %config.url,
                error = %e,
                "Redis unavailable - rate limiting falls back to in-memory counters (single node only)"
            );
            Ok(memory_counter_store())
        }
        Err(e) => Err(e),
    }
}

/// Process-local counters. Limits are not shared across instances.
pub fn memory_counter_store() -> Arc<dyn CounterStore> {
    Arc::new(InMemoryCounterStore::new())
}
