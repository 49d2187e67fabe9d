//! # Disorder Infrastructure
//!
//! Concrete implementations of the ports defined in `disorder-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `redis` - Redis-backed counters shared across instances

pub mod api_keys;
pub mod rate_limit;

// Re-exports - In-Memory
pub use api_keys::{InMemoryApiKeyRepository, seed_demo_key};
pub use rate_limit::{InMemoryCounterStore, memory_counter_store};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use rate_limit::{RedisConfig, RedisCounterStore, connect_counter_store};
