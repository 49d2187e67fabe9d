//! Counter store port.

use async_trait::async_trait;
use std::time::Duration;

/// Atomic counter backend - abstraction over Redis and the in-process fallback.
///
/// Implementations must perform the check and the increment as one atomic
/// unit: either the whole increment is recorded, or nothing is.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Add `increment` to the counter at `key` unless the result would exceed
    /// `limit`. A new key starts at 0 and expires `ttl` after its first
    /// increment; later increments do not extend the expiry.
    async fn check_and_increment(
        &self,
        key: &str,
        limit: u64,
        increment: u64,
        ttl: Duration,
    ) -> Result<CounterCheck, CounterStoreError>;

    /// Current value at `key`, 0 if absent or expired.
    async fn current(&self, key: &str) -> Result<u64, CounterStoreError>;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;
}

/// Result of a check-and-increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterCheck {
    pub allowed: bool,
    /// The new value when allowed, the unchanged stored value otherwise.
    pub current: u64,
    /// Time until the key expires. `None` if the key is missing or has no expiry.
    pub remaining_ttl: Option<Duration>,
}

/// Counter store errors.
#[derive(Debug, thiserror::Error)]
pub enum CounterStoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}
