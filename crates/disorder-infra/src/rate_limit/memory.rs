//! In-memory counter store - used as fallback when Redis is unavailable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use disorder_core::ports::{CounterCheck, CounterStore, CounterStoreError};

struct CounterEntry {
    count: u64,
    expires_at: Instant,
}

/// In-process fixed-window counters.
///
/// Expiry is lazy: an entry is reset when it is next touched after its window
/// ends, and expired entries are purged whenever a new window opens. Checks are serialized by a single mutex, so they are atomic within
/// this process only. Each instance of a multi-node deployment keeps its own
/// counters, which multiplies the effective limits.
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, CounterEntry>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn check_and_increment(
        &self,
        key: &str,
        limit: u64,
        increment: u64,
        ttl: Duration,
    ) -> Result<CounterCheck, CounterStoreError> {
        let now = Instant::now();
        let mut counters = self.counters.lock().await;

        let live = counters
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| (entry.count, entry.expires_at));

        match live {
            Some((count, expires_at)) => {
                let remaining_ttl = Some(expires_at.saturating_duration_since(now));
                if count.saturating_add(increment) > limit {
                    return Ok(CounterCheck {
                        allowed: false,
                        current: count,
                        remaining_ttl,
                    });
                }

                let count = count + increment;
                counters.insert(key.to_string(), CounterEntry { count, expires_at });
                Ok(CounterCheck {
                    allowed: true,
                    current: count,
                    remaining_ttl,
                })
            }
            None => {
                // Bucket keys are never revisited once their window ends.
                counters.retain(|_, entry| now < entry.expires_at);

                if increment > limit {
                    return Ok(CounterCheck {
                        allowed: false,
                        current: 0,
                        remaining_ttl: None,
                    });
                }

                counters.insert(
                    key.to_string(),
                    CounterEntry {
                        count: increment,
                        expires_at: now + ttl,
                    },
                );
                Ok(CounterCheck {
                    allowed: true,
                    current: increment,
                    remaining_ttl: Some(ttl),
                })
            }
        }
    }

    async fn current(&self, key: &str) -> Result<u64, CounterStoreError> {
        let now = Instant::now();
        let counters = self.counters.lock().await;
        Ok(counters
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.count)
            .unwrap_or(0))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_increments_until_limit() {
        let store = InMemoryCounterStore::new();

        for expected in 1..=3 {
            let check = store.check_and_increment("k", 3, 1, TTL).await.unwrap();
            assert!(check.allowed);
            assert_eq!(check.current, expected);
        }

        let check = store.check_and_increment("k", 3, 1, TTL).await.unwrap();
        assert!(!check.allowed);
        assert_eq!(check.current, 3);
        assert!(check.remaining_ttl.unwrap() <= TTL);
        assert_eq!(store.current("k").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_oversized_increment_records_nothing() {
        let store = InMemoryCounterStore::new();

        let check = store.check_and_increment("k", 5, 6, TTL).await.unwrap();
        assert!(!check.allowed);
        assert_eq!(check.remaining_ttl, None);
        assert_eq!(store.current("k").await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_admit_exactly_limit() {
        let store = Arc::new(InMemoryCounterStore::new());

        let tasks = (0..20).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.check_and_increment("race", 10, 1, TTL).await })
        });

        let admitted = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .filter(|check| check.allowed)
            .count();

        assert_eq!(admitted, 10);
        assert_eq!(store.current("race").await.unwrap(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_larger_increments_never_overshoot() {
        let store = Arc::new(InMemoryCounterStore::new());

        let tasks = (0..10).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.check_and_increment("batch", 20, 3, TTL).await })
        });

        let admitted = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .filter(|check| check.allowed)
            .count();

        assert_eq!(admitted, 6);
        assert_eq!(store.current("batch").await.unwrap(), 18);
    }

    #[tokio::test]
    async fn test_fixed_window_resets_after_ttl() {
        let store = InMemoryCounterStore::new();
        let ttl = Duration::from_secs(1);

        assert!(store.check_and_increment("window", 2, 1, ttl).await.unwrap().allowed);
        assert!(store.check_and_increment("window", 2, 1, ttl).await.unwrap().allowed);
        assert!(!store.check_and_increment("window", 2, 1, ttl).await.unwrap().allowed);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let check = store.check_and_increment("window", 2, 1, ttl).await.unwrap();
        assert!(check.allowed);
        assert_eq!(check.current, 1);
    }

    #[tokio::test]
    async fn test_expiry_is_not_renewed() {
        let store = InMemoryCounterStore::new();
        let ttl = Duration::from_millis(600);

        assert!(store.check_and_increment("fixed", 10, 1, ttl).await.unwrap().allowed);
        tokio::time::sleep(Duration::from_millis(400)).await;
        let check = store.check_and_increment("fixed", 10, 1, ttl).await.unwrap();
        assert!(check.remaining_ttl.unwrap() < Duration::from_millis(300));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.current("fixed").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_expired_buckets_are_purged() {
        let store = InMemoryCounterStore::new();
        let short = Duration::from_millis(1);

        for i in 0..1000 {
            let key = format!("bucket:{}", i);
            assert!(store.check_and_increment(&key, 5, 1, short).await.unwrap().allowed);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(store.check_and_increment("bucket:new", 5, 1, TTL).await.unwrap().allowed);
        assert_eq!(store.counters.lock().await.len(), 1);
    }
}
