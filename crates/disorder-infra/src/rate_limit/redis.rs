//! Redis counter store using an atomic Lua check-and-increment.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};

use disorder_core::ports::{CounterCheck, CounterStore, CounterStoreError};

/// Check-and-increment in one server-side step.
///
/// KEYS[1] counter key; ARGV limit, increment, ttl seconds.
/// Returns {allowed (0|1), value, ttl}. A stored value that is not a
/// non-negative integer is discarded and counted as 0. The expiry is attached only when the key has
/// none, so the window never slides.
const CHECK_AND_INCREMENT: &str = r#"
local key = KEYS[1]
local limit = tonumber(ARGV[1])
local increment = tonumber(ARGV[2])
local ttl = tonumber(ARGV[3])

local raw = redis.call('GET', key)
local current_value = 0
if raw then
    current_value = tonumber(raw)
    if current_value == nil or current_value < 0 or current_value ~= math.floor(current_value) then
        redis.call('DEL', key)
        current_value = 0
    end
end

if current_value + increment > limit then
    return {0, current_value, redis.call('TTL', key)}
end

local new_value = redis.call('INCRBY', key, increment)
local remaining = redis.call('TTL', key)
if remaining < 0 then
    redis.call('EXPIRE', key, ttl)
    remaining = ttl
end

return {1, new_value, remaining}
"#;

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whether to fallback to in-memory counters if Redis is unavailable
    pub fallback_to_memory: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            fallback_to_memory: true,
        }
    }
}

/// Redis-backed counter store, shared by every instance of the service.
pub struct RedisCounterStore {
    conn: ConnectionManager,
    script: Script,
}

impl RedisCounterStore {
    pub async fn new(config: &RedisConfig) -> Result<Self, CounterStoreError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| CounterStoreError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let mut conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| CounterStoreError::Timeout(config.connect_timeout))?
            .map_err(|e| CounterStoreError::Connection(e.to_string()))?;

        let _: () = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CounterStoreError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis counter store");

        Ok(Self {
            conn,
            script: Script::new(CHECK_AND_INCREMENT),
        })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn check_and_increment(
        &self,
        key: &str,
        limit: u64,
        increment: u64,
        ttl: Duration,
    ) -> Result<CounterCheck, CounterStoreError> {
        let mut conn = self.conn.clone();

        let result: Vec<i64> = self
            .script
            .key(key)
            .arg(limit)
            .arg(increment)
            .arg(ttl.as_secs().max(1))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| CounterStoreError::Operation(e.to_string()))?;

        let allowed = result.first().copied().unwrap_or(0) == 1;
        let current = result.get(1).copied().unwrap_or(0).max(0) as u64;
        // TTL reports -1 (no expiry) and -2 (missing key) as negatives.
        let remaining_ttl = result
            .get(2)
            .copied()
            .filter(|ttl| *ttl >= 0)
            .map(|ttl| Duration::from_secs(ttl as u64));

        Ok(CounterCheck {
            allowed,
            current,
            remaining_ttl,
        })
    }

    async fn current(&self, key: &str) -> Result<u64, CounterStoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CounterStoreError::Operation(e.to_string()))?;

        Ok(raw.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::sync::Arc;

    async fn get_test_store() -> Option<RedisCounterStore> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            fallback_to_memory: false,
        };

        RedisCounterStore::new(&config).await.ok()
    }

    fn test_key(name: &str) -> String {
        format!("test:counter:{}:{}", name, uuid::Uuid::new_v4())
    }

    async fn cleanup(store: &RedisCounterStore, key: &str) {
        let mut conn = store.conn.clone();
        let _: Result<(), _> = conn.del(key).await;
    }

    #[tokio::test]
    async fn test_redis_check_and_increment() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => {
                tracing::warn!("Redis not available, skipping test");
                return;
            }
        };
        let key = test_key("basic");
        let ttl = Duration::from_secs(60);

        for expected in 1..=5 {
            let check = store.check_and_increment(&key, 5, 1, ttl).await.unwrap();
            assert!(check.allowed);
            assert_eq!(check.current, expected);
        }

        let check = store.check_and_increment(&key, 5, 1, ttl).await.unwrap();
        assert!(!check.allowed);
        assert_eq!(check.current, 5);
        assert!(check.remaining_ttl.unwrap() > Duration::ZERO);

        cleanup(&store, &key).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_redis_concurrent_checks_admit_exactly_limit() {
        let store = match get_test_store().await {
            Some(s) => Arc::new(s),
            None => return,
        };
        let key = test_key("race");

        let tasks = (0..20).map(|_| {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move {
                store
                    .check_and_increment(&key, 10, 1, Duration::from_secs(60))
                    .await
            })
        });

        let admitted = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .filter(|check| check.allowed)
            .count();

        assert_eq!(admitted, 10);
        assert_eq!(store.current(&key).await.unwrap(), 10);

        cleanup(&store, &key).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_redis_larger_increments_never_overshoot() {
        let store = match get_test_store().await {
            Some(s) => Arc::new(s),
            None => return,
        };
        let key = test_key("batch");

        let tasks = (0..10).map(|_| {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move {
                store
                    .check_and_increment(&key, 20, 3, Duration::from_secs(60))
                    .await
            })
        });

        let admitted = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .filter(|check| check.allowed)
            .count();

        assert_eq!(admitted, 6);
        assert_eq!(store.current(&key).await.unwrap(), 18);

        cleanup(&store, &key).await;
    }

    #[tokio::test]
    async fn test_redis_fixed_window_reset() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => return,
        };
        let key = test_key("window");
        let ttl = Duration::from_secs(1);

        assert!(store.check_and_increment(&key, 2, 1, ttl).await.unwrap().allowed);
        assert!(store.check_and_increment(&key, 2, 1, ttl).await.unwrap().allowed);
        assert!(!store.check_and_increment(&key, 2, 1, ttl).await.unwrap().allowed);

        // Wait for reset
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(store.check_and_increment(&key, 2, 1, ttl).await.unwrap().allowed);

        cleanup(&store, &key).await;
    }

    #[tokio::test]
    async fn test_redis_malformed_value_counts_as_zero() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => return,
        };

        for (name, raw) in [("text", "not-a-number"), ("fraction", "1.5"), ("negative", "-3")] {
            let key = test_key(&format!("malformed:{}", name));

            let mut conn = store.conn.clone();
            let _: () = conn.set(&key, raw).await.unwrap();

            let check = store
                .check_and_increment(&key, 5, 2, Duration::from_secs(60))
                .await
                .unwrap();
            assert!(check.allowed, "stored value {:?} was not reset", raw);
            assert_eq!(check.current, 2);
            assert!(check.remaining_ttl.is_some());

            cleanup(&store, &key).await;
        }
    }
}
