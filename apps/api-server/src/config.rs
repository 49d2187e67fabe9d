//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use disorder_core::LimiterConfig;

#[cfg(feature = "redis")]
use disorder_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "redis")]
    pub redis: RedisConfig,
    pub limiter: LimiterConfig,
    /// Issue a free-tier demo key at startup and log it.
    pub seed_demo_key: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let limiter_defaults = LimiterConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8000),
            #[cfg(feature = "redis")]
            redis: Self::redis_from_env(),
            limiter: LimiterConfig {
                key_prefix: env::var("RATE_LIMIT_KEY_PREFIX")
                    .ok()
                    .filter(|p| !p.is_empty())
                    .unwrap_or(limiter_defaults.key_prefix),
                store_timeout: parse_var("RATE_LIMIT_STORE_TIMEOUT_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(limiter_defaults.store_timeout),
            },
            seed_demo_key: parse_flag("SEED_DEMO_API_KEY").unwrap_or(false),
        }
    }

    #[cfg(feature = "redis")]
    fn redis_from_env() -> RedisConfig {
        let defaults = RedisConfig::default();

        RedisConfig {
            url: env::var("REDIS_URL").unwrap_or(defaults.url),
            connect_timeout: parse_var("REDIS_CONNECT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            fallback_to_memory: parse_flag("REDIS_FALLBACK_TO_MEMORY")
                .unwrap_or(defaults.fallback_to_memory),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

fn parse_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | ""))
}
