//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Instant;

use disorder_core::domain::Thresholds;
use disorder_core::ports::{ApiKeyRepository, CounterStore, CounterStoreError};
use disorder_core::{DualWindowLimiter, LimiterConfig};
use disorder_infra::{InMemoryApiKeyRepository, seed_demo_key};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub limiter: DualWindowLimiter,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub thresholds: Thresholds,
    pub started_at: Instant,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Fails only when Redis is unreachable and the in-memory fallback is
    /// disabled.
    pub async fn new(config: &AppConfig) -> Result<Self, CounterStoreError> {
        #[cfg(feature = "redis")]
        let store = disorder_infra::connect_counter_store(&config.redis).await?;

        #[cfg(not(feature = "redis"))]
        let store = {
            tracing::warn!("Built without redis feature - rate limit counters are process-local");
            disorder_infra::memory_counter_store()
        };

        let api_keys = Arc::new(InMemoryApiKeyRepository::new());
        if config.seed_demo_key {
            match seed_demo_key(&api_keys).await {
                Ok(issued) => tracing::debug!(
                    key_id = %issued.record.id,
                    api_key = %issued.api_key,
                    "Demo API key issued"
                ),
                Err(e) => tracing::error!(error = %e, "Failed to issue demo API key"),
            }
        }

        let state = Self::with_parts(store, api_keys, config.limiter.clone());
        tracing::info!(backend = state.limiter.backend(), "Application state initialized");

        Ok(state)
    }

    /// Assemble state from explicit parts.
    pub fn with_parts(
        store: Arc<dyn CounterStore>,
        api_keys: Arc<dyn ApiKeyRepository>,
        limiter: LimiterConfig,
    ) -> Self {
        Self {
            limiter: DualWindowLimiter::new(store, limiter),
            api_keys,
            thresholds: Thresholds::default(),
            started_at: Instant::now(),
        }
    }
}
