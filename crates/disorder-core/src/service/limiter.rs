//! Dual-window rate limiter.
//!
//! Every identity has two fixed-window counters: requests per UTC minute and
//! sequences per UTC day. The minute window is checked first with an
//! increment of 1; the day window is only consulted (and charged) once the
//! minute window admits the request.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::{Decision, ErrorCode, ErrorDetail, IdentityHash, TierLimits, Usage};
use crate::ports::{CounterCheck, CounterStore, CounterStoreError};

/// Limiter configuration.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Prefix for every counter key.
    pub key_prefix: String,
    /// Upper bound on a single counter store round trip.
    pub store_timeout: Duration,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            key_prefix: "rate_limit".to_string(),
            store_timeout: Duration::from_millis(500),
        }
    }
}

/// The two counting windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowScope {
    Minute,
    Day,
}

impl WindowScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowScope::Minute => "minute",
            WindowScope::Day => "day",
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            WindowScope::Minute => Duration::from_secs(60),
            WindowScope::Day => Duration::from_secs(86_400),
        }
    }

    /// UTC bucket label for `now`.
    pub fn bucket(&self, now: DateTime<Utc>) -> String {
        match self {
            WindowScope::Minute => now.format("%Y-%m-%d-%H-%M").to_string(),
            WindowScope::Day => now.format("%Y-%m-%d").to_string(),
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            WindowScope::Minute => ErrorCode::RateLimitExceeded,
            WindowScope::Day => ErrorCode::QuotaExceeded,
        }
    }

    fn unit_label(&self) -> &'static str {
        match self {
            WindowScope::Minute => "requests per minute",
            WindowScope::Day => "sequences per day",
        }
    }
}

/// Per-minute request rate and per-day sequence quota enforcement.
///
/// Stateless apart from the injected store; keys are rebuilt on every call.
/// Store failures and timeouts fail open.
#[derive(Clone)]
pub struct DualWindowLimiter {
    store: Arc<dyn CounterStore>,
    config: LimiterConfig,
}

impl DualWindowLimiter {
    pub fn new(store: Arc<dyn CounterStore>, config: LimiterConfig) -> Self {
        Self { store, config }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn counter_key(&self, scope: WindowScope, identity: &IdentityHash, now: DateTime<Utc>) -> String {
        format!(
            "{}:{}:{}:{}",
            self.config.key_prefix,
            scope.as_str(),
            identity,
            scope.bucket(now)
        )
    }

    /// Check and charge both windows for one request carrying `increment`
    /// units (minimum 1).
    pub async fn check_rate_limit(
        &self,
        identity: &IdentityHash,
        max_per_minute: u64,
        max_per_day: u64,
        increment: u64,
    ) -> Decision {
        self.check_rate_limit_at(Utc::now(), identity, max_per_minute, max_per_day, increment)
            .await
    }

    /// Same as [`check_rate_limit`](Self::check_rate_limit) with an explicit clock reading.
    pub async fn check_rate_limit_at(
        &self,
        now: DateTime<Utc>,
        identity: &IdentityHash,
        max_per_minute: u64,
        max_per_day: u64,
        increment: u64,
    ) -> Decision {
        let increment = increment.max(1);

        if let Some(denied) = self
            .check_window(WindowScope::Minute, identity, now, max_per_minute, 1)
            .await
        {
            return denied;
        }

        if let Some(denied) = self
            .check_window(WindowScope::Day, identity, now, max_per_day, increment)
            .await
        {
            return denied;
        }

        Decision::Allowed
    }

    pub async fn check_tier(&self, identity: &IdentityHash, limits: &TierLimits, increment: u64) -> Decision {
        self.check_rate_limit(
            identity,
            limits.requests_per_minute,
            limits.daily_limit,
            increment,
        )
        .await
    }

    /// Current minute and day counters for `identity`. Unreadable counters
    /// report 0.
    pub async fn usage(&self, identity: &IdentityHash) -> Usage {
        self.usage_at(Utc::now(), identity).await
    }

    pub async fn usage_at(&self, now: DateTime<Utc>, identity: &IdentityHash) -> Usage {
        Usage {
            requests_this_minute: self.read(&self.counter_key(WindowScope::Minute, identity, now)).await,
            sequences_today: self.read(&self.counter_key(WindowScope::Day, identity, now)).await,
        }
    }

    async fn read(&self, key: &str) -> u64 {
        match tokio::time::timeout(self.config.store_timeout, self.store.current(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                tracing::warn!(key = %key, error = %e, "Counter read failed");
                0
            }
            Err(_) => {
                tracing::warn!(key = %key, "Counter read timed out");
                0
            }
        }
    }

    /// Returns the denial for `scope`, or `None` when the window admits the
    /// request (or the store failed).
    async fn check_window(
        &self,
        scope: WindowScope,
        identity: &IdentityHash,
        now: DateTime<Utc>,
        limit: u64,
        increment: u64,
    ) -> Option<Decision> {
        let key = self.counter_key(scope, identity, now);

        // One attempt only: a timed-out increment may already have landed.
        let result = tokio::time::timeout(
            self.config.store_timeout,
            self.store.check_and_increment(&key, limit, increment, scope.ttl()),
        )
        .await
        .unwrap_or_else(|_| Err(CounterStoreError::Timeout(self.config.store_timeout)));

        match result {
            Ok(CounterCheck { allowed: true, .. }) => None,
            Ok(check) => {
                let retry_after = check
                    .remaining_ttl
                    .map(|ttl| ttl.as_secs().max(1))
                    .unwrap_or(1);

                tracing::debug!(
                    scope = scope.as_str(),
                    identity = %identity,
                    limit,
                    current = check.current,
                    retry_after,
                    "Rate limit window exhausted"
                );

                Some(Decision::denied(
                    format!("Rate limit exceeded: {} {}", limit, scope.unit_label()),
                    ErrorDetail {
                        error_code: scope.error_code(),
                        retry_after,
                        limit,
                        current: check.current,
                    },
                ))
            }
            Err(e) => {
                tracing::error!(
                    scope = scope.as_str(),
                    key = %key,
                    error = %e,
                    backend = self.store.backend(),
                    "Counter store failure, failing open"
                );
                None
            }
        }
    }
}
