use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Subscription tier attached to an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Premium,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
        }
    }

    /// Default limits for the tier.
    pub fn limits(self) -> TierLimits {
        match self {
            Tier::Free => TierLimits {
                tier: self,
                daily_limit: 1_000,
                requests_per_minute: 100,
                max_batch_size: 50,
            },
            Tier::Premium => TierLimits {
                tier: self,
                daily_limit: 100_000,
                requests_per_minute: 1_000,
                max_batch_size: 500,
            },
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            other => Err(DomainError::UnknownTier(other.to_string())),
        }
    }
}

/// Per-identity limits resolved from the caller's tier.
///
/// Every limit is at least 1; use [`TierLimits::new`] for custom values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTierLimits")]
pub struct TierLimits {
    pub tier: Tier,
    pub daily_limit: u64,
    pub requests_per_minute: u64,
    pub max_batch_size: usize,
}

impl TierLimits {
    pub fn new(
        tier: Tier,
        daily_limit: u64,
        requests_per_minute: u64,
        max_batch_size: usize,
    ) -> Result<Self, DomainError> {
        if daily_limit == 0 {
            return Err(DomainError::Validation(
                "daily_limit must be at least 1".to_string(),
            ));
        }
        if requests_per_minute == 0 {
            return Err(DomainError::Validation(
                "requests_per_minute must be at least 1".to_string(),
            ));
        }
        if max_batch_size == 0 {
            return Err(DomainError::Validation(
                "max_batch_size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            tier,
            daily_limit,
            requests_per_minute,
            max_batch_size,
        })
    }
}

/// Unchecked wire form of [`TierLimits`].
#[derive(Deserialize)]
struct RawTierLimits {
    tier: Tier,
    daily_limit: u64,
    requests_per_minute: u64,
    max_batch_size: usize,
}

impl TryFrom<RawTierLimits> for TierLimits {
    type Error = DomainError;

    fn try_from(raw: RawTierLimits) -> Result<Self, Self::Error> {
        Self::new(raw.tier, raw.daily_limit, raw.requests_per_minute, raw.max_batch_size)
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        Tier::Free.limits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_defaults() {
        let free = Tier::Free.limits();
        assert_eq!(free.daily_limit, 1_000);
        assert_eq!(free.requests_per_minute, 100);
        assert_eq!(free.max_batch_size, 50);

        let premium = Tier::Premium.limits();
        assert_eq!(premium.daily_limit, 100_000);
        assert_eq!(premium.requests_per_minute, 1_000);
        assert_eq!(premium.max_batch_size, 500);
    }

    #[test]
    fn test_rejects_zero_limits() {
        assert!(TierLimits::new(Tier::Free, 0, 10, 10).is_err());
        assert!(TierLimits::new(Tier::Free, 10, 0, 10).is_err());
        assert!(TierLimits::new(Tier::Free, 10, 10, 0).is_err());
        assert!(TierLimits::new(Tier::Free, 1, 1, 1).is_ok());
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("Premium".parse::<Tier>().unwrap(), Tier::Premium);
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn test_deserialize_validates_limits() {
        let ok: TierLimits = serde_json::from_str(
            r#"{"tier":"premium","daily_limit":10,"requests_per_minute":2,"max_batch_size":3}"#,
        )
        .unwrap();
        assert_eq!(ok, TierLimits::new(Tier::Premium, 10, 2, 3).unwrap());

        let zero = serde_json::from_str::<TierLimits>(
            r#"{"tier":"free","daily_limit":10,"requests_per_minute":0,"max_batch_size":3}"#,
        );
        assert!(zero.is_err());
    }
}
