use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::tier::{Tier, TierLimits};

/// Stored metadata for an issued API key. The raw key is never stored,
/// only its SHA-256 digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    pub id: Uuid,
    pub key_digest: String,
    pub owner_email: String,
    pub label: String,
    pub limits: TierLimits,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ApiKeyRecord {
    pub fn new(key_digest: String, owner_email: String, label: Option<String>, tier: Tier) -> Self {
        Self {
            id: Uuid::new_v4(),
            key_digest,
            owner_email,
            label: label.unwrap_or_else(|| "Untitled API Key".to_string()),
            limits: tier.limits(),
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn tier(&self) -> Tier {
        self.limits.tier
    }
}

/// A freshly generated key. `api_key` is shown to the owner once.
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    pub api_key: String,
    pub record: ApiKeyRecord,
}
