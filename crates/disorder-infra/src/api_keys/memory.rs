//! In-memory API key repository.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::RngCore;
use tokio::sync::RwLock;
use uuid::Uuid;

use disorder_core::domain::{ApiKeyRecord, IdentityHasher, IssuedApiKey, Tier};
use disorder_core::error::ApiKeyError;
use disorder_core::ports::ApiKeyRepository;

/// Prefix of every issued key.
pub const API_KEY_PREFIX: &str = "pk_";

/// API keys held in process memory, indexed by digest.
///
/// Keys are lost on restart.
pub struct InMemoryApiKeyRepository {
    store: RwLock<HashMap<String, ApiKeyRecord>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Generate and store a new key for `owner_email`.
    pub async fn generate(
        &self,
        owner_email: &str,
        label: Option<String>,
        tier: Tier,
    ) -> Result<IssuedApiKey, ApiKeyError> {
        let api_key = generate_raw_key();
        let record = ApiKeyRecord::new(
            IdentityHasher::api_key_digest(&api_key),
            owner_email.to_string(),
            label,
            tier,
        );
        let record = self.save(record).await?;

        tracing::info!(key_id = %record.id, tier = %tier, "API key issued");

        Ok(IssuedApiKey { api_key, record })
    }
}

impl Default for InMemoryApiKeyRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_raw_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", API_KEY_PREFIX, hex::encode(bytes))
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn find_by_digest(&self, digest: &str) -> Result<Option<ApiKeyRecord>, ApiKeyError> {
        let store = self.store.read().await;
        Ok(store.get(digest).filter(|record| record.active).cloned())
    }

    async fn save(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, ApiKeyError> {
        let mut store = self.store.write().await;
        store.insert(record.key_digest.clone(), record.clone());
        Ok(record)
    }

    async fn revoke(&self, id: Uuid) -> Result<(), ApiKeyError> {
        let mut store = self.store.write().await;
        let record = store
            .values_mut()
            .find(|record| record.id == id)
            .ok_or(ApiKeyError::NotFound)?;
        record.active = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_and_find() {
        let repo = InMemoryApiKeyRepository::new();
        let issued = repo.generate("dev@example.com", None, Tier::Premium).await.unwrap();

        assert!(issued.api_key.starts_with(API_KEY_PREFIX));
        assert_eq!(issued.api_key.len(), API_KEY_PREFIX.len() + 64);

        let found = repo
            .find_by_digest(&IdentityHasher::api_key_digest(&issued.api_key))
            .await
            .unwrap()
            .expect("issued key is found");
        assert_eq!(found.id, issued.record.id);
        assert_eq!(found.tier(), Tier::Premium);
        assert_eq!(found.limits.max_batch_size, 500);
        assert_eq!(found.label, "Untitled API Key");
    }

    #[tokio::test]
    async fn test_revoked_key_is_not_found() {
        let repo = InMemoryApiKeyRepository::new();
        let issued = repo.generate("dev@example.com", Some("ci".to_string()), Tier::Free).await.unwrap();

        repo.revoke(issued.record.id).await.unwrap();

        let digest = IdentityHasher::api_key_digest(&issued.api_key);
        assert!(repo.find_by_digest(&digest).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_unknown_key() {
        let repo = InMemoryApiKeyRepository::new();
        assert!(matches!(
            repo.revoke(Uuid::new_v4()).await,
            Err(ApiKeyError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_keys_are_unique() {
        let repo = InMemoryApiKeyRepository::new();
        let a = repo.generate("a@example.com", None, Tier::Free).await.unwrap();
        let b = repo.generate("a@example.com", None, Tier::Free).await.unwrap();
        assert_ne!(a.api_key, b.api_key);
    }
}
