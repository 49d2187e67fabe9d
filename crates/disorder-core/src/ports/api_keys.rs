use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ApiKeyRecord;
use crate::error::ApiKeyError;

/// API key persistence.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Find a key by the SHA-256 digest of its raw value.
    async fn find_by_digest(&self, digest: &str) -> Result<Option<ApiKeyRecord>, ApiKeyError>;

    /// Save a record (create or replace).
    async fn save(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, ApiKeyError>;

    /// Mark a key inactive. Revoked keys are no longer returned as valid.
    async fn revoke(&self, id: Uuid) -> Result<(), ApiKeyError>;
}
