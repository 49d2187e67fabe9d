//! API key storage.

mod memory;

pub use memory::{API_KEY_PREFIX, InMemoryApiKeyRepository};

use disorder_core::domain::{IssuedApiKey, Tier};
use disorder_core::error::ApiKeyError;

/// Issue a free-tier demo key.
///
/// Explicit bootstrap step for local development and tests; nothing calls
/// it implicitly.
pub async fn seed_demo_key(repo: &InMemoryApiKeyRepository) -> Result<IssuedApiKey, ApiKeyError> {
    repo.generate("demo@example.com", Some("Demo key".to_string()), Tier::Free)
        .await
}
