//! Caller identity hashing.
//!
//! Counters and API key lookups never see raw credentials, only digests
//! derived here.

use std::fmt;

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest for counter namespacing.
pub const IDENTITY_HASH_LEN: usize = 32;

/// A credential presented by (or assigned to) a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey(String),
    ClientIp(String),
    /// Callers without a key. They all share one identity.
    Anonymous,
    Admin,
    AuthFlow,
}

impl Credential {
    /// Bytes fed to the digest. Every variant carries its own tag so no API
    /// key can hash to a sentinel identity.
    fn digest_input(&self) -> Vec<u8> {
        match self {
            Credential::ApiKey(key) => format!("key:{key}").into_bytes(),
            Credential::ClientIp(ip) => format!("ip:{ip}").into_bytes(),
            Credential::Anonymous => b"sentinel:anonymous".to_vec(),
            Credential::Admin => b"sentinel:admin".to_vec(),
            Credential::AuthFlow => b"sentinel:auth-flow".to_vec(),
        }
    }
}

/// Fixed-length opaque identifier used in counter keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityHash(String);

impl IdentityHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct IdentityHasher;

impl IdentityHasher {
    pub fn hash(credential: &Credential) -> IdentityHash {
        let digest = Sha256::digest(credential.digest_input());
        let mut hex = hex::encode(digest);
        hex.truncate(IDENTITY_HASH_LEN);
        IdentityHash(hex)
    }

    /// Full SHA-256 hex digest of a raw API key, used as its storage key.
    ///
    /// Untagged, and never used to namespace counters.
    pub fn api_key_digest(api_key: &str) -> String {
        hex::encode(Sha256::digest(api_key.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = IdentityHasher::hash(&Credential::ApiKey("pk_abc".to_string()));
        let b = IdentityHasher::hash(&Credential::ApiKey("pk_abc".to_string()));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), IDENTITY_HASH_LEN);
    }

    #[test]
    fn test_distinct_credentials_distinct_hashes() {
        let key = IdentityHasher::hash(&Credential::ApiKey("pk_abc".to_string()));
        let other = IdentityHasher::hash(&Credential::ApiKey("pk_abd".to_string()));
        let anon = IdentityHasher::hash(&Credential::Anonymous);

        assert_ne!(key, other);
        assert_ne!(key, anon);
    }

    #[test]
    fn test_sentinels_never_collide_with_an_api_key() {
        let others = [
            Credential::Anonymous,
            Credential::Admin,
            Credential::AuthFlow,
            Credential::ClientIp("x".to_string()),
        ];
        let raw_keys = [
            "anonymous",
            "admin",
            "auth-flow",
            "ip:x",
            "sentinel:anonymous",
            "key:anonymous",
            "",
        ];

        for other in &others {
            let other_hash = IdentityHasher::hash(other);
            for raw in raw_keys {
                let key = IdentityHasher::hash(&Credential::ApiKey(raw.to_string()));
                assert_ne!(key, other_hash, "api key {raw:?} collides with {other:?}");
            }
        }

        let anon = IdentityHasher::hash(&Credential::Anonymous);
        assert_ne!(anon, IdentityHasher::hash(&Credential::Admin));
        assert_ne!(anon, IdentityHasher::hash(&Credential::AuthFlow));
        assert_ne!(anon, IdentityHasher::hash(&Credential::ClientIp("anonymous".to_string())));
    }

    #[test]
    fn test_lookup_digest_is_independent_of_identity() {
        let identity = IdentityHasher::hash(&Credential::ApiKey("pk_abc".to_string()));
        let digest = IdentityHasher::api_key_digest("pk_abc");

        assert_eq!(digest.len(), 64);
        assert!(!digest.starts_with(identity.as_str()));
    }
}
