//! Domain types - the core business objects.

mod api_key;
pub mod classifier;
mod decision;
mod identity;
pub mod sequence;
mod tier;

pub use api_key::{ApiKeyRecord, IssuedApiKey};
pub use classifier::{BatchEntry, Classification, Classified, Features, Threshold, Thresholds};
pub use decision::{Decision, ErrorCode, ErrorDetail, Usage};
pub use identity::{Credential, IDENTITY_HASH_LEN, IdentityHash, IdentityHasher};
pub use tier::{Tier, TierLimits};
