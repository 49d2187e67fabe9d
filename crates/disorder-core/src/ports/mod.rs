//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod api_keys;
mod rate_limit;

pub use api_keys::ApiKeyRepository;
pub use rate_limit::{CounterCheck, CounterStore, CounterStoreError};
