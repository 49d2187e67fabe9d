//! Middleware modules.

pub mod api_key;
pub mod error;
pub mod rate_limit;
