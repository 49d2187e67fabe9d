//! # Disorder Core
//!
//! The domain layer of the protein disorder classification API.
//! This crate holds the classifier, the dual-window rate limiter and the
//! ports that infrastructure must implement. It has no I/O of its own.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::{DualWindowLimiter, LimiterConfig};
