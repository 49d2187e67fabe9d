//! Services - domain logic composed over ports.

mod limiter;

pub use limiter::{DualWindowLimiter, LimiterConfig, WindowScope};
