//! # Insights Resilience
//!
//! Guards for calls leaving the service: exponential-backoff retry,
//! client-side rate limiting and timeouts.

pub mod rate_limiter;
pub mod retry;
pub mod timeout;

pub use rate_limiter::*;
pub use retry::*;
pub use timeout::*;
