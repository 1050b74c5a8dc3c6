//! Rate limiting port.

use std::time::Duration;

/// Rate limiter keyed by caller (usually the client address).
pub trait RateLimiter: Send + Sync {
    /// Record an attempt for `key` and report whether it is allowed.
    fn check(&self, key: &str) -> RateLimitResult;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub retry_after: Duration,
}
