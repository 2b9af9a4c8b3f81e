//! Client-side rate limiter for outbound APIs.

use governor::{
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Jitter, Quota, RateLimiter as GovernorRateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type DirectLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Token-bucket limiter shared by every clone.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Creates a limiter allowing `requests_per_second` calls per second.
    #[must_use]
    pub fn new(requests_per_second: u32) -> Self {
        let quota = Quota::per_second(non_zero(requests_per_second));
        Self {
            limiter: Arc::new(GovernorRateLimiter::direct(quota)),
        }
    }

    /// Waits until a permit is available.
    pub async fn acquire(&self) {
        self.limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;
    }
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_burst_up_to_quota_is_immediate() {
        let limiter = RateLimiter::new(1000);
        let started = Instant::now();
        for _ in 0..10 {
            limiter.acquire().await;
        }
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_acquire_waits_once_quota_is_spent() {
        let limiter = RateLimiter::new(2);
        limiter.acquire().await;
        limiter.acquire().await;

        let started = Instant::now();
        limiter.acquire().await;
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_clones_share_the_bucket() {
        let limiter = RateLimiter::new(1);
        let clone = limiter.clone();
        limiter.acquire().await;

        let waited = timeout(Duration::from_millis(100), clone.acquire()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_zero_quota_is_clamped() {
        let limiter = RateLimiter::new(0);
        let first = timeout(Duration::from_millis(200), limiter.acquire()).await;
        assert!(first.is_ok());
    }
}
