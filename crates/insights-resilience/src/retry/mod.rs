//! Retry policy backed by exponential backoff.

use backoff::{future::retry_notify, ExponentialBackoff, ExponentialBackoffBuilder};
use insights_core::InsightsError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for a single delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Randomize each delay by up to 25%.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy for an outbound client configured with `retries` retries
    /// after the first attempt.
    #[must_use]
    pub fn for_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            ..Default::default()
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_delay)
            .with_max_interval(self.max_delay)
            .with_multiplier(self.multiplier)
            .with_randomization_factor(if self.jitter { 0.25 } else { 0.0 })
            .with_max_elapsed_time(None)
            .build()
    }

    /// Runs `f` until it succeeds, the error is not transient, or the
    /// attempts are exhausted. The last error is returned.
    pub async fn execute_if<F, Fut, T, E, P>(&self, mut f: F, is_transient: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0u32;

        retry_notify(
            self.backoff(),
            || {
                attempt += 1;
                let current = attempt;
                let fut = f();
                let is_transient = &is_transient;
                async move {
                    fut.await.map_err(|e| {
                        if current < max_attempts && is_transient(&e) {
                            backoff::Error::transient(e)
                        } else {
                            backoff::Error::permanent(e)
                        }
                    })
                }
            },
            |e: E, delay: Duration| debug!("Attempt failed: {}; retrying in {:?}", e, delay),
        )
        .await
    }

    /// Runs `f`, retrying only errors that report themselves as retriable.
    pub async fn execute_retriable<F, Fut, T>(&self, f: F) -> Result<T, InsightsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, InsightsError>>,
    {
        self.execute_if(f, InsightsError::is_retriable).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_retry_success() {
        let result: Result<i32, &str> = fast_policy(3).execute_if(|| async { Ok(42) }, |_| true).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_eventual_success() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<i32, &str> = fast_policy(3)
            .execute_if(
                || {
                    let attempts = counter.clone();
                    async move {
                        if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                            Err("not yet")
                        } else {
                            Ok(42)
                        }
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_counts_exact_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<i32, &str> = fast_policy(3)
            .execute_if(
                || {
                    let attempts = counter.clone();
                    async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        Err("fail")
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result.unwrap_err(), "fail");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retriable_error_stops_immediately() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<(), InsightsError> = fast_policy(5)
            .execute_retriable(|| {
                let attempts = counter.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(InsightsError::validation("bad input"))
                }
            })
            .await;

        assert!(matches!(result, Err(InsightsError::Validation(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retriable_error_is_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<(), InsightsError> = fast_policy(2)
            .execute_retriable(|| {
                let attempts = counter.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(InsightsError::external("linkedin", "connection reset"))
                }
            })
            .await;

        assert!(matches!(result, Err(InsightsError::ExternalService { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_attempt() {
        let result: Result<i32, &str> = fast_policy(1).execute_if(|| async { Err("fail") }, |_| true).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_for_retries_adds_first_attempt() {
        assert_eq!(RetryPolicy::for_retries(3).max_attempts, 4);
        assert_eq!(RetryPolicy::for_retries(0).max_attempts, 1);
    }
}
