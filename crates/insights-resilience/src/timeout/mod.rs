//! Timeout wrapper for async operations.

use insights_core::InsightsError;
use std::future::Future;
use std::time::Duration;

/// Runs `fut`, failing with [`InsightsError::Timeout`] after `duration`.
pub async fn with_timeout<Fut, T>(duration: Duration, operation: &str, fut: Fut) -> Result<T, InsightsError>
where
    Fut: Future<Output = Result<T, InsightsError>>,
{
    tokio::time::timeout(duration, fut).await.map_err(|_| {
        InsightsError::Timeout(format!("{operation} timed out after {duration:?}"))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_success() {
        let result = with_timeout(Duration::from_secs(1), "answer", async {
            Ok::<_, InsightsError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_exceeded() {
        let result = with_timeout(Duration::from_millis(10), "slow call", async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, InsightsError>(42)
        })
        .await;

        match result {
            Err(InsightsError::Timeout(message)) => assert!(message.starts_with("slow call")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<(), _> = with_timeout(Duration::from_secs(1), "lookup", async {
            Err(InsightsError::not_found("Page", "acme"))
        })
        .await;
        assert!(matches!(result, Err(InsightsError::NotFound { .. })));
    }
}
