//! Timeout helpers
//!
//! Provider calls that carry an explicit deadline are wrapped with
//! [`with_timeout`]; everything else relies on the shared client's timeout.

use std::future::Future;
use std::time::Duration;

/// Apply an optional timeout to an async operation
///
/// `None` runs the future to completion.
pub async fn with_timeout<T, E>(
    timeout: Option<Duration>,
    future: impl Future<Output = Result<T, E>>,
) -> Result<T, TimeoutError<E>> {
    let Some(timeout) = timeout else {
        return future.await.map_err(TimeoutError::Inner);
    };

    match tokio::time::timeout(timeout, future).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(TimeoutError::Inner(err)),
        Err(_) => Err(TimeoutError::Timeout(timeout)),
    }
}

/// Error type for timeout operations
#[derive(Debug, thiserror::Error)]
pub enum TimeoutError<E> {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Inner(E),
}

impl<E> TimeoutError<E> {
    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, TimeoutError::Timeout(_))
    }

    /// Collapse into the inner error type, building one for the timeout case
    pub fn flatten(self, on_timeout: impl FnOnce(Duration) -> E) -> E {
        match self {
            TimeoutError::Inner(e) => e,
            TimeoutError::Timeout(d) => on_timeout(d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result: Result<i32, TimeoutError<String>> =
            with_timeout(Some(Duration::from_secs(1)), async { Ok::<_, String>(42) }).await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_without_deadline_passes_inner_error() {
        let result: Result<i32, TimeoutError<String>> =
            with_timeout(None, async { Err::<i32, _>("boom".to_string()) }).await;

        let err = result.unwrap_err();
        assert!(!err.is_timeout());
        assert_eq!(err.flatten(|_| "timeout".to_string()), "boom");
    }

    #[tokio::test]
    async fn test_with_timeout_timeout() {
        let result: Result<i32, TimeoutError<String>> = with_timeout(
            Some(Duration::from_millis(10)),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, String>(42)
            },
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.flatten(|d| format!("{:?}", d)), "10ms");
    }
}
