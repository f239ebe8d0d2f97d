//! Bounded retry with fixed delay.
//!
//! The whole backup run is the retry unit: every attempt starts from scratch
//! (the orchestrator builds a fresh workspace per attempt), so the wrapper
//! only needs to bound attempts and space them out. Errors explicitly marked
//! unrecoverable fail fast without burning retries.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

use arkivo_core::TaskError;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 3 means up to 4 attempts total.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// No waiting between attempts; for tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO)
    }
}

/// Run `op` until it succeeds, retries are exhausted, or it fails
/// unrecoverably. The final error is returned unchanged.
pub async fn run_with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let unrecoverable = e
                    .downcast_ref::<TaskError>()
                    .map(|te| !te.is_recoverable())
                    .unwrap_or(false);

                if unrecoverable {
                    tracing::error!(error = %e, "Run failed with unrecoverable error, not retrying");
                    return Err(e);
                }
                if attempt >= policy.max_retries {
                    tracing::error!(
                        error = %e,
                        attempts = attempt + 1,
                        "Run failed after maximum retries"
                    );
                    return Err(e);
                }

                attempt += 1;
                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    delay_secs = policy.retry_delay.as_secs_f64(),
                    "Run failed, scheduling retry"
                );
                tokio::time::sleep(policy.retry_delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result = run_with_retry(RetryPolicy::immediate(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, anyhow::Error>(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_within_bound() {
        let calls = AtomicU32::new(0);
        let result = run_with_retry(RetryPolicy::immediate(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(anyhow::anyhow!("transient"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = run_with_retry(RetryPolicy::immediate(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(anyhow::anyhow!("always failing")) }
        })
        .await;

        assert!(result.is_err());
        // 1 initial attempt + 3 retries
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_unrecoverable_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = run_with_retry(RetryPolicy::immediate(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(TaskError::unrecoverable(anyhow::anyhow!("record not found")).into())
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
