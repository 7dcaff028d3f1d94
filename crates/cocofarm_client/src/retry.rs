use rand::{RngExt, rng};
use std::time::Duration;

use crate::FarmError;

/// A simple retry policy with exponential backoff and jitter.
///
/// Only errors the caller's predicate marks as retryable are attempted
/// again; validation failures and backend business-rule rejections are
/// deterministic and must surface immediately.
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub async fn retry_if<F, Fut, T, E, P>(&self, mut f: F, mut retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        P: FnMut(&E) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !retryable(&e) {
                        return Err(e);
                    }
                    // exponential backoff with jitter
                    let max_delay = self.base_delay * (1u32 << attempt);
                    let mut rng = rng();
                    let jitter = rng.random_range(0..max_delay.as_millis() as u64);
                    let delay = Duration::from_millis(jitter.min(max_delay.as_millis() as u64));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Retry transport failures only.
    pub async fn retry_transport<F, Fut, T>(&self, f: F) -> Result<T, FarmError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, FarmError>>,
    {
        self.retry_if(f, FarmError::is_transport).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retry_succeeds_after_retries() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
        };
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result = policy
            .retry_if(
                move || {
                    let c = c.clone();
                    async move {
                        let prev = c.fetch_add(1, Ordering::SeqCst) + 1;
                        if prev < 3 { Err("fail") } else { Ok(42) }
                    }
                },
                |_| true,
            )
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_surface_immediately() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(1),
        };
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<u32, &str> = policy
            .retry_if(
                move || {
                    let c = c.clone();
                    async move {
                        c.fetch_add(1, Ordering::SeqCst);
                        Err("validation")
                    }
                },
                |e| *e != "validation",
            )
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_transport_does_not_retry_invalid_input() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};
        let policy = RetryPolicy::default();
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<(), FarmError> = policy
            .retry_transport(move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(FarmError::InvalidInput("bad month".into()))
                }
            })
            .await;
        assert!(matches!(result, Err(FarmError::InvalidInput(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
