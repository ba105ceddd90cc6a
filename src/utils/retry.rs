//! Fixed-delay retry combinator
//!
//! Retries an async operation a bounded number of times, sleeping a constant
//! delay between attempts. There is no backoff growth and no jitter.
//!
//! ```rust,ignore
//! use ods::utils::retry::{retry, RetryPolicy};
//!
//! let value = retry(&RetryPolicy::default(), |_err| true, |attempt| async move {
//!     fetch(attempt).await
//! })
//! .await?;
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Attempt budget and delay applied to a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Pause between two consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` once, never retrying.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// Run `op` until it succeeds, returns an error `is_retryable` rejects, or the
/// attempt budget is spent. The last error is returned on exhaustion.
///
/// `op` receives the 1-based attempt number.
pub async fn retry<T, E, Op, Fut, P>(policy: &RetryPolicy, is_retryable: P, mut op: Op) -> Result<T, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && is_retryable(&e) => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %e,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
