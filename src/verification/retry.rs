//! Bounded retry with exponential backoff.

use crate::core::config::RateLimitConfig;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// How many times to retry and how long to wait before the first retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Backoff before retry number `attempt + 1`: `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }
}

impl From<&RateLimitConfig> for RetryPolicy {
    fn from(limits: &RateLimitConfig) -> Self {
        Self::new(limits.max_retries, limits.retry_delay)
    }
}

/// Runs `op` until it succeeds, `should_retry` rejects the failure, or the
/// policy's retries are used up. Returns the last failure in the latter cases.
pub async fn with_retry<T, E, F, Fut, P>(policy: RetryPolicy, mut op: F, should_retry: P) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.max_retries || !should_retry(&err) {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::debug!("Attempt {} failed; retrying in {:?}", attempt + 1, delay);
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
