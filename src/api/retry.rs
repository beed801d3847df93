//! Bounded exponential-backoff retry for idempotent reads.
//!
//! Writes never go through here: a retried create or toggle could apply twice
//! on the server.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::config::{RetryConfig, RetryOn};
use crate::error::ApiError;

/// Bounds applied to a server `Retry-After` hint.
const RETRY_AFTER_MIN_SECS: u64 = 1;
const RETRY_AFTER_MAX_SECS: u64 = 300;

/// Retry policy for one logical read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts is `max_retries + 1`.
    pub max_retries: u32,
    /// Delay after the first failure; doubles per attempt.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    pub retry_on: RetryOn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            retry_on: config.retry_on,
        }
    }

    /// Single attempt, no delays.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Decide whether attempt `attempt` (0-based) failing with `err` earns
    /// another attempt.
    pub fn should_retry(&self, err: &ApiError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        match self.retry_on {
            RetryOn::Any => true,
            RetryOn::Transient => err.is_transient(),
        }
    }

    /// Delay after failed attempt `attempt`: `base_delay * 2^attempt`, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let pow = 2u32.saturating_pow(attempt);
        let millis = self
            .base_delay
            .as_millis()
            .saturating_mul(pow as u128)
            .min(self.max_delay.as_millis());
        Duration::from_millis(millis as u64)
    }

    /// Delay after failed attempt `attempt`, preferring the server's
    /// `Retry-After` hint (clamped to 1..=300 s) over the backoff curve.
    pub fn retry_delay_for(&self, attempt: u32, err: &ApiError) -> Duration {
        if let Some(secs) = err.retry_after_secs() {
            return Duration::from_secs(secs.clamp(RETRY_AFTER_MIN_SECS, RETRY_AFTER_MAX_SECS));
        }
        self.delay_for(attempt)
    }
}

/// Run `request_fn` until it succeeds, the policy declines another attempt,
/// or attempts run out. The final error is returned unchanged.
pub async fn fetch_with_retry<T, F, Fut>(policy: &RetryPolicy, mut request_fn: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match request_fn().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !policy.should_retry(&err, attempt) {
                    return Err(err);
                }
                let delay = policy.retry_delay_for(attempt, &err);
                debug!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying api read"
                );
                attempt = attempt.saturating_add(1);
                sleep(delay).await;
            }
        }
    }
}
