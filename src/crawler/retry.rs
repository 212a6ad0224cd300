//! Retry policy with exponential backoff
//!
//! The policy is a plain value; [`RetryPolicy::run`] drives an async operation until it
//! succeeds, fails permanently, or runs out of attempts.

use crate::config::RetryConfig;
use crate::FetchError;
use std::future::Future;
use std::time::Duration;

/// How many times to attempt an operation and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_attempts: u32,

    /// Delay after failed attempt `n` is `backoff_factor^n` seconds
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_factor: 1.5,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.retry_limit,
            backoff_factor: config.backoff_factor,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given (1-based) failed attempt
    ///
    /// Grows as `backoff_factor^attempt` with no jitter and no cap; saturates at
    /// `Duration::MAX` if the value is not representable.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Runs `operation` until it succeeds or attempts are exhausted
    ///
    /// The closure receives the 1-based attempt number. Errors that are not transient
    /// are returned immediately; after the last attempt the final error is returned.
    pub async fn run<T, F, Fut>(&self, url: &str, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            tracing::debug!("Fetching URL ({}/{}): {}", attempt, max_attempts, url);

            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    tracing::warn!("Attempt {} failed for {}: {}", attempt, url, e);

                    if attempt >= max_attempts {
                        tracing::error!("Failed to fetch {} after {} attempts", url, max_attempts);
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    tracing::info!("Retrying in {:.1}s...", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
