//! Explicit retry combinator for outbound provider calls
//!
//! Every provider call site goes through [`with_retry`], which re-runs the
//! operation while it fails with a transient [`UpstreamError`] and the
//! exponential backoff policy still allows another attempt.

use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{Jitter, RetryDecision, RetryPolicy as _};
use std::future::Future;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::providers::UpstreamError;

/// Backoff policy shared by all providers
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    backoff: ExponentialBackoff,
    max_attempts: u32,
}

impl RetryPolicy {
    /// `max_attempts` counts the first call, so 1 disables retries
    #[must_use]
    pub fn new(max_attempts: u32, min_backoff: Duration, max_backoff: Duration) -> Self {
        let max_attempts = max_attempts.max(1);
        let backoff = ExponentialBackoff::builder()
            .retry_bounds(min_backoff, max_backoff.max(min_backoff))
            .jitter(Jitter::Bounded)
            .build_with_max_retries(max_attempts - 1);

        Self {
            backoff,
            max_attempts,
        }
    }

    #[must_use]
    pub fn from_config(config: &HttpConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.backoff_min_ms),
            Duration::from_millis(config.backoff_max_ms),
        )
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Run `operation` until it succeeds, fails permanently, or the policy gives up
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, UpstreamError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let started = SystemTime::now();
    let mut past_retries = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => err,
            Err(err) => {
                debug!("{} failed permanently: {}", operation_name, err);
                return Err(err);
            }
        };

        match policy.backoff.should_retry(started, past_retries) {
            RetryDecision::Retry { execute_after } => {
                let wait = execute_after
                    .duration_since(SystemTime::now())
                    .unwrap_or_default();
                past_retries += 1;
                warn!(
                    "{} attempt {}/{} failed: {}; retrying in {:.2}s",
                    operation_name,
                    past_retries,
                    policy.max_attempts,
                    err,
                    wait.as_secs_f64()
                );
                tokio::time::sleep(wait).await;
            }
            RetryDecision::DoNotRetry => {
                warn!(
                    "{} failed after {} attempts: {}",
                    operation_name,
                    past_retries + 1,
                    err
                );
                return Err(err);
            }
        }
    }
}
