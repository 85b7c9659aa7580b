//! Bounded exponential backoff for read-only calls.
//!
//! Only idempotent reads (search, discovery, integration lookup) go through
//! here. The bulk patch is irreversible and is never retried.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::warn;

use crate::error::ApiError;

/// Retry configuration for read calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f32,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no backoff.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.initial_backoff)
            .with_max_delay(self.max_backoff)
            .with_factor(self.backoff_multiplier)
            .with_max_times(self.max_retries);
        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

/// Run `operation`, repeating it while it fails with a retryable error and
/// the policy allows another attempt.
pub(crate) async fn retry_read<F, Fut, T>(
    policy: &RetryPolicy,
    call: &'static str,
    operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    operation
        .retry(policy.backoff())
        .when(ApiError::is_retryable)
        .notify(|err: &ApiError, delay: Duration| {
            warn!("{call} failed, retrying in {delay:?}: {err}");
        })
        .await
}
