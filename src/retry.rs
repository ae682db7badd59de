//! Retry policy for store fetches
//!
//! The navigator wraps every fetch in this policy. Only transient errors
//! are retried: unavailability and quota exhaustion. Authorization
//! failures and malformed queries surface immediately, and quota errors
//! back off longer than plain unavailability.

use crate::error::{Error, Result};
use crate::types::BackoffType;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy with classification-aware backoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Multiplier applied to quota-exhaustion delays
    pub quota_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_type: BackoffType::Exponential,
            quota_multiplier: 5,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set max retries
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set backoff configuration
    #[must_use]
    pub fn with_backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.backoff_type = backoff_type;
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Calculate the delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32, error: &Error) -> Duration {
        let base = match self.backoff_type {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.initial_backoff * factor
            }
        };

        let delay = if error.is_quota() {
            base * self.quota_multiplier
        } else {
            base
        };

        std::cmp::min(delay, self.max_backoff)
    }

    /// Run an operation under this policy
    ///
    /// The operation is invoked up to `max_retries + 1` times. The last
    /// error is returned unchanged once retries are exhausted, so callers
    /// still see the original taxonomy kind.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !error.is_retryable() || attempt >= self.max_retries {
                        return Err(error);
                    }
                    let delay = self.delay_for(attempt, &error);
                    warn!(
                        "Fetch failed ({error}), attempt {}/{}, retrying in {:?}",
                        attempt + 1,
                        self.max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
