// Wait-and-retry policy for remote model calls

use crate::config::RetryConfig;
use std::time::Duration;

/// Exponential backoff: initial, 2x initial, 4x initial ... capped at max.
///
/// Bounded by `max_retries` unless built with `unbounded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    initial_backoff: Duration,
    max_backoff: Duration,
    max_retries: Option<u32>,
}

impl RetryPolicy {
    pub fn new(initial_backoff: Duration, max_backoff: Duration, max_retries: u32) -> Self {
        Self {
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
            max_retries: Some(max_retries),
        }
    }

    /// Retry until the call succeeds
    pub fn unbounded(initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
            max_retries: None,
        }
    }

    /// No waiting between attempts (tests)
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, max_retries)
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        let initial = Duration::from_secs(config.initial_backoff_secs);
        let max = Duration::from_secs(config.max_backoff_secs);
        if config.retry_forever {
            Self::unbounded(initial, max)
        } else {
            Self::new(initial, max, config.max_retries)
        }
    }

    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Whether another attempt is allowed after `retries` retries so far
    pub fn should_retry(&self, retries: u32) -> bool {
        self.max_retries.map_or(true, |max| retries < max)
    }

    /// Delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        self.initial_backoff
            .checked_mul(1u32 << exponent)
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
