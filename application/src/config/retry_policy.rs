//! Retry policy for execution submissions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How transient submission errors are retried.
///
/// After the attempt with 0-based index `i` fails, the coordinator waits
/// `base_delay * 2^i` before the next one:
///
/// | attempt | wait before next |
/// |---------|------------------|
/// | 0       | base             |
/// | 1       | base * 2         |
/// | 2       | (no retry with `max_attempts = 3`) |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total capability invocations, the first one included
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Add up to 25% random jitter on top of each delay
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// At least one attempt is always made.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after the failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let delay = self.base_delay.saturating_mul(factor);
        if !self.jitter {
            return delay;
        }
        let spread = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX) / 4;
        if spread == 0 {
            return delay;
        }
        delay.saturating_add(Duration::from_millis(rand::random::<u64>() % (spread + 1)))
    }
}
