//! Execution options - coordinator run control.

use super::retry_policy::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for one coordinator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOptions {
    /// Chain the capability submits to
    pub chain_id: u64,
    /// Fan out executors concurrently instead of one after another
    pub parallel: bool,
    /// Pause between two sequential executors
    pub delay_between: Duration,
    pub retry: RetryPolicy,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            chain_id: 1,
            parallel: false,
            delay_between: Duration::from_millis(1000),
            retry: RetryPolicy::default(),
        }
    }
}

impl ExecutionOptions {
    // ==================== Builder Methods ====================

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_delay_between(mut self, delay: Duration) -> Self {
        self.delay_between = delay;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
