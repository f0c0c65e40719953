//! Execution policy from TOML (`[execution]` section)
//!
//! ```toml
//! [execution]
//! chain_id = 8453
//! parallel = false
//! delay_between_ms = 1000   # pause between sequential executors
//! max_retries = 3           # total attempts per executor, first included
//! backoff_base_ms = 1000    # wait base * 2^attempt after a transient error
//! jitter = false
//! ```

use super::ConfigValidationError;
use forum_application::{ExecutionOptions, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw execution configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub chain_id: u64,
    pub parallel: bool,
    pub delay_between_ms: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub jitter: bool,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let options = ExecutionOptions::default();
        Self {
            chain_id: options.chain_id,
            parallel: options.parallel,
            delay_between_ms: options.delay_between.as_millis() as u64,
            max_retries: options.retry.max_attempts,
            backoff_base_ms: options.retry.base_delay.as_millis() as u64,
            jitter: options.retry.jitter,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_options(&self) -> ExecutionOptions {
        ExecutionOptions::default()
            .with_chain_id(self.chain_id)
            .with_parallel(self.parallel)
            .with_delay_between(Duration::from_millis(self.delay_between_ms))
            .with_retry(
                RetryPolicy::default()
                    .with_max_attempts(self.max_retries)
                    .with_base_delay(Duration::from_millis(self.backoff_base_ms))
                    .with_jitter(self.jitter),
            )
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigValidationError>) {
        if self.max_retries == 0 {
            issues.push(ConfigValidationError::ZeroValue("execution.max_retries"));
        }
        if self.chain_id == 0 {
            issues.push(ConfigValidationError::ZeroValue("execution.chain_id"));
        }
    }
}
