//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has defaults, so a partial file is always valid TOML for
//! them; [`FileConfig::validate`] catches values the domain would reject.

mod cache;
mod discussion;
mod execution;
mod logging;
mod output;
mod quorum;

pub use cache::FileCacheConfig;
pub use discussion::FileDiscussionConfig;
pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use quorum::FileQuorumConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("[quorum]: {0}")]
    InvalidQuorum(String),

    #[error("{0} cannot be 0")]
    ZeroValue(&'static str),

    #[error("{field} cannot exceed {max}")]
    TooLarge { field: &'static str, max: u64 },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Consensus rule and proposal timeout
    pub quorum: FileQuorumConfig,
    /// Autonomous discussion throttling
    pub discussion: FileDiscussionConfig,
    /// Execution policy
    pub execution: FileExecutionConfig,
    /// Audit and diagnostic log files
    pub logging: FileLoggingConfig,
    pub cache: FileCacheConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        self.quorum.validate(&mut issues);
        self.discussion.validate(&mut issues);
        self.execution.validate(&mut issues);
        self.cache.validate(&mut issues);
        issues
    }
}
