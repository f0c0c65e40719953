//! Infrastructure layer for agent-forum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod capability;
pub mod config;
pub mod logging;
pub mod persistence;

// Re-export commonly used types
pub use capability::{DryRunCapability, DryRunSubmission};
pub use config::{
    ConfigLoader, ConfigValidationError, FileCacheConfig, FileConfig, FileDiscussionConfig,
    FileExecutionConfig, FileLoggingConfig, FileOutputConfig, FileOutputFormat, FileQuorumConfig,
};
pub use logging::JsonlForumEventLogger;
pub use persistence::{InMemoryForumStore, TtlCache};
