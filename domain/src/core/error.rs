//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are validation failures raised while constructing or parsing domain
/// values. Lifecycle rejections live in
/// [`LifecycleError`](crate::proposal::lifecycle::LifecycleError).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid quorum config: {0}")]
    InvalidQuorumConfig(String),

    #[error("Unknown action kind: {0}")]
    UnknownActionKind(String),

    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),
}

impl DomainError {
    /// Unknown action kinds are configuration errors and must never be retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::UnknownActionKind(_))
    }
}
