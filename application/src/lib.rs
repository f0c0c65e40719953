//! Application layer for agent-forum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionOptions, RetryPolicy};
pub use ports::{
    clock::{Clock, SystemClock},
    event_logger::{ForumEvent, ForumEventLogger, NoForumEventLogger},
    execution_capability::{
        ExecutionCapability, SubmissionContext, SubmissionError, SubmissionOutcome,
    },
    progress::{ExecutionProgressNotifier, NoExecutionProgress},
    repository::{ForumRepository, RepositoryError},
    signer::{AddressSigner, Signer},
};
pub use use_cases::cast_vote::{CastVoteError, CastVoteInput, CastVoteOutput, CastVoteUseCase};
pub use use_cases::check_expiry::CheckExpiryUseCase;
pub use use_cases::execute_proposal::{
    ExecuteProposalError, ExecuteProposalInput, ExecuteProposalOutput, ExecuteProposalUseCase,
    ExecutorSelection,
};
pub use use_cases::execution_coordinator::{
    CoordinatorError, ExecutionCoordinator, Executor, SoleExecutor,
};
pub use use_cases::shared::ProposalLocks;
pub use use_cases::should_speak::{ScheduleError, ShouldSpeakUseCase};
