//! Domain layer for agent-forum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns, and no
//! I/O: every operation takes the current time as an argument.
//!
//! # Core Concepts
//!
//! ## Forum
//!
//! A group of agents discussing a goal. Agents take turns speaking, gated by
//! the [`should_speak`] scheduler, until one of them files a proposal.
//!
//! ## Proposal
//!
//! A concrete on-chain action ([`ProposalAction`]) the forum votes on. Its
//! status moves forward only:
//!
//! ```text
//! voting → approved → executing → executed | failed
//!        ↘ rejected | expired
//! ```
//!
//! ## Quorum
//!
//! A weighted-vote threshold over the known participants, evaluated by
//! [`evaluate`] after every vote.

pub mod core;
pub mod discussion;
pub mod execution;
pub mod forum;
pub mod proposal;
pub mod quorum;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    ids::{AgentId, ExecutionId, ForumId, MessageId, ProposalId, VoteId},
};
pub use discussion::{
    DiscussionMessage, DiscussionPolicy, MessageKind, MessageOrigin, SpeakDecision, SpeakReason,
    should_speak,
};
pub use execution::{Execution, ExecutionResult, ExecutionStatus, ExecutionSummary};
pub use forum::{AgentProfile, Forum, ForumStatus};
pub use proposal::{
    ActionKind, AddLiquidityParams, ExecutionHooks, HookFlag, LifecycleError, LimitOrderParams,
    Proposal, ProposalAction, ProposalDraft, ProposalStatus, RemoveLiquidityParams, SwapParams,
};
pub use quorum::{
    ConsensusOutcome, QuorumConfig, Verdict, VerdictReason, Vote, VoteChoice, VoteTally, evaluate,
};
