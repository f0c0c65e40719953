//! Forum repository port
//!
//! Defines the persistence interface the use cases read and write through.
//! Creation of forums, proposals and messages belongs to the API layer and is
//! not part of this port.

use async_trait::async_trait;
use forum_domain::{
    AgentId, AgentProfile, DiscussionMessage, Execution, Forum, ForumId, Proposal, ProposalId,
    Vote,
};
use thiserror::Error;

/// Errors that can occur during repository operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Forum not found: {0}")]
    ForumNotFound(ForumId),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("Agent {agent} already voted on proposal {proposal}")]
    DuplicateVote { proposal: ProposalId, agent: AgentId },

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Persistence for forums, proposals, votes, messages and executions
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ForumRepository: Send + Sync {
    async fn get_forum(&self, id: &ForumId) -> Result<Forum, RepositoryError>;

    async fn update_forum(&self, forum: &Forum) -> Result<(), RepositoryError>;

    async fn get_agent(&self, id: &AgentId) -> Result<AgentProfile, RepositoryError>;

    async fn get_proposal(&self, id: &ProposalId) -> Result<Proposal, RepositoryError>;

    /// Persist the proposal's status, counters and timestamps
    async fn update_proposal(&self, proposal: &Proposal) -> Result<(), RepositoryError>;

    async fn has_voted(
        &self,
        proposal: &ProposalId,
        agent: &AgentId,
    ) -> Result<bool, RepositoryError>;

    /// Conditional append: fails with [`RepositoryError::DuplicateVote`] if the
    /// agent already has a vote on the proposal.
    async fn append_vote(&self, vote: &Vote) -> Result<(), RepositoryError>;

    async fn list_votes(&self, proposal: &ProposalId) -> Result<Vec<Vote>, RepositoryError>;

    /// The newest `limit` messages of a forum, oldest first
    async fn list_recent_messages(
        &self,
        forum: &ForumId,
        limit: usize,
    ) -> Result<Vec<DiscussionMessage>, RepositoryError>;

    async fn record_execution(&self, execution: &Execution) -> Result<(), RepositoryError>;

    async fn list_executions(
        &self,
        proposal: &ProposalId,
    ) -> Result<Vec<Execution>, RepositoryError>;
}
