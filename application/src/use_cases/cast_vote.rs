//! Cast Vote use case
//!
//! Appends one agent's vote to a proposal, re-evaluates the quorum and moves
//! the proposal (and its forum) forward when a verdict is reached.

use crate::ports::clock::Clock;
use crate::ports::event_logger::{ForumEvent, ForumEventLogger, NoForumEventLogger};
use crate::ports::repository::{ForumRepository, RepositoryError};
use crate::use_cases::shared::ProposalLocks;
use chrono::{DateTime, Utc};
use forum_domain::{
    AgentId, Forum, ForumId, LifecycleError, Proposal, ProposalId, ProposalStatus, Verdict, Vote,
    VoteChoice, VoteTally,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while casting a vote
#[derive(Error, Debug)]
pub enum CastVoteError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Agent {agent} is not a participant of forum {forum}")]
    NotParticipant { forum: ForumId, agent: AgentId },

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CastVoteError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateVote { proposal, agent } => {
                CastVoteError::Lifecycle(LifecycleError::DuplicateVote { proposal, agent })
            }
            other => CastVoteError::Repository(other),
        }
    }
}

/// Input for the CastVote use case
#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub proposal_id: ProposalId,
    pub agent_id: AgentId,
    pub choice: VoteChoice,
    pub reasoning: Option<String>,
}

impl CastVoteInput {
    pub fn new(
        proposal_id: impl Into<ProposalId>,
        agent_id: impl Into<AgentId>,
        choice: VoteChoice,
    ) -> Self {
        Self {
            proposal_id: proposal_id.into(),
            agent_id: agent_id.into(),
            choice,
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

/// Result of an accepted vote
#[derive(Debug, Clone, Serialize)]
pub struct CastVoteOutput {
    pub vote: Vote,
    pub verdict: Verdict,
    /// Proposal status after the vote
    pub status: ProposalStatus,
    pub tally: VoteTally,
}

/// Use case for casting a vote
pub struct CastVoteUseCase<R: ForumRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    locks: Arc<ProposalLocks>,
    logger: Arc<dyn ForumEventLogger>,
}

impl<R: ForumRepository + 'static> CastVoteUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            locks: Arc::new(ProposalLocks::new()),
            logger: Arc::new(NoForumEventLogger),
        }
    }

    /// Share proposal locks with the other use cases touching the same proposals
    pub fn with_locks(mut self, locks: Arc<ProposalLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ForumEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case
    ///
    /// Checks run in order: duplicate vote, proposal state, expiry. An expired
    /// proposal is persisted as `expired` before the error is returned.
    ///
    /// Counters are always recomputed from the stored votes, so a vote whose
    /// append landed but whose counter update failed is counted on the next
    /// call for the proposal.
    pub async fn execute(&self, input: CastVoteInput) -> Result<CastVoteOutput, CastVoteError> {
        let guard = self.locks.acquire(&input.proposal_id).await;

        let mut proposal = self.repository.get_proposal(&input.proposal_id).await?;
        let now = self.clock.now();
        self.reconcile(&mut proposal, now).await?;

        if self
            .repository
            .has_voted(&proposal.id, &input.agent_id)
            .await?
        {
            return Err(LifecycleError::DuplicateVote {
                proposal: proposal.id.clone(),
                agent: input.agent_id,
            }
            .into());
        }

        if let Err(err) = proposal.ensure_accepts_votes(now) {
            if matches!(err, LifecycleError::Expired { .. }) {
                info!(
                    "Proposal {} expired before vote by {}",
                    proposal.id, input.agent_id
                );
                self.repository.update_proposal(&proposal).await?;
                self.logger.log(ForumEvent::new(
                    "proposal_expired",
                    json!({
                        "forum_id": proposal.forum_id,
                        "proposal_id": proposal.id,
                        "expires_at": proposal.expires_at.to_rfc3339(),
                    }),
                ));
            }
            return Err(err.into());
        }

        let mut forum = self.repository.get_forum(&proposal.forum_id).await?;
        if !forum.is_participant(&input.agent_id) {
            return Err(CastVoteError::NotParticipant {
                forum: forum.id,
                agent: input.agent_id,
            });
        }

        let mut vote = Vote::new(proposal.id.clone(), input.agent_id, input.choice).at(now);
        vote.reasoning = input.reasoning;
        self.repository.append_vote(&vote).await?;

        let stored = self.repository.list_votes(&proposal.id).await?;
        let verdict = proposal.recount(VoteTally::from_votes(&stored), forum.quorum(), now)?;
        self.repository.update_proposal(&proposal).await?;

        debug!(
            "Vote {} by {} on {}: {}",
            vote.choice,
            vote.agent_id,
            proposal.id,
            proposal.tally().vote_summary()
        );
        self.logger.log(ForumEvent::new(
            "vote_cast",
            json!({
                "forum_id": proposal.forum_id,
                "proposal_id": proposal.id,
                "agent_id": vote.agent_id,
                "choice": vote.choice,
                "reasoning": vote.reasoning,
                "agree": proposal.agree_count(),
                "disagree": proposal.disagree_count(),
            }),
        ));

        if verdict.reached() {
            self.announce_verdict(&proposal, &mut forum, &verdict).await?;
        }

        let output = CastVoteOutput {
            tally: proposal.tally(),
            status: proposal.status(),
            verdict,
            vote,
        };

        drop(guard);
        if output.status.is_terminal() {
            self.locks.prune(&proposal.id);
        }

        Ok(output)
    }

    /// Bring a voting proposal's counters in line with the stored votes.
    async fn reconcile(
        &self,
        proposal: &mut Proposal,
        now: DateTime<Utc>,
    ) -> Result<(), CastVoteError> {
        if proposal.status() != ProposalStatus::Voting || proposal.is_past_expiry(now) {
            return Ok(());
        }

        let stored = VoteTally::from_votes(&self.repository.list_votes(&proposal.id).await?);
        if stored == proposal.tally() {
            return Ok(());
        }

        warn!(
            "Proposal {} counted {} but {} votes are stored, recounting",
            proposal.id,
            proposal.tally().total(),
            stored.total()
        );
        let mut forum = self.repository.get_forum(&proposal.forum_id).await?;
        let verdict = proposal.recount(stored, forum.quorum(), now)?;
        self.repository.update_proposal(proposal).await?;
        if verdict.reached() {
            self.announce_verdict(proposal, &mut forum, &verdict).await?;
        }
        Ok(())
    }

    async fn announce_verdict(
        &self,
        proposal: &Proposal,
        forum: &mut Forum,
        verdict: &Verdict,
    ) -> Result<(), CastVoteError> {
        info!(
            "Proposal {} {} with {}",
            proposal.id,
            proposal.status(),
            proposal.tally().vote_summary()
        );
        self.logger.log(ForumEvent::new(
            "verdict_reached",
            json!({
                "forum_id": proposal.forum_id,
                "proposal_id": proposal.id,
                "status": proposal.status(),
                "reason": verdict.reason,
                "percentage": verdict.percentage,
            }),
        ));

        let before = forum.status;
        forum.follow_proposal(proposal.status());
        if forum.status != before {
            self.repository.update_forum(forum).await?;
        }
        Ok(())
    }
}
