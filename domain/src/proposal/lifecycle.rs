//! Proposal lifecycle state machine.
//!
//! The core owns the write path of a proposal's status once voting begins.
//! Every transition goes through [`Proposal::transition`], which only allows
//! forward edges, so status never regresses.
//!
//! Expiry is pull-based: nothing here runs on a timer. Whoever touches a
//! proposal (a vote, or an external sweeper via [`Proposal::check_expiry`])
//! triggers the `voting -> expired` transition once `now > expires_at`.

use super::entities::{Proposal, ProposalStatus};
use crate::core::ids::{AgentId, ProposalId};
use crate::quorum::{ConsensusOutcome, QuorumConfig, Verdict, VoteChoice, VoteTally, evaluate};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Validation failures of lifecycle operations
///
/// These are never retried; callers surface them as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("Agent {agent} already voted on proposal {proposal}")]
    DuplicateVote { proposal: ProposalId, agent: AgentId },

    #[error("Cannot {operation} proposal {proposal} in status {status}")]
    InvalidState {
        proposal: ProposalId,
        status: ProposalStatus,
        operation: &'static str,
    },

    #[error("Proposal {proposal} expired at {expired_at}")]
    Expired {
        proposal: ProposalId,
        expired_at: DateTime<Utc>,
    },
}

impl Proposal {
    fn transition(
        &mut self,
        next: ProposalStatus,
        operation: &'static str,
    ) -> Result<(), LifecycleError> {
        if !self.status.can_transition_to(next) {
            return Err(LifecycleError::InvalidState {
                proposal: self.id.clone(),
                status: self.status,
                operation,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Expire a `voting` proposal whose horizon has passed.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn check_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == ProposalStatus::Voting && self.is_past_expiry(now) {
            self.status = ProposalStatus::Expired;
            self.resolved_at = Some(now);
            true
        } else {
            false
        }
    }

    /// Check that a vote could be accepted right now.
    ///
    /// Performs the lazy expiry transition as a side effect; on `Expired` the
    /// caller must persist the proposal before surfacing the error.
    pub fn ensure_accepts_votes(&mut self, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        if self.status != ProposalStatus::Voting {
            return Err(LifecycleError::InvalidState {
                proposal: self.id.clone(),
                status: self.status,
                operation: "vote on",
            });
        }
        if self.check_expiry(now) {
            return Err(LifecycleError::Expired {
                proposal: self.id.clone(),
                expired_at: self.expires_at,
            });
        }
        Ok(())
    }

    /// Count a vote that has already been durably appended, then re-evaluate.
    ///
    /// On a reached verdict the proposal moves to `approved` or `rejected` and
    /// `resolved_at` is stamped.
    pub fn apply_vote(
        &mut self,
        choice: VoteChoice,
        config: &QuorumConfig,
        now: DateTime<Utc>,
    ) -> Result<Verdict, LifecycleError> {
        let mut tally = self.tally;
        tally.record(choice);
        self.recount(tally, config, now)
    }

    /// Adopt the tally of the durably stored votes, then re-evaluate.
    ///
    /// The stored votes are authoritative. Counters that lag behind them are
    /// replaced, never added to.
    pub fn recount(
        &mut self,
        tally: VoteTally,
        config: &QuorumConfig,
        now: DateTime<Utc>,
    ) -> Result<Verdict, LifecycleError> {
        self.ensure_accepts_votes(now)?;

        self.tally = tally;
        let verdict = evaluate(self.tally, config);

        match verdict.outcome {
            ConsensusOutcome::Approved => {
                self.transition(ProposalStatus::Approved, "approve")?;
                self.resolved_at = Some(now);
            }
            ConsensusOutcome::Rejected => {
                self.transition(ProposalStatus::Rejected, "reject")?;
                self.resolved_at = Some(now);
            }
            ConsensusOutcome::Pending => {}
        }

        Ok(verdict)
    }

    /// `approved -> executing`
    pub fn begin_execution(&mut self) -> Result<(), LifecycleError> {
        self.transition(ProposalStatus::Executing, "begin execution of")
    }

    /// `executing -> executed | failed`
    pub fn complete_execution(
        &mut self,
        all_succeeded: bool,
        now: DateTime<Utc>,
    ) -> Result<ProposalStatus, LifecycleError> {
        let next = if all_succeeded {
            ProposalStatus::Executed
        } else {
            ProposalStatus::Failed
        };
        self.transition(next, "complete execution of")?;
        self.resolved_at = Some(now);
        Ok(next)
    }
}
