//! Quorum evaluation
//!
//! [`evaluate`] turns a vote tally and a [`QuorumConfig`] into a [`Verdict`].
//! It is a pure function: calling it again with the same counts yields the
//! same verdict, so it can be re-run after every appended vote.

use super::rule::QuorumConfig;
use super::vote::VoteTally;
use serde::{Deserialize, Serialize};

/// Tolerance for ratio comparisons so that e.g. 3/5 meets a 0.6 threshold.
const RATIO_EPSILON: f64 = 1e-9;

/// Outcome of a quorum evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusOutcome {
    /// Consensus reached: approved
    Approved,
    /// Consensus reached: rejected
    Rejected,
    /// No consensus yet
    Pending,
}

impl ConsensusOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, ConsensusOutcome::Approved)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ConsensusOutcome::Rejected)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConsensusOutcome::Pending)
    }
}

impl std::fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusOutcome::Approved => write!(f, "Approved"),
            ConsensusOutcome::Rejected => write!(f, "Rejected"),
            ConsensusOutcome::Pending => write!(f, "Pending"),
        }
    }
}

/// Why a verdict was (or was not) reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    /// Fewer votes than the forum's minimum participants
    InsufficientParticipation,
    /// Enough votes, but neither side has settled the outcome
    VotingInProgress,
    /// Disagreement already exceeds what the threshold tolerates
    ConsensusImpossible,
}

impl VerdictReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictReason::InsufficientParticipation => "insufficient_participation",
            VerdictReason::VotingInProgress => "voting_in_progress",
            VerdictReason::ConsensusImpossible => "consensus_impossible",
        }
    }
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of evaluating a tally against a quorum config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: ConsensusOutcome,
    pub reason: Option<VerdictReason>,
    /// Agreement ratio, absent when participation was insufficient
    pub percentage: Option<f64>,
}

impl Verdict {
    fn approved(percentage: f64) -> Self {
        Self {
            outcome: ConsensusOutcome::Approved,
            reason: None,
            percentage: Some(percentage),
        }
    }

    fn rejected(percentage: f64) -> Self {
        Self {
            outcome: ConsensusOutcome::Rejected,
            reason: Some(VerdictReason::ConsensusImpossible),
            percentage: Some(percentage),
        }
    }

    fn pending(reason: VerdictReason, percentage: Option<f64>) -> Self {
        Self {
            outcome: ConsensusOutcome::Pending,
            reason: Some(reason),
            percentage,
        }
    }

    /// Whether this verdict settles the proposal
    pub fn reached(&self) -> bool {
        !self.outcome.is_pending()
    }
}

/// Evaluate a tally against the forum's quorum rule
///
/// # Example
///
/// ```
/// use forum_domain::quorum::{evaluate, ConsensusOutcome, QuorumConfig, VoteTally};
///
/// let config = QuorumConfig::new(0.6, 3).unwrap();
///
/// let verdict = evaluate(VoteTally::new(3, 1), &config);
/// assert_eq!(verdict.outcome, ConsensusOutcome::Approved);
/// assert_eq!(verdict.percentage, Some(0.75));
///
/// let verdict = evaluate(VoteTally::new(1, 1), &config);
/// assert!(!verdict.reached());
/// ```
pub fn evaluate(tally: VoteTally, config: &QuorumConfig) -> Verdict {
    let total = tally.total();

    // Also covers total == 0, so no division below can be by zero.
    if total == 0 || total < config.min_participants() {
        return Verdict::pending(VerdictReason::InsufficientParticipation, None);
    }

    let agree_ratio = tally.agree as f64 / total as f64;
    if agree_ratio + RATIO_EPSILON >= config.threshold() {
        return Verdict::approved(agree_ratio);
    }

    let disagree_ratio = tally.disagree as f64 / total as f64;
    if disagree_ratio > config.max_disagreement() + RATIO_EPSILON {
        return Verdict::rejected(agree_ratio);
    }

    Verdict::pending(VerdictReason::VotingInProgress, Some(agree_ratio))
}
