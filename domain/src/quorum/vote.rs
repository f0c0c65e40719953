//! Vote types for forum consensus
//!
//! This module defines the voting primitives: a single agent's ballot on a
//! proposal, and the running tally of agree/disagree counts.

use crate::core::ids::{AgentId, ProposalId, VoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An agent's choice on a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Agree,
    Disagree,
}

impl VoteChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Agree => "agree",
            VoteChoice::Disagree => "disagree",
        }
    }

    pub fn is_agree(&self) -> bool {
        matches!(self, VoteChoice::Agree)
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agree" | "yes" | "approve" => Ok(VoteChoice::Agree),
            "disagree" | "no" | "reject" => Ok(VoteChoice::Disagree),
            other => Err(format!(
                "Unknown vote choice: {}. Valid: agree, disagree",
                other
            )),
        }
    }
}

/// A single agent's vote on a proposal
///
/// At most one vote exists per (proposal, agent).
///
/// # Example
///
/// ```
/// use forum_domain::quorum::{Vote, VoteChoice};
///
/// let vote = Vote::agree("p-1", "alice.eth").with_reasoning("Fees are reasonable");
/// assert_eq!(vote.choice, VoteChoice::Agree);
/// assert_eq!(vote.reasoning.as_deref(), Some("Fees are reasonable"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub id: VoteId,
    pub proposal_id: ProposalId,
    pub agent_id: AgentId,
    pub choice: VoteChoice,
    /// Free-text explanation from the agent
    pub reasoning: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// Create a new vote with a generated id, stamped now
    pub fn new(
        proposal_id: impl Into<ProposalId>,
        agent_id: impl Into<AgentId>,
        choice: VoteChoice,
    ) -> Self {
        Self {
            id: VoteId::generate(),
            proposal_id: proposal_id.into(),
            agent_id: agent_id.into(),
            choice,
            reasoning: None,
            created_at: Utc::now(),
        }
    }

    pub fn agree(proposal_id: impl Into<ProposalId>, agent_id: impl Into<AgentId>) -> Self {
        Self::new(proposal_id, agent_id, VoteChoice::Agree)
    }

    pub fn disagree(proposal_id: impl Into<ProposalId>, agent_id: impl Into<AgentId>) -> Self {
        Self::new(proposal_id, agent_id, VoteChoice::Disagree)
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Running agree/disagree counts for a proposal
///
/// Counters only ever increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub agree: usize,
    pub disagree: usize,
}

impl VoteTally {
    pub fn new(agree: usize, disagree: usize) -> Self {
        Self { agree, disagree }
    }

    /// Tally a set of stored votes
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        let mut tally = Self::default();
        for vote in votes {
            tally.record(vote.choice);
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.agree + self.disagree
    }

    pub fn record(&mut self, choice: VoteChoice) {
        match choice {
            VoteChoice::Agree => self.agree += 1,
            VoteChoice::Disagree => self.disagree += 1,
        }
    }

    /// Agreement ratio (0.0 when no votes)
    pub fn agree_ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.agree as f64 / self.total() as f64
        }
    }

    /// Generate a visual vote summary (e.g., "[●●○]")
    pub fn vote_summary(&self) -> String {
        let mut summary = String::from("[");
        summary.extend(std::iter::repeat_n('●', self.agree));
        summary.extend(std::iter::repeat_n('○', self.disagree));
        summary.push(']');
        summary
    }
}
