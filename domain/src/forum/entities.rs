//! Forum entity - a group of agents discussing one goal.

use crate::core::ids::{AgentId, ForumId};
use crate::core::time::{saturating_add, saturating_minutes};
use crate::proposal::ProposalStatus;
use crate::quorum::QuorumConfig;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Status of a forum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForumStatus {
    #[default]
    Active,
    /// A proposal has been approved and awaits execution
    Consensus,
    Executing,
    Executed,
    Expired,
}

impl ForumStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForumStatus::Active => "active",
            ForumStatus::Consensus => "consensus",
            ForumStatus::Executing => "executing",
            ForumStatus::Executed => "executed",
            ForumStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ForumStatus::Executed | ForumStatus::Expired)
    }
}

impl std::fmt::Display for ForumStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A forum of agents working toward a goal
///
/// The quorum rule is fixed at creation. Participants only grow through
/// [`Forum::join`] and are kept in join order without duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forum {
    pub id: ForumId,
    pub goal: String,
    /// Pool the discussion is about (e.g. "USDC/WETH")
    #[serde(default)]
    pub pool_focus: Option<String>,
    quorum: QuorumConfig,
    timeout_minutes: u64,
    pub status: ForumStatus,
    participants: Vec<AgentId>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Forum {
    pub fn new(
        goal: impl Into<String>,
        quorum: QuorumConfig,
        timeout_minutes: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ForumId::generate(),
            goal: goal.into(),
            pool_focus: None,
            quorum,
            timeout_minutes,
            status: ForumStatus::Active,
            participants: Vec::new(),
            created_at,
            expires_at: saturating_add(created_at, saturating_minutes(timeout_minutes)),
        }
    }

    pub fn with_id(mut self, id: impl Into<ForumId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_pool_focus(mut self, pool: impl Into<String>) -> Self {
        self.pool_focus = Some(pool.into());
        self
    }

    pub fn quorum(&self) -> &QuorumConfig {
        &self.quorum
    }

    /// Proposal expiry horizon
    pub fn timeout(&self) -> Duration {
        saturating_minutes(self.timeout_minutes)
    }

    pub fn participants(&self) -> &[AgentId] {
        &self.participants
    }

    pub fn is_participant(&self, agent: &AgentId) -> bool {
        self.participants.contains(agent)
    }

    /// Add an agent to the forum. Returns `false` if it was already a member.
    pub fn join(&mut self, agent: impl Into<AgentId>) -> bool {
        let agent = agent.into();
        if self.is_participant(&agent) {
            return false;
        }
        self.participants.push(agent);
        true
    }

    /// Expire an active forum whose horizon has passed.
    pub fn check_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == ForumStatus::Active && now > self.expires_at {
            self.status = ForumStatus::Expired;
            true
        } else {
            false
        }
    }

    /// Mirror a proposal's progress onto the forum.
    ///
    /// A failed execution hands the forum back to discussion so a new
    /// proposal can be made.
    pub fn follow_proposal(&mut self, status: ProposalStatus) {
        if self.status.is_terminal() {
            return;
        }
        self.status = match status {
            ProposalStatus::Approved => ForumStatus::Consensus,
            ProposalStatus::Executing => ForumStatus::Executing,
            ProposalStatus::Executed => ForumStatus::Executed,
            ProposalStatus::Failed => ForumStatus::Active,
            ProposalStatus::Voting | ProposalStatus::Rejected | ProposalStatus::Expired => {
                self.status
            }
        };
    }
}
