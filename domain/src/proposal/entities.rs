//! Proposal entity and its status.

use super::action::{ExecutionHooks, ProposalAction};
use crate::core::ids::{AgentId, ForumId, ProposalId};
use crate::core::time::saturating_add;
use crate::forum::Forum;
use crate::quorum::VoteTally;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Status of a proposal
///
/// ```text
/// voting ──► approved ──► executing ──► executed
///   │                          └──────► failed
///   ├──────► rejected
///   └──────► expired
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Voting,
    Approved,
    Rejected,
    Expired,
    Executing,
    Executed,
    Failed,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Voting => "voting",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Expired => "expired",
            ProposalStatus::Executing => "executing",
            ProposalStatus::Executed => "executed",
            ProposalStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalStatus::Rejected
                | ProposalStatus::Expired
                | ProposalStatus::Executed
                | ProposalStatus::Failed
        )
    }

    /// Whether moving from `self` to `next` is a forward edge of the lifecycle
    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        use ProposalStatus::*;
        matches!(
            (self, next),
            (Voting, Approved)
                | (Voting, Rejected)
                | (Voting, Expired)
                | (Approved, Executing)
                | (Executing, Executed)
                | (Executing, Failed)
        )
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An action proposal under vote in a forum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub forum_id: ForumId,
    pub proposer: AgentId,
    pub action: ProposalAction,
    #[serde(default)]
    pub hooks: Option<ExecutionHooks>,
    pub(crate) status: ProposalStatus,
    pub(crate) tally: VoteTally,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub(crate) resolved_at: Option<DateTime<Utc>>,
}

impl Proposal {
    /// Create a proposal in `voting` that expires after `timeout`
    pub fn new(
        forum_id: impl Into<ForumId>,
        proposer: impl Into<AgentId>,
        action: ProposalAction,
        created_at: DateTime<Utc>,
        timeout: Duration,
    ) -> Self {
        Self {
            id: ProposalId::generate(),
            forum_id: forum_id.into(),
            proposer: proposer.into(),
            action,
            hooks: None,
            status: ProposalStatus::Voting,
            tally: VoteTally::default(),
            created_at,
            expires_at: saturating_add(created_at, timeout),
            resolved_at: None,
        }
    }

    /// Create a proposal using the forum's timeout
    pub fn for_forum(
        forum: &Forum,
        proposer: impl Into<AgentId>,
        action: ProposalAction,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(forum.id.clone(), proposer, action, created_at, forum.timeout())
    }

    pub fn with_id(mut self, id: impl Into<ProposalId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_hooks(mut self, hooks: ExecutionHooks) -> Self {
        self.hooks = (!hooks.is_empty()).then_some(hooks);
        self
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn tally(&self) -> VoteTally {
        self.tally
    }

    pub fn agree_count(&self) -> usize {
        self.tally.agree
    }

    pub fn disagree_count(&self) -> usize {
        self.tally.disagree
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Whether `now` is strictly past the expiry horizon
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::action::{HookFlag, RemoveLiquidityParams};

    fn action() -> ProposalAction {
        ProposalAction::RemoveLiquidity(RemoveLiquidityParams {
            position_id: "7".to_string(),
            percentage: 50,
            collect_fees: true,
        })
    }

    #[test]
    fn test_new_proposal_is_voting() {
        let now = Utc::now();
        let proposal = Proposal::new("f-1", "alice.eth", action(), now, Duration::minutes(30));
        assert_eq!(proposal.status(), ProposalStatus::Voting);
        assert_eq!(proposal.tally(), VoteTally::default());
        assert_eq!(proposal.expires_at, now + Duration::minutes(30));
        assert!(proposal.resolved_at().is_none());
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let proposal = Proposal::new("f-1", "alice.eth", action(), now, Duration::minutes(1));
        assert!(!proposal.is_past_expiry(proposal.expires_at));
        assert!(proposal.is_past_expiry(proposal.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_oversized_forum_timeout_never_expires() {
        let now = Utc::now();
        let forum = Forum::new("Earn yield", crate::quorum::QuorumConfig::default(), u64::MAX, now);
        let proposal = Proposal::for_forum(&forum, "alice.eth", action(), now);
        assert_eq!(proposal.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!proposal.is_past_expiry(now + Duration::days(3650)));
    }

    #[test]
    fn test_empty_hooks_are_dropped() {
        let proposal = Proposal::new("f-1", "a", action(), Utc::now(), Duration::minutes(1))
            .with_hooks(ExecutionHooks::default());
        assert!(proposal.hooks.is_none());

        let proposal = proposal.with_hooks(ExecutionHooks {
            address: None,
            flags: vec![HookFlag::AfterRemoveLiquidity],
        });
        assert!(proposal.hooks.is_some());
    }

    #[test]
    fn test_transitions_are_forward_only() {
        use ProposalStatus::*;
        assert!(Voting.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Executing));
        assert!(Executing.can_transition_to(Failed));
        assert!(!Approved.can_transition_to(Voting));
        assert!(!Executed.can_transition_to(Executing));
        assert!(!Voting.can_transition_to(Executing));
        assert!(!Rejected.can_transition_to(Approved));
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProposalStatus::Expired.is_terminal());
        assert!(ProposalStatus::Failed.is_terminal());
        assert!(!ProposalStatus::Approved.is_terminal());
        assert!(!ProposalStatus::Executing.is_terminal());
    }
}
