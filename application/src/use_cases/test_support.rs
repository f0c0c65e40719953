//! Mock ports shared by the use case tests.

use crate::ports::clock::Clock;
use crate::ports::event_logger::{ForumEvent, ForumEventLogger};
use crate::ports::execution_capability::{
    ExecutionCapability, SubmissionContext, SubmissionError, SubmissionOutcome,
};
use crate::ports::repository::{ForumRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use forum_domain::{
    AddLiquidityParams, AgentId, AgentProfile, DiscussionMessage, Execution, Forum, ForumId,
    LimitOrderParams, Proposal, ProposalAction, ProposalId, QuorumConfig, RemoveLiquidityParams,
    SwapParams, Vote,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

pub(crate) fn swap_action() -> ProposalAction {
    ProposalAction::Swap(SwapParams {
        token_in: "USDC".to_string(),
        token_out: "WETH".to_string(),
        amount_in: "250".to_string(),
        min_amount_out: None,
        fee: Some(3000),
        slippage_bps: Some(50),
    })
}

/// Forum `f-1` (0.6 / 3, 30 minute timeout) with the given participants
pub(crate) fn forum(participants: &[&str]) -> Forum {
    let mut forum = Forum::new("Rebalance the treasury", QuorumConfig::default(), 30, t0())
        .with_id("f-1")
        .with_pool_focus("USDC/WETH");
    for agent in participants {
        forum.join(*agent);
    }
    forum
}

/// Proposal `p-1` in `f-1`, voting, expiring at `t0 + 30min`
pub(crate) fn proposal() -> Proposal {
    Proposal::new("f-1", "alice.eth", swap_action(), t0(), Duration::minutes(30)).with_id("p-1")
}

// ==================== Repository ====================

#[derive(Default)]
pub(crate) struct MockRepository {
    pub forums: Mutex<HashMap<ForumId, Forum>>,
    pub agents: Mutex<HashMap<AgentId, AgentProfile>>,
    pub proposals: Mutex<HashMap<ProposalId, Proposal>>,
    pub votes: Mutex<Vec<Vote>>,
    pub messages: Mutex<Vec<DiscussionMessage>>,
    pub executions: Mutex<Vec<Execution>>,
    /// Number of upcoming `update_proposal` calls that fail
    pub failing_proposal_updates: Mutex<usize>,
}

impl MockRepository {
    pub fn failing_proposal_updates(self, count: usize) -> Self {
        *self.failing_proposal_updates.lock().unwrap() = count;
        self
    }

    pub fn with_forum(self, forum: Forum) -> Self {
        self.forums.lock().unwrap().insert(forum.id.clone(), forum);
        self
    }

    pub fn with_proposal(self, proposal: Proposal) -> Self {
        self.proposals
            .lock()
            .unwrap()
            .insert(proposal.id.clone(), proposal);
        self
    }

    pub fn with_agent(self, agent: AgentProfile) -> Self {
        self.agents.lock().unwrap().insert(agent.id.clone(), agent);
        self
    }

    pub fn with_message(self, message: DiscussionMessage) -> Self {
        self.messages.lock().unwrap().push(message);
        self
    }

    pub fn stored_proposal(&self, id: &str) -> Proposal {
        self.proposals
            .lock()
            .unwrap()
            .get(&ProposalId::new(id))
            .cloned()
            .unwrap()
    }

    pub fn stored_forum(&self, id: &str) -> Forum {
        self.forums
            .lock()
            .unwrap()
            .get(&ForumId::new(id))
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl ForumRepository for MockRepository {
    async fn get_forum(&self, id: &ForumId) -> Result<Forum, RepositoryError> {
        self.forums
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::ForumNotFound(id.clone()))
    }

    async fn update_forum(&self, forum: &Forum) -> Result<(), RepositoryError> {
        self.forums
            .lock()
            .unwrap()
            .insert(forum.id.clone(), forum.clone());
        Ok(())
    }

    async fn get_agent(&self, id: &AgentId) -> Result<AgentProfile, RepositoryError> {
        self.agents
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::AgentNotFound(id.clone()))
    }

    async fn get_proposal(&self, id: &ProposalId) -> Result<Proposal, RepositoryError> {
        self.proposals
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::ProposalNotFound(id.clone()))
    }

    async fn update_proposal(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        {
            let mut failing = self.failing_proposal_updates.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(RepositoryError::Storage("disk full".to_string()));
            }
        }
        self.proposals
            .lock()
            .unwrap()
            .insert(proposal.id.clone(), proposal.clone());
        Ok(())
    }

    async fn has_voted(
        &self,
        proposal: &ProposalId,
        agent: &AgentId,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .any(|v| &v.proposal_id == proposal && &v.agent_id == agent))
    }

    async fn append_vote(&self, vote: &Vote) -> Result<(), RepositoryError> {
        let mut votes = self.votes.lock().unwrap();
        if votes
            .iter()
            .any(|v| v.proposal_id == vote.proposal_id && v.agent_id == vote.agent_id)
        {
            return Err(RepositoryError::DuplicateVote {
                proposal: vote.proposal_id.clone(),
                agent: vote.agent_id.clone(),
            });
        }
        votes.push(vote.clone());
        Ok(())
    }

    async fn list_votes(&self, proposal: &ProposalId) -> Result<Vec<Vote>, RepositoryError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter(|v| &v.proposal_id == proposal)
            .cloned()
            .collect())
    }

    async fn list_recent_messages(
        &self,
        forum: &ForumId,
        limit: usize,
    ) -> Result<Vec<DiscussionMessage>, RepositoryError> {
        let messages: Vec<_> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| &m.forum_id == forum)
            .cloned()
            .collect();
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.into_iter().skip(skip).collect())
    }

    async fn record_execution(&self, execution: &Execution) -> Result<(), RepositoryError> {
        self.executions.lock().unwrap().push(execution.clone());
        Ok(())
    }

    async fn list_executions(
        &self,
        proposal: &ProposalId,
    ) -> Result<Vec<Execution>, RepositoryError> {
        Ok(self
            .executions
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.proposal_id == proposal)
            .cloned()
            .collect())
    }
}

// ==================== Clock ====================

pub(crate) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ==================== Event logger ====================

#[derive(Default)]
pub(crate) struct RecordingLogger {
    pub events: Mutex<Vec<ForumEvent>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type)
            .collect()
    }
}

impl ForumEventLogger for RecordingLogger {
    fn log(&self, event: ForumEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ==================== Execution capability ====================

/// One recorded capability invocation
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub method: &'static str,
    pub signer: String,
    pub chain_id: u64,
    pub at: tokio::time::Instant,
}

type Scripted = Result<SubmissionOutcome, SubmissionError>;

/// Capability that replays scripted answers per signer address
///
/// Once a signer's script is exhausted every call succeeds with
/// `0x<address>`.
#[derive(Default)]
pub(crate) struct ScriptedCapability {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    pub calls: Mutex<Vec<Call>>,
    /// Simulated submission latency
    pub latency: std::time::Duration,
}

impl ScriptedCapability {
    pub fn script(self, signer: &str, answers: Vec<Scripted>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(signer.to_string(), answers.into());
        self
    }

    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, method: &'static str, ctx: SubmissionContext<'_>) -> Scripted {
        let signer = ctx.signer.address().to_string();
        self.calls.lock().unwrap().push(Call {
            method,
            signer: signer.clone(),
            chain_id: ctx.chain_id,
            at: tokio::time::Instant::now(),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if signer == "panic" {
            panic!("signer exploded");
        }
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&signer)
            .and_then(|q| q.pop_front());
        next.unwrap_or_else(|| Ok(SubmissionOutcome::submitted(format!("0x{signer}"))))
    }
}

#[async_trait]
impl ExecutionCapability for ScriptedCapability {
    async fn swap(
        &self,
        _params: &SwapParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.answer("swap", ctx).await
    }

    async fn add_liquidity(
        &self,
        _params: &AddLiquidityParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.answer("add_liquidity", ctx).await
    }

    async fn remove_liquidity(
        &self,
        _params: &RemoveLiquidityParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.answer("remove_liquidity", ctx).await
    }

    async fn limit_order(
        &self,
        _params: &LimitOrderParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.answer("limit_order", ctx).await
    }
}
