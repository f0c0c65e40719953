//! One simulated forum round: discussion, proposal, voting, execution.
//!
//! The round stands in for the agents' generation step: participation,
//! the proposal JSON and each vote are given up front instead of coming
//! from a model.

use anyhow::{Context, Result};
use forum_application::{
    AddressSigner, CastVoteInput, CastVoteUseCase, CheckExpiryUseCase, Clock,
    ExecuteProposalInput, ExecuteProposalUseCase, ExecutionCapability, ExecutionCoordinator,
    ExecutionOptions, ExecutionProgressNotifier, Executor, ExecutorSelection, ForumEventLogger,
    ForumRepository, NoExecutionProgress, NoForumEventLogger, ProposalLocks, ShouldSpeakUseCase,
};
use forum_domain::{
    AgentId, AgentProfile, DiscussionMessage, DiscussionPolicy, Forum, MessageKind, Proposal,
    ProposalDraft, ProposalStatus, QuorumConfig, VoteChoice,
};
use forum_infrastructure::InMemoryForumStore;
use forum_presentation::{RoundReport, SkippedVote, SpeakerTurn};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Proposal filed when none is given on the command line
pub const DEFAULT_PROPOSAL: &str = r#"{
  "action": "swap",
  "params": {
    "token_in": "USDC",
    "token_out": "WETH",
    "amount_in": "1000",
    "fee": 3000,
    "slippage_bps": 50
  },
  "reasoning": "Idle USDC earns nothing; WETH exposure matches the pool focus"
}"#;

/// Everything a round needs besides its adapters
#[derive(Debug, Clone)]
pub struct RoundSettings {
    pub goal: String,
    /// Participants in join order; the first one proposes
    pub agents: Vec<AgentProfile>,
    pub pool: Option<String>,
    pub proposal_json: String,
    /// Scripted votes; missing agents agree
    pub votes: HashMap<AgentId, VoteChoice>,
    pub selection: ExecutorSelection,
    pub quorum: QuorumConfig,
    pub timeout_minutes: u64,
    pub policy: DiscussionPolicy,
    pub message_window: usize,
    pub options: ExecutionOptions,
}

impl RoundSettings {
    pub fn new(goal: impl Into<String>, agents: Vec<AgentProfile>) -> Self {
        Self {
            goal: goal.into(),
            agents,
            pool: None,
            proposal_json: DEFAULT_PROPOSAL.to_string(),
            votes: HashMap::new(),
            selection: ExecutorSelection::default(),
            quorum: QuorumConfig::default(),
            timeout_minutes: 60,
            policy: DiscussionPolicy::default(),
            message_window: 20,
            options: ExecutionOptions::default(),
        }
    }

    fn choice_for(&self, agent: &AgentId) -> VoteChoice {
        self.votes.get(agent).copied().unwrap_or(VoteChoice::Agree)
    }
}

/// Drives a round through the use cases against one store
pub struct RoundRunner<C: ExecutionCapability + 'static> {
    store: Arc<InMemoryForumStore>,
    capability: Arc<C>,
    clock: Arc<dyn Clock>,
    locks: Arc<ProposalLocks>,
    logger: Arc<dyn ForumEventLogger>,
    progress: Arc<dyn ExecutionProgressNotifier>,
}

impl<C: ExecutionCapability + 'static> RoundRunner<C> {
    pub fn new(store: Arc<InMemoryForumStore>, capability: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            capability,
            clock,
            locks: Arc::new(ProposalLocks::new()),
            logger: Arc::new(NoForumEventLogger),
            progress: Arc::new(NoExecutionProgress),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ForumEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ExecutionProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub async fn run(&self, settings: RoundSettings) -> Result<RoundReport> {
        let proposer = settings
            .agents
            .first()
            .map(|a| a.id.clone())
            .context("a forum round needs at least one agent")?;
        let draft =
            ProposalDraft::from_json(&settings.proposal_json).context("invalid proposal")?;

        // Forum
        let mut forum = Forum::new(
            settings.goal.clone(),
            settings.quorum,
            settings.timeout_minutes,
            self.clock.now(),
        );
        if let Some(pool) = &settings.pool {
            forum = forum.with_pool_focus(pool.clone());
        }
        for agent in &settings.agents {
            forum.join(agent.id.clone());
            self.store.upsert_agent(agent.clone())?;
        }
        let forum_id = forum.id.clone();
        self.store.insert_forum(forum.clone())?;
        info!(
            "Forum {} opened with {} agents ({})",
            forum_id,
            settings.agents.len(),
            forum.quorum().description()
        );

        // Discussion
        let scheduler = ShouldSpeakUseCase::new(self.store.clone(), self.clock.clone())
            .with_policy(settings.policy)
            .with_message_window(settings.message_window);
        let speakers = scheduler.next_speakers(&forum_id).await?;
        for (agent, decision) in &speakers {
            self.store.post_message(DiscussionMessage::autonomous(
                forum_id.clone(),
                agent.clone(),
                format!("Weighing in on \"{}\" ({})", settings.goal, decision.reason),
                self.clock.now(),
            ))?;
        }

        // Proposal
        let mut proposal =
            Proposal::for_forum(&forum, proposer.clone(), draft.action, self.clock.now());
        if let Some(hooks) = draft.hooks {
            proposal = proposal.with_hooks(hooks);
        }
        let proposal_id = proposal.id.clone();
        let pitch = draft.reasoning.unwrap_or_else(|| proposal.action.describe());
        self.store.post_message(
            DiscussionMessage::autonomous(
                forum_id.clone(),
                proposer.clone(),
                pitch,
                self.clock.now(),
            )
            .with_kind(MessageKind::Proposal),
        )?;
        info!("{} proposed {}: {}", proposer, proposal_id, proposal.action.describe());
        self.store.insert_proposal(proposal)?;

        // Voting
        let cast = CastVoteUseCase::new(self.store.clone(), self.clock.clone())
            .with_locks(self.locks.clone())
            .with_logger(self.logger.clone());
        let mut votes = Vec::new();
        let mut skipped_votes = Vec::new();
        for agent in &settings.agents {
            let choice = settings.choice_for(&agent.id);
            let input = CastVoteInput::new(proposal_id.clone(), agent.id.clone(), choice);
            match cast.execute(input).await {
                Ok(output) => votes.push(output),
                Err(e) => {
                    warn!("Vote by {} not accepted: {}", agent.id, e);
                    skipped_votes.push(SkippedVote {
                        agent_id: agent.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let expiry = CheckExpiryUseCase::new(self.store.clone(), self.clock.clone())
            .with_locks(self.locks.clone())
            .with_logger(self.logger.clone());
        let status = expiry.execute(&proposal_id).await?;

        // Execution
        let execution = if status == ProposalStatus::Approved {
            let executors: Vec<Executor> = votes
                .iter()
                .filter(|v| v.vote.choice == VoteChoice::Agree)
                .map(|v| {
                    let agent = v.vote.agent_id.clone();
                    let signer = Arc::new(AddressSigner::new(agent.as_str()));
                    Executor::new(agent, signer)
                })
                .collect();

            let coordinator = ExecutionCoordinator::new(
                self.capability.clone(),
                self.store.clone(),
                self.clock.clone(),
            )
            .with_progress(self.progress.clone())
            .with_logger(self.logger.clone());
            let use_case =
                ExecuteProposalUseCase::new(coordinator, self.store.clone(), self.clock.clone())
                    .with_locks(self.locks.clone())
                    .with_logger(self.logger.clone());

            let input = ExecuteProposalInput::new(proposal_id.clone(), executors)
                .with_selection(settings.selection)
                .with_options(settings.options.clone());
            Some(use_case.execute(input).await?)
        } else {
            info!("Proposal {} ends the round {}", proposal_id, status);
            None
        };

        expiry.check_forum(&forum_id).await?;

        Ok(RoundReport {
            forum: self.store.get_forum(&forum_id).await?,
            speakers: speakers
                .into_iter()
                .map(|(agent_id, decision)| SpeakerTurn {
                    agent_id,
                    reason: decision.reason,
                })
                .collect(),
            proposal: self.store.get_proposal(&proposal_id).await?,
            votes,
            skipped_votes,
            execution,
        })
    }
}
