//! Execute Proposal use case
//!
//! Drives an approved proposal through execution:
//!
//! ```text
//! approved ──begin──▶ executing ──coordinator──▶ executed   (no failures)
//!                                             └▶ failed     (any failure)
//! ```
//!
//! The forum follows along (`executing`, then `executed`, or back to
//! `active` after a failure so a new proposal can be made).

use crate::config::ExecutionOptions;
use crate::ports::clock::Clock;
use crate::ports::event_logger::{ForumEvent, ForumEventLogger, NoForumEventLogger};
use crate::ports::execution_capability::ExecutionCapability;
use crate::ports::repository::{ForumRepository, RepositoryError};
use crate::use_cases::execution_coordinator::{
    CoordinatorError, ExecutionCoordinator, Executor, SoleExecutor,
};
use crate::use_cases::shared::ProposalLocks;
use forum_domain::{
    ExecutionResult, ExecutionSummary, LifecycleError, Proposal, ProposalId, ProposalStatus,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while executing a proposal
#[derive(Error, Debug)]
pub enum ExecuteProposalError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Who submits the action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutorSelection {
    /// First designated executor only
    #[default]
    Sole,
    /// Every designated executor
    All,
}

/// Input for the ExecuteProposal use case
#[derive(Debug, Clone)]
pub struct ExecuteProposalInput {
    pub proposal_id: ProposalId,
    pub executors: Vec<Executor>,
    pub selection: ExecutorSelection,
    pub options: ExecutionOptions,
}

impl ExecuteProposalInput {
    pub fn new(proposal_id: impl Into<ProposalId>, executors: Vec<Executor>) -> Self {
        Self {
            proposal_id: proposal_id.into(),
            executors,
            selection: ExecutorSelection::Sole,
            options: ExecutionOptions::default(),
        }
    }

    pub fn with_selection(mut self, selection: ExecutorSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcome of an execution run
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteProposalOutput {
    pub proposal_id: ProposalId,
    /// `executed` or `failed`
    pub status: ProposalStatus,
    pub results: Vec<ExecutionResult>,
    pub summary: ExecutionSummary,
}

/// Use case for executing an approved proposal
pub struct ExecuteProposalUseCase<C, R>
where
    C: ExecutionCapability + 'static,
    R: ForumRepository + 'static,
{
    coordinator: ExecutionCoordinator<C, R>,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    locks: Arc<ProposalLocks>,
    logger: Arc<dyn ForumEventLogger>,
}

impl<C, R> ExecuteProposalUseCase<C, R>
where
    C: ExecutionCapability + 'static,
    R: ForumRepository + 'static,
{
    pub fn new(
        coordinator: ExecutionCoordinator<C, R>,
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            coordinator,
            repository,
            clock,
            locks: Arc::new(ProposalLocks::new()),
            logger: Arc::new(NoForumEventLogger),
        }
    }

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
    /// Executor selection is validated before the proposal is touched, so a
    /// missing executor leaves it `approved`.
    pub async fn execute(
        &self,
        input: ExecuteProposalInput,
    ) -> Result<ExecuteProposalOutput, ExecuteProposalError> {
        let sole = match input.selection {
            ExecutorSelection::Sole => {
                Some(SoleExecutor::from_designated(input.executors.clone())?)
            }
            ExecutorSelection::All if input.executors.is_empty() => {
                return Err(CoordinatorError::NoExecutor.into());
            }
            ExecutorSelection::All => None,
        };

        let mut proposal = self.begin(&input.proposal_id).await?;
        info!(
            "Executing proposal {}: {}",
            proposal.id,
            proposal.action.describe()
        );

        let results = match sole {
            Some(sole) => {
                self.coordinator
                    .run(&proposal, sole, &input.options)
                    .await
            }
            None => {
                self.coordinator
                    .run_batch(&proposal, &input.executors, &input.options)
                    .await
            }
        };
        let summary = ExecutionCoordinator::<C, R>::summarize(&results);

        let status = self.complete(&mut proposal, &summary).await?;
        if summary.all_succeeded() {
            info!("Proposal {} executed: {:?}", proposal.id, summary.tx_hashes);
        } else {
            warn!(
                "Proposal {} failed: {}/{} executors failed",
                proposal.id, summary.failed, summary.total
            );
        }

        Ok(ExecuteProposalOutput {
            proposal_id: proposal.id,
            status,
            results,
            summary,
        })
    }

    /// `approved -> executing`, under the proposal lock
    async fn begin(&self, proposal_id: &ProposalId) -> Result<Proposal, ExecuteProposalError> {
        let _guard = self.locks.acquire(proposal_id).await;

        let mut proposal = self.repository.get_proposal(proposal_id).await?;
        proposal.begin_execution()?;
        self.repository.update_proposal(&proposal).await?;
        self.follow_on_forum(&proposal).await?;

        self.logger.log(ForumEvent::new(
            "execution_started",
            json!({
                "forum_id": proposal.forum_id,
                "proposal_id": proposal.id,
                "action": proposal.action,
                "hooks": proposal.hooks,
            }),
        ));

        Ok(proposal)
    }

    /// `executing -> executed | failed`, under the proposal lock
    async fn complete(
        &self,
        proposal: &mut Proposal,
        summary: &ExecutionSummary,
    ) -> Result<ProposalStatus, ExecuteProposalError> {
        let guard = self.locks.acquire(&proposal.id).await;

        let status = proposal.complete_execution(summary.all_succeeded(), self.clock.now())?;
        self.repository.update_proposal(proposal).await?;
        self.follow_on_forum(proposal).await?;

        self.logger.log(ForumEvent::new(
            "execution_completed",
            json!({
                "forum_id": proposal.forum_id,
                "proposal_id": proposal.id,
                "status": status,
                "summary": summary,
            }),
        ));

        drop(guard);
        self.locks.prune(&proposal.id);
        Ok(status)
    }

    async fn follow_on_forum(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        let mut forum = self.repository.get_forum(&proposal.forum_id).await?;
        let before = forum.status;
        forum.follow_proposal(proposal.status());
        if forum.status != before {
            self.repository.update_forum(&forum).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::ports::execution_capability::SubmissionOutcome;
    use crate::ports::signer::AddressSigner;
    use crate::use_cases::test_support::{
        FixedClock, MockRepository, RecordingLogger, ScriptedCapability, forum, proposal, t0,
    };
    use forum_domain::{ForumStatus, QuorumConfig, VoteChoice};
    use std::time::Duration;

    fn executor(address: &str) -> Executor {
        Executor::new(address, Arc::new(AddressSigner::new(address)))
    }

    fn approved_proposal() -> Proposal {
        let mut p = proposal();
        let quorum = QuorumConfig::default();
        for _ in 0..3 {
            p.apply_vote(VoteChoice::Agree, &quorum, t0()).unwrap();
        }
        p
    }

    fn setup(
        proposal: Proposal,
        capability: ScriptedCapability,
    ) -> (
        ExecuteProposalUseCase<ScriptedCapability, MockRepository>,
        Arc<MockRepository>,
        Arc<ScriptedCapability>,
    ) {
        let mut forum = forum(&["alice.eth", "bob.eth", "carol.eth"]);
        forum.follow_proposal(proposal.status());
        let repo = Arc::new(
            MockRepository::default()
                .with_forum(forum)
                .with_proposal(proposal),
        );
        let capability = Arc::new(capability);
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::at(t0()));
        let coordinator =
            ExecutionCoordinator::new(Arc::clone(&capability), Arc::clone(&repo), clock.clone());
        let uc = ExecuteProposalUseCase::new(coordinator, Arc::clone(&repo), clock);
        (uc, repo, capability)
    }

    fn fast() -> ExecutionOptions {
        ExecutionOptions::default()
            .with_delay_between(Duration::ZERO)
            .with_retry(RetryPolicy::no_retry())
    }

    #[tokio::test]
    async fn test_successful_execution() {
        let (uc, repo, capability) = setup(approved_proposal(), ScriptedCapability::default());
        let logger = Arc::new(RecordingLogger::default());
        let uc = uc.with_logger(logger.clone());

        let output = uc
            .execute(
                ExecuteProposalInput::new("p-1", vec![executor("alice.eth"), executor("bob.eth")])
                    .with_options(fast()),
            )
            .await
            .unwrap();

        assert_eq!(output.status, ProposalStatus::Executed);
        assert_eq!(output.summary.total, 1);
        assert_eq!(output.summary.tx_hashes, vec!["0xalice.eth".to_string()]);
        assert_eq!(capability.calls().len(), 1);

        assert_eq!(repo.stored_proposal("p-1").status(), ProposalStatus::Executed);
        assert_eq!(repo.stored_forum("f-1").status, ForumStatus::Executed);
        assert_eq!(
            logger.event_types(),
            vec!["execution_started", "execution_completed"]
        );
    }

    #[tokio::test]
    async fn test_failure_returns_forum_to_discussion() {
        let capability = ScriptedCapability::default()
            .script("alice.eth", vec![Ok(SubmissionOutcome::failed("reverted"))]);
        let (uc, repo, _capability) = setup(approved_proposal(), capability);

        let output = uc
            .execute(
                ExecuteProposalInput::new("p-1", vec![executor("alice.eth")]).with_options(fast()),
            )
            .await
            .unwrap();

        assert_eq!(output.status, ProposalStatus::Failed);
        assert_eq!(output.summary.errors, vec!["alice.eth: reverted".to_string()]);
        assert_eq!(repo.stored_proposal("p-1").status(), ProposalStatus::Failed);
        assert_eq!(repo.stored_forum("f-1").status, ForumStatus::Active);
    }

    #[tokio::test]
    async fn test_all_selection_fails_on_any_failure() {
        let capability = ScriptedCapability::default()
            .script("bob.eth", vec![Ok(SubmissionOutcome::failed("nonce too low"))]);
        let (uc, repo, capability) = setup(approved_proposal(), capability);

        let output = uc
            .execute(
                ExecuteProposalInput::new("p-1", vec![executor("alice.eth"), executor("bob.eth")])
                    .with_selection(ExecutorSelection::All)
                    .with_options(fast()),
            )
            .await
            .unwrap();

        assert_eq!(capability.calls().len(), 2);
        assert_eq!(output.summary.successful, 1);
        assert_eq!(output.status, ProposalStatus::Failed);
        assert_eq!(repo.executions.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_requires_approved_proposal() {
        let (uc, repo, capability) = setup(proposal(), ScriptedCapability::default());

        let err = uc
            .execute(ExecuteProposalInput::new("p-1", vec![executor("alice.eth")]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExecuteProposalError::Lifecycle(LifecycleError::InvalidState {
                status: ProposalStatus::Voting,
                ..
            })
        ));
        assert!(capability.calls().is_empty());
        assert_eq!(repo.stored_proposal("p-1").status(), ProposalStatus::Voting);
    }

    #[tokio::test]
    async fn test_no_executor_leaves_proposal_approved() {
        let (uc, repo, _capability) = setup(approved_proposal(), ScriptedCapability::default());

        let err = uc
            .execute(ExecuteProposalInput::new("p-1", Vec::new()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExecuteProposalError::Coordinator(CoordinatorError::NoExecutor)
        ));
        assert_eq!(repo.stored_proposal("p-1").status(), ProposalStatus::Approved);
        assert_eq!(repo.stored_forum("f-1").status, ForumStatus::Consensus);
    }

    #[tokio::test]
    async fn test_cannot_execute_twice() {
        let (uc, _repo, capability) = setup(approved_proposal(), ScriptedCapability::default());
        let input =
            ExecuteProposalInput::new("p-1", vec![executor("alice.eth")]).with_options(fast());

        uc.execute(input.clone()).await.unwrap();
        let err = uc.execute(input).await.unwrap_err();

        assert!(matches!(
            err,
            ExecuteProposalError::Lifecycle(LifecycleError::InvalidState { .. })
        ));
        assert_eq!(capability.calls().len(), 1);
    }
}
