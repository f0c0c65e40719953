//! Execution coordinator
//!
//! Submits an approved proposal's action through the [`ExecutionCapability`]
//! for one or more executors, retrying transient errors with exponential
//! backoff, and records one [`Execution`] per executor.
//!
//! # Failure model
//!
//! | Capability answer | Retried? | Result |
//! |-------------------|----------|--------|
//! | `Ok(Submitted)` | - | success |
//! | `Ok(Failed)` | no | failed, definitive |
//! | `Err(_)` | yes, up to `max_attempts` | failed once exhausted |
//!
//! The coordinator never returns an error for a failed submission; every
//! executor ends with an [`ExecutionResult`].

use crate::config::ExecutionOptions;
use crate::ports::clock::Clock;
use crate::ports::event_logger::{ForumEvent, ForumEventLogger, NoForumEventLogger};
use crate::ports::execution_capability::{
    ExecutionCapability, SubmissionContext, SubmissionError, SubmissionOutcome,
};
use crate::ports::progress::{ExecutionProgressNotifier, NoExecutionProgress};
use crate::ports::repository::ForumRepository;
use crate::ports::signer::Signer;
use forum_domain::{
    AgentId, Execution, ExecutionHooks, ExecutionResult, ExecutionSummary, Proposal,
    ProposalAction,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur when selecting executors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    #[error("No executor designated")]
    NoExecutor,
}

/// An agent that submits the action, with its signing capability
#[derive(Clone)]
pub struct Executor {
    pub agent_id: AgentId,
    pub signer: Arc<dyn Signer>,
}

impl Executor {
    pub fn new(agent_id: impl Into<AgentId>, signer: Arc<dyn Signer>) -> Self {
        Self {
            agent_id: agent_id.into(),
            signer,
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("agent_id", &self.agent_id)
            .field("address", &self.signer.address())
            .finish()
    }
}

/// The single executor of a proposal
///
/// Only one agent submits an approved action; the rest of a designated list
/// is ignored.
#[derive(Debug, Clone)]
pub struct SoleExecutor(Executor);

impl SoleExecutor {
    pub fn new(executor: Executor) -> Self {
        Self(executor)
    }

    /// Keep the first designated executor, ignoring the rest.
    pub fn from_designated(
        executors: impl IntoIterator<Item = Executor>,
    ) -> Result<Self, CoordinatorError> {
        let mut executors = executors.into_iter();
        let first = executors.next().ok_or(CoordinatorError::NoExecutor)?;

        let ignored: Vec<String> = executors.map(|e| e.agent_id.to_string()).collect();
        if !ignored.is_empty() {
            warn!(
                "Single executor policy: {} executes, ignoring {}",
                first.agent_id,
                ignored.join(", ")
            );
        }

        Ok(Self(first))
    }

    pub fn executor(&self) -> &Executor {
        &self.0
    }
}

/// Coordinator for submitting approved proposals
pub struct ExecutionCoordinator<C, R>
where
    C: ExecutionCapability + 'static,
    R: ForumRepository + 'static,
{
    capability: Arc<C>,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    progress: Arc<dyn ExecutionProgressNotifier>,
    logger: Arc<dyn ForumEventLogger>,
}

impl<C, R> ExecutionCoordinator<C, R>
where
    C: ExecutionCapability + 'static,
    R: ForumRepository + 'static,
{
    pub fn new(capability: Arc<C>, repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            capability,
            repository,
            clock,
            progress: Arc::new(NoExecutionProgress),
            logger: Arc::new(NoForumEventLogger),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ExecutionProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ForumEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute with the proposal's single executor
    pub async fn run(
        &self,
        proposal: &Proposal,
        executor: SoleExecutor,
        options: &ExecutionOptions,
    ) -> Vec<ExecutionResult> {
        self.run_batch(proposal, std::slice::from_ref(&executor.0), options)
            .await
    }

    /// Execute for every executor, sequentially or in parallel.
    ///
    /// Results come back in executor order either way.
    pub async fn run_batch(
        &self,
        proposal: &Proposal,
        executors: &[Executor],
        options: &ExecutionOptions,
    ) -> Vec<ExecutionResult> {
        if executors.is_empty() {
            warn!("No executors for proposal {}", proposal.id);
            return Vec::new();
        }

        info!(
            "Executing proposal {} ({}) with {} executor(s), {}",
            proposal.id,
            proposal.action.describe(),
            executors.len(),
            if options.parallel {
                "parallel"
            } else {
                "sequential"
            }
        );
        self.progress
            .on_run_start(proposal.action.kind(), executors.len());

        if options.parallel {
            self.run_parallel(proposal, executors, options).await
        } else {
            self.run_sequential(proposal, executors, options).await
        }
    }

    /// Totals over a run's results
    pub fn summarize(results: &[ExecutionResult]) -> ExecutionSummary {
        ExecutionSummary::from_results(results)
    }

    async fn run_sequential(
        &self,
        proposal: &Proposal,
        executors: &[Executor],
        options: &ExecutionOptions,
    ) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(executors.len());

        for (index, executor) in executors.iter().enumerate() {
            if index > 0 && !options.delay_between.is_zero() {
                debug!("Waiting {:?} before next executor", options.delay_between);
                tokio::time::sleep(options.delay_between).await;
            }

            let result = submit_with_retry(
                self.capability.as_ref(),
                self.progress.as_ref(),
                &proposal.action,
                proposal.hooks.as_ref(),
                executor,
                options,
            )
            .await;

            self.record(proposal, &result).await;
            results.push(result);
        }

        results
    }

    async fn run_parallel(
        &self,
        proposal: &Proposal,
        executors: &[Executor],
        options: &ExecutionOptions,
    ) -> Vec<ExecutionResult> {
        let mut join_set = JoinSet::new();

        for (index, executor) in executors.iter().enumerate() {
            let capability = Arc::clone(&self.capability);
            let progress = Arc::clone(&self.progress);
            let action = proposal.action.clone();
            let hooks = proposal.hooks.clone();
            let executor = executor.clone();
            let options = options.clone();

            join_set.spawn(async move {
                let result = submit_with_retry(
                    capability.as_ref(),
                    progress.as_ref(),
                    &action,
                    hooks.as_ref(),
                    &executor,
                    &options,
                )
                .await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<ExecutionResult>> = vec![None; executors.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    self.record(proposal, &result).await;
                    slots[index] = Some(result);
                }
                Err(e) => {
                    warn!("Execution task failed: {}", e);
                }
            }
        }

        // A task that died never produced its result; fail its executor.
        let mut results = Vec::with_capacity(executors.len());
        for (slot, executor) in slots.into_iter().zip(executors) {
            let result = match slot {
                Some(result) => result,
                None => {
                    let result = ExecutionResult::failure(
                        executor.agent_id.clone(),
                        "execution task aborted",
                    );
                    self.progress.on_executor_complete(&result);
                    self.record(proposal, &result).await;
                    result
                }
            };
            results.push(result);
        }

        results
    }

    /// Persist one result. A storage failure is logged, not propagated: the
    /// submission already happened.
    async fn record(&self, proposal: &Proposal, result: &ExecutionResult) {
        let execution = Execution::from_result(proposal.id.clone(), result, self.clock.now());
        if let Err(e) = self.repository.record_execution(&execution).await {
            warn!(
                "Failed to record execution of proposal {} by {}: {}",
                proposal.id, result.agent_id, e
            );
        }

        self.logger.log(ForumEvent::new(
            "execution_result",
            json!({
                "forum_id": proposal.forum_id,
                "proposal_id": proposal.id,
                "agent_id": result.agent_id,
                "status": result.status,
                "tx_hash": result.tx_hash,
                "error": result.error,
                "gas_used": result.gas_used,
                "attempts": result.attempts,
            }),
        ));
    }
}

/// Submit for one executor until a definitive answer or retries run out
async fn submit_with_retry<C: ExecutionCapability + ?Sized>(
    capability: &C,
    progress: &dyn ExecutionProgressNotifier,
    action: &ProposalAction,
    hooks: Option<&ExecutionHooks>,
    executor: &Executor,
    options: &ExecutionOptions,
) -> ExecutionResult {
    progress.on_executor_start(&executor.agent_id);

    let ctx = SubmissionContext {
        hooks,
        signer: executor.signer.as_ref(),
        chain_id: options.chain_id,
    };
    let max_attempts = options.retry.attempts();
    let mut attempt = 0;

    let result = loop {
        attempt += 1;
        match dispatch(capability, action, ctx).await {
            Ok(SubmissionOutcome::Submitted { tx_hash, gas_used }) => {
                debug!("{} submitted {}", executor.agent_id, tx_hash);
                break ExecutionResult::success(executor.agent_id.clone(), tx_hash)
                    .with_gas_used(gas_used);
            }
            Ok(SubmissionOutcome::Failed { error }) => {
                warn!("{} submission failed: {}", executor.agent_id, error);
                break ExecutionResult::failure(executor.agent_id.clone(), error);
            }
            Err(e) if attempt < max_attempts => {
                let delay = options.retry.delay_for(attempt - 1);
                let error = e.to_string();
                warn!(
                    "{} attempt {}/{} failed: {}; retrying in {:?}",
                    executor.agent_id, attempt, max_attempts, error, delay
                );
                progress.on_attempt_failed(&executor.agent_id, attempt, &error, delay);
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                warn!(
                    "{} giving up after {} attempt(s): {}",
                    executor.agent_id, attempt, e
                );
                break ExecutionResult::failure(executor.agent_id.clone(), e.to_string());
            }
        }
    };

    let result = result.with_attempts(attempt);
    progress.on_executor_complete(&result);
    result
}

async fn dispatch<C: ExecutionCapability + ?Sized>(
    capability: &C,
    action: &ProposalAction,
    ctx: SubmissionContext<'_>,
) -> Result<SubmissionOutcome, SubmissionError> {
    match action {
        ProposalAction::Swap(params) => capability.swap(params, ctx).await,
        ProposalAction::AddLiquidity(params) => capability.add_liquidity(params, ctx).await,
        ProposalAction::RemoveLiquidity(params) => capability.remove_liquidity(params, ctx).await,
        ProposalAction::LimitOrder(params) => capability.limit_order(params, ctx).await,
    }
}
