//! Progress notification port
//!
//! Defines the interface for reporting progress while a proposal executes.

use forum_domain::{ActionKind, AgentId, ExecutionResult};
use std::time::Duration;

/// Callback for progress updates during execution
///
/// Implementations live in the presentation layer. Parallel runs call these
/// from several tasks at once.
pub trait ExecutionProgressNotifier: Send + Sync {
    /// Called once before any executor is dispatched
    fn on_run_start(&self, _action: ActionKind, _executors: usize) {}

    /// Called when an executor's first attempt is dispatched
    fn on_executor_start(&self, agent: &AgentId);

    /// Called when an attempt raised a transient error and will be retried
    fn on_attempt_failed(&self, agent: &AgentId, attempt: u32, error: &str, retry_in: Duration);

    /// Called when an executor has a final result
    fn on_executor_complete(&self, result: &ExecutionResult);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoExecutionProgress;

impl ExecutionProgressNotifier for NoExecutionProgress {
    fn on_executor_start(&self, _agent: &AgentId) {}
    fn on_attempt_failed(
        &self,
        _agent: &AgentId,
        _attempt: u32,
        _error: &str,
        _retry_in: Duration,
    ) {
    }
    fn on_executor_complete(&self, _result: &ExecutionResult) {}
}
