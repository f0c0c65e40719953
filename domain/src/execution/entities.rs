//! Execution records and per-executor results.

use crate::core::ids::{AgentId, ExecutionId, ProposalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of an execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    Executing,
    Success,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Executing => "executing",
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Success | ExecutionStatus::Failed)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of dispatching a proposal's action for one executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub agent_id: AgentId,
    pub status: ExecutionStatus,
    pub tx_hash: Option<String>,
    pub error: Option<String>,
    pub gas_used: Option<u64>,
    /// Number of capability invocations made (retries included)
    pub attempts: u32,
}

impl ExecutionResult {
    pub fn success(agent_id: impl Into<AgentId>, tx_hash: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: ExecutionStatus::Success,
            tx_hash: Some(tx_hash.into()),
            error: None,
            gas_used: None,
            attempts: 1,
        }
    }

    pub fn failure(agent_id: impl Into<AgentId>, error: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: ExecutionStatus::Failed,
            tx_hash: None,
            error: Some(error.into()),
            gas_used: None,
            attempts: 1,
        }
    }

    pub fn with_gas_used(mut self, gas: Option<u64>) -> Self {
        self.gas_used = gas;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

/// Persisted record of one (proposal, executor) attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: ExecutionId,
    pub proposal_id: ProposalId,
    pub agent_id: AgentId,
    pub status: ExecutionStatus,
    pub tx_hash: Option<String>,
    pub error: Option<String>,
    pub gas_used: Option<u64>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Execution {
    /// A record for an executor that has been selected but not yet dispatched
    pub fn pending(proposal_id: impl Into<ProposalId>, agent_id: impl Into<AgentId>) -> Self {
        Self {
            id: ExecutionId::generate(),
            proposal_id: proposal_id.into(),
            agent_id: agent_id.into(),
            status: ExecutionStatus::Pending,
            tx_hash: None,
            error: None,
            gas_used: None,
            completed_at: None,
        }
    }

    /// A completed record built from a result
    pub fn from_result(
        proposal_id: impl Into<ProposalId>,
        result: &ExecutionResult,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ExecutionId::generate(),
            proposal_id: proposal_id.into(),
            agent_id: result.agent_id.clone(),
            status: result.status,
            tx_hash: result.tx_hash.clone(),
            error: result.error.clone(),
            gas_used: result.gas_used,
            completed_at: Some(completed_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_constructors() {
        let ok = ExecutionResult::success("alice.eth", "0xabc").with_attempts(3);
        assert!(ok.is_success());
        assert_eq!(ok.attempts, 3);
        assert!(ok.error.is_none());

        let failed = ExecutionResult::failure("alice.eth", "reverted");
        assert!(!failed.is_success());
        assert_eq!(failed.error.as_deref(), Some("reverted"));
    }

    #[test]
    fn test_execution_from_result() {
        let now = Utc::now();
        let result = ExecutionResult::success("alice.eth", "0xabc").with_gas_used(Some(21_000));
        let record = Execution::from_result("p-1", &result, now);
        assert_eq!(record.status, ExecutionStatus::Success);
        assert_eq!(record.tx_hash.as_deref(), Some("0xabc"));
        assert_eq!(record.gas_used, Some(21_000));
        assert_eq!(record.completed_at, Some(now));
    }

    #[test]
    fn test_pending_record() {
        let record = Execution::pending("p-1", "alice.eth");
        assert_eq!(record.status, ExecutionStatus::Pending);
        assert!(!record.status.is_terminal());
        assert!(record.completed_at.is_none());
    }
}
