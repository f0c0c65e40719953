//! Execution capability port
//!
//! Defines how an approved action reaches the chain. One method per action
//! kind; the coordinator dispatches with an exhaustive match so a new kind
//! cannot be added without a submission path.

use async_trait::async_trait;
use forum_domain::{
    AddLiquidityParams, ExecutionHooks, LimitOrderParams, RemoveLiquidityParams, SwapParams,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::signer::Signer;

/// Transient submission failure. The coordinator retries these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout")]
    Timeout,

    #[error("Rejected by node: {0}")]
    Rejected(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Definitive answer from the capability
///
/// `Failed` is final (e.g. a revert) and is never retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Submitted {
        tx_hash: String,
        #[serde(default)]
        gas_used: Option<u64>,
    },
    Failed {
        error: String,
    },
}

impl SubmissionOutcome {
    pub fn submitted(tx_hash: impl Into<String>) -> Self {
        SubmissionOutcome::Submitted {
            tx_hash: tx_hash.into(),
            gas_used: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        SubmissionOutcome::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted { .. })
    }
}

/// Per-submission context handed to every capability method
#[derive(Clone, Copy)]
pub struct SubmissionContext<'a> {
    pub hooks: Option<&'a ExecutionHooks>,
    pub signer: &'a dyn Signer,
    pub chain_id: u64,
}

impl std::fmt::Debug for SubmissionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionContext")
            .field("hooks", &self.hooks)
            .field("signer", &self.signer.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Capability that submits proposal actions on behalf of an executor
#[async_trait]
pub trait ExecutionCapability: Send + Sync {
    async fn swap(
        &self,
        params: &SwapParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError>;

    async fn add_liquidity(
        &self,
        params: &AddLiquidityParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError>;

    async fn remove_liquidity(
        &self,
        params: &RemoveLiquidityParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError>;

    async fn limit_order(
        &self,
        params: &LimitOrderParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError>;
}
