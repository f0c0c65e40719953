//! Dry-run execution capability.
//!
//! Accepts every submission without touching a chain and answers with a
//! deterministic transaction hash derived from the submission itself, so the
//! same run always produces the same hashes.

use async_trait::async_trait;
use forum_application::ports::execution_capability::{
    ExecutionCapability, SubmissionContext, SubmissionError, SubmissionOutcome,
};
use forum_domain::{
    ActionKind, AddLiquidityParams, LimitOrderParams, RemoveLiquidityParams, SwapParams,
};
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use tracing::info;

/// A submission the dry run accepted
#[derive(Debug, Clone, PartialEq)]
pub struct DryRunSubmission {
    pub kind: ActionKind,
    pub signer: String,
    pub chain_id: u64,
    pub params: serde_json::Value,
    pub tx_hash: String,
}

/// Capability that simulates submissions
#[derive(Default)]
pub struct DryRunCapability {
    /// Action kinds that answer with a definitive failure
    failures: HashMap<ActionKind, String>,
    submissions: Mutex<Vec<DryRunSubmission>>,
}

impl DryRunCapability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a revert for every submission of `kind`
    pub fn with_failure(mut self, kind: ActionKind, error: impl Into<String>) -> Self {
        self.failures.insert(kind, error.into());
        self
    }

    pub fn submissions(&self) -> Vec<DryRunSubmission> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn gas_estimate(kind: ActionKind) -> u64 {
        match kind {
            ActionKind::Swap => 120_000,
            ActionKind::AddLiquidity => 250_000,
            ActionKind::RemoveLiquidity => 180_000,
            ActionKind::LimitOrder => 90_000,
        }
    }

    fn submit<P: Serialize>(
        &self,
        kind: ActionKind,
        params: &P,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if let Some(error) = self.failures.get(&kind) {
            info!("[dry-run] {} by {} reverted: {}", kind, ctx.signer.address(), error);
            return Ok(SubmissionOutcome::failed(error.clone()));
        }

        let params = serde_json::to_value(params)
            .map_err(|e| SubmissionError::Other(format!("cannot encode params: {e}")))?;
        let hooks = ctx
            .hooks
            .map(|h| serde_json::to_string(h).unwrap_or_default())
            .unwrap_or_default();

        let mut submissions = self
            .submissions
            .lock()
            .map_err(|_| SubmissionError::Other("dry-run state poisoned".to_string()))?;
        let nonce = submissions
            .iter()
            .filter(|s| s.signer == ctx.signer.address())
            .count();

        let tx_hash = tx_hash(&[
            kind.as_str(),
            &params.to_string(),
            &hooks,
            ctx.signer.address(),
            &ctx.chain_id.to_string(),
            &nonce.to_string(),
        ]);
        info!(
            "[dry-run] {} by {} on chain {}: {}",
            kind,
            ctx.signer.address(),
            ctx.chain_id,
            tx_hash
        );

        submissions.push(DryRunSubmission {
            kind,
            signer: ctx.signer.address().to_string(),
            chain_id: ctx.chain_id,
            params,
            tx_hash: tx_hash.clone(),
        });

        Ok(SubmissionOutcome::Submitted {
            tx_hash,
            gas_used: Some(Self::gas_estimate(kind)),
        })
    }
}

/// 32-byte hex hash over the parts
fn tx_hash(parts: &[&str]) -> String {
    let mut out = String::from("0x");
    for salt in 0u8..4 {
        let mut hasher = DefaultHasher::new();
        salt.hash(&mut hasher);
        parts.hash(&mut hasher);
        out.push_str(&format!("{:016x}", hasher.finish()));
    }
    out
}

#[async_trait]
impl ExecutionCapability for DryRunCapability {
    async fn swap(
        &self,
        params: &SwapParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.submit(ActionKind::Swap, params, ctx)
    }

    async fn add_liquidity(
        &self,
        params: &AddLiquidityParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.submit(ActionKind::AddLiquidity, params, ctx)
    }

    async fn remove_liquidity(
        &self,
        params: &RemoveLiquidityParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.submit(ActionKind::RemoveLiquidity, params, ctx)
    }

    async fn limit_order(
        &self,
        params: &LimitOrderParams,
        ctx: SubmissionContext<'_>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.submit(ActionKind::LimitOrder, params, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_application::ports::signer::AddressSigner;

    fn swap() -> SwapParams {
        SwapParams {
            token_in: "USDC".to_string(),
            token_out: "WETH".to_string(),
            amount_in: "250".to_string(),
            min_amount_out: None,
            fee: Some(3000),
            slippage_bps: None,
        }
    }

    fn ctx(signer: &AddressSigner) -> SubmissionContext<'_> {
        SubmissionContext {
            hooks: None,
            signer,
            chain_id: 8453,
        }
    }

    #[tokio::test]
    async fn test_hashes_are_deterministic() {
        let signer = AddressSigner::new("0xabc");
        let a = DryRunCapability::new();
        let b = DryRunCapability::new();

        let first = a.swap(&swap(), ctx(&signer)).await.unwrap();
        let again = b.swap(&swap(), ctx(&signer)).await.unwrap();
        assert_eq!(first, again);

        let SubmissionOutcome::Submitted { tx_hash, gas_used } = first else {
            panic!("expected submission");
        };
        assert_eq!(tx_hash.len(), 66);
        assert!(tx_hash.starts_with("0x"));
        assert_eq!(gas_used, Some(120_000));
    }

    #[tokio::test]
    async fn test_nonce_changes_hash() {
        let signer = AddressSigner::new("0xabc");
        let capability = DryRunCapability::new();

        capability.swap(&swap(), ctx(&signer)).await.unwrap();
        capability.swap(&swap(), ctx(&signer)).await.unwrap();

        let submissions = capability.submissions();
        assert_eq!(submissions.len(), 2);
        assert_ne!(submissions[0].tx_hash, submissions[1].tx_hash);
        assert_eq!(submissions[0].params["token_in"], "USDC");
        assert_eq!(submissions[0].chain_id, 8453);
    }

    #[tokio::test]
    async fn test_simulated_revert() {
        let signer = AddressSigner::new("0xabc");
        let capability =
            DryRunCapability::new().with_failure(ActionKind::LimitOrder, "price out of range");

        let outcome = capability
            .limit_order(
                &LimitOrderParams {
                    token_in: "WETH".to_string(),
                    token_out: "USDC".to_string(),
                    amount_in: "1".to_string(),
                    target_price: "4000".to_string(),
                    deadline_minutes: Some(60),
                },
                ctx(&signer),
            )
            .await
            .unwrap();

        assert_eq!(outcome, SubmissionOutcome::failed("price out of range"));
        assert!(capability.submissions().is_empty());
    }
}
