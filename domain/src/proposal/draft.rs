//! Parsing proposal JSON emitted by an agent.
//!
//! The generation step (outside this crate) yields a JSON object such as
//!
//! ```json
//! {
//!   "action": "swap",
//!   "params": { "token_in": "USDC", "token_out": "WETH", "amount_in": "100" },
//!   "hooks": { "flags": ["before_swap"] },
//!   "reasoning": "ETH looks undervalued against the pool focus"
//! }
//! ```
//!
//! The action tag is resolved to an [`ActionKind`] first so that an unknown
//! kind surfaces as [`DomainError::UnknownActionKind`] rather than a generic
//! deserialization failure.

use super::action::{
    ActionKind, AddLiquidityParams, ExecutionHooks, LimitOrderParams, ProposalAction,
    RemoveLiquidityParams, SwapParams,
};
use crate::core::error::DomainError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A validated proposal as produced by an agent, before it is filed
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalDraft {
    pub action: ProposalAction,
    pub hooks: Option<ExecutionHooks>,
    pub reasoning: Option<String>,
}

impl ProposalDraft {
    /// Parse and validate a proposal JSON string
    pub fn from_json(input: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(extract_json_object(input))
            .map_err(|e| DomainError::InvalidProposal(format!("malformed JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Parse and validate an already-decoded JSON value
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let Value::Object(mut map) = value else {
            return Err(DomainError::InvalidProposal(
                "proposal must be a JSON object".to_string(),
            ));
        };

        let kind: ActionKind = map
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::InvalidProposal("missing \"action\" field".to_string()))?
            .parse()?;

        let params = map.remove("params").unwrap_or(Value::Null);
        let action = match kind {
            ActionKind::Swap => ProposalAction::Swap(typed_params::<SwapParams>(kind, params)?),
            ActionKind::AddLiquidity => {
                ProposalAction::AddLiquidity(typed_params::<AddLiquidityParams>(kind, params)?)
            }
            ActionKind::RemoveLiquidity => {
                let params: RemoveLiquidityParams = typed_params(kind, params)?;
                ProposalAction::RemoveLiquidity(params)
            }
            ActionKind::LimitOrder => {
                ProposalAction::LimitOrder(typed_params::<LimitOrderParams>(kind, params)?)
            }
        };
        action.validate()?;

        let hooks = match map.remove("hooks") {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let hooks: ExecutionHooks = serde_json::from_value(raw)
                    .map_err(|e| DomainError::InvalidProposal(format!("invalid hooks: {e}")))?;
                (!hooks.is_empty()).then_some(hooks)
            }
        };

        let reasoning = map
            .get("reasoning")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            action,
            hooks,
            reasoning,
        })
    }
}

fn typed_params<T: DeserializeOwned>(kind: ActionKind, params: Value) -> Result<T, DomainError> {
    serde_json::from_value(params)
        .map_err(|e| DomainError::InvalidProposal(format!("invalid {kind} params: {e}")))
}

/// Strip a surrounding markdown code fence or prose around the first `{...}`.
fn extract_json_object(input: &str) -> &str {
    match (input.find('{'), input.rfind('}')) {
        (Some(start), Some(end)) if start < end => &input[start..=end],
        _ => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::action::HookFlag;

    #[test]
    fn test_parse_swap() {
        let draft = ProposalDraft::from_json(
            r#"{"action":"swap","params":{"token_in":"USDC","token_out":"WETH","amount_in":"100"},"reasoning":"rebalance"}"#,
        )
        .unwrap();
        assert_eq!(draft.action.kind(), ActionKind::Swap);
        assert_eq!(draft.reasoning.as_deref(), Some("rebalance"));
        assert!(draft.hooks.is_none());
    }

    #[test]
    fn test_parse_with_code_fence_and_hooks() {
        let input = r#"Here is my proposal:
```json
{"action":"remove-liquidity","params":{"position_id":"12","percentage":25},"hooks":{"flags":["after_remove_liquidity"]}}
```"#;
        let draft = ProposalDraft::from_json(input).unwrap();
        assert_eq!(draft.action.kind(), ActionKind::RemoveLiquidity);
        let hooks = draft.hooks.unwrap();
        assert!(hooks.has(HookFlag::AfterRemoveLiquidity));
    }

    #[test]
    fn test_unknown_action_is_fatal() {
        let err = ProposalDraft::from_json(r#"{"action":"bridge","params":{}}"#).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err, DomainError::UnknownActionKind("bridge".to_string()));
    }

    #[test]
    fn test_missing_params_field() {
        let err = ProposalDraft::from_json(r#"{"action":"limit_order"}"#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidProposal(msg) if msg.contains("limit_order")));
    }

    #[test]
    fn test_invalid_params_rejected_by_validation() {
        let err = ProposalDraft::from_json(
            r#"{"action":"swap","params":{"token_in":"USDC","token_out":"USDC","amount_in":"1"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidProposal(_)));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ProposalDraft::from_json("[1, 2, 3]").is_err());
        assert!(ProposalDraft::from_json("not json").is_err());
    }
}
