//! On-chain actions a proposal can request.
//!
//! The action set is closed: every proposal carries exactly one
//! [`ProposalAction`] variant with its own typed parameters, and consumers
//! dispatch with an exhaustive `match`.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Kind of on-chain action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    LimitOrder,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Swap,
        ActionKind::AddLiquidity,
        ActionKind::RemoveLiquidity,
        ActionKind::LimitOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Swap => "swap",
            ActionKind::AddLiquidity => "add_liquidity",
            ActionKind::RemoveLiquidity => "remove_liquidity",
            ActionKind::LimitOrder => "limit_order",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = DomainError;

    /// Accepts snake_case, kebab-case and camelCase spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "swap" => Ok(ActionKind::Swap),
            "addliquidity" => Ok(ActionKind::AddLiquidity),
            "removeliquidity" => Ok(ActionKind::RemoveLiquidity),
            "limitorder" => Ok(ActionKind::LimitOrder),
            _ => Err(DomainError::UnknownActionKind(s.to_string())),
        }
    }
}

/// Parameters for a token swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    pub token_in: String,
    pub token_out: String,
    /// Amount of `token_in`, as a decimal string
    pub amount_in: String,
    #[serde(default)]
    pub min_amount_out: Option<String>,
    /// Pool fee tier in hundredths of a basis point (e.g. 3000 = 0.3%)
    #[serde(default)]
    pub fee: Option<u32>,
    #[serde(default)]
    pub slippage_bps: Option<u32>,
}

/// Parameters for providing liquidity to a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityParams {
    pub token0: String,
    pub token1: String,
    pub amount0: String,
    pub amount1: String,
    #[serde(default)]
    pub fee: Option<u32>,
    #[serde(default)]
    pub tick_lower: Option<i32>,
    #[serde(default)]
    pub tick_upper: Option<i32>,
}

/// Parameters for withdrawing liquidity from a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityParams {
    pub position_id: String,
    /// Share of the position to withdraw, 1..=100
    pub percentage: u8,
    #[serde(default)]
    pub collect_fees: bool,
}

/// Parameters for a resting limit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderParams {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    /// Price of `token_out` in `token_in`, as a decimal string
    pub target_price: String,
    #[serde(default)]
    pub deadline_minutes: Option<u64>,
}

/// A concrete on-chain action with typed parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "snake_case")]
pub enum ProposalAction {
    Swap(SwapParams),
    AddLiquidity(AddLiquidityParams),
    RemoveLiquidity(RemoveLiquidityParams),
    LimitOrder(LimitOrderParams),
}

impl ProposalAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            ProposalAction::Swap(_) => ActionKind::Swap,
            ProposalAction::AddLiquidity(_) => ActionKind::AddLiquidity,
            ProposalAction::RemoveLiquidity(_) => ActionKind::RemoveLiquidity,
            ProposalAction::LimitOrder(_) => ActionKind::LimitOrder,
        }
    }

    /// Check parameter shape beyond what deserialization enforces
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            ProposalAction::Swap(p) => {
                require_pair(&p.token_in, &p.token_out)?;
                require_amount("amount_in", &p.amount_in)
            }
            ProposalAction::AddLiquidity(p) => {
                require_pair(&p.token0, &p.token1)?;
                require_amount("amount0", &p.amount0)?;
                require_amount("amount1", &p.amount1)?;
                if let (Some(lower), Some(upper)) = (p.tick_lower, p.tick_upper)
                    && lower >= upper
                {
                    return Err(DomainError::InvalidProposal(format!(
                        "tick_lower ({lower}) must be below tick_upper ({upper})"
                    )));
                }
                Ok(())
            }
            ProposalAction::RemoveLiquidity(p) => {
                if p.position_id.trim().is_empty() {
                    return Err(DomainError::InvalidProposal(
                        "position_id cannot be empty".to_string(),
                    ));
                }
                if !(1..=100).contains(&p.percentage) {
                    return Err(DomainError::InvalidProposal(format!(
                        "percentage must be between 1 and 100, got {}",
                        p.percentage
                    )));
                }
                Ok(())
            }
            ProposalAction::LimitOrder(p) => {
                require_pair(&p.token_in, &p.token_out)?;
                require_amount("amount_in", &p.amount_in)?;
                require_amount("target_price", &p.target_price)
            }
        }
    }

    /// One-line human-readable description
    pub fn describe(&self) -> String {
        match self {
            ProposalAction::Swap(p) => {
                format!("swap {} {} -> {}", p.amount_in, p.token_in, p.token_out)
            }
            ProposalAction::AddLiquidity(p) => format!(
                "add liquidity {} {} + {} {}",
                p.amount0, p.token0, p.amount1, p.token1
            ),
            ProposalAction::RemoveLiquidity(p) => {
                format!("remove {}% of position {}", p.percentage, p.position_id)
            }
            ProposalAction::LimitOrder(p) => format!(
                "limit order {} {} -> {} @ {}",
                p.amount_in, p.token_in, p.token_out, p.target_price
            ),
        }
    }
}

fn require_pair(a: &str, b: &str) -> Result<(), DomainError> {
    if a.trim().is_empty() || b.trim().is_empty() {
        return Err(DomainError::InvalidProposal(
            "token symbols cannot be empty".to_string(),
        ));
    }
    if a.eq_ignore_ascii_case(b) {
        return Err(DomainError::InvalidProposal(format!(
            "token pair must differ, got {a}/{b}"
        )));
    }
    Ok(())
}

fn require_amount(field: &str, value: &str) -> Result<(), DomainError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        _ => Err(DomainError::InvalidProposal(format!(
            "{field} must be a positive decimal, got {value:?}"
        ))),
    }
}

/// Uniswap v4-style hook callbacks to enable on execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookFlag {
    BeforeSwap,
    AfterSwap,
    BeforeAddLiquidity,
    AfterAddLiquidity,
    BeforeRemoveLiquidity,
    AfterRemoveLiquidity,
}

/// Optional hook configuration passed through to the execution capability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionHooks {
    /// Deployed hook contract, if any
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub flags: Vec<HookFlag>,
}

impl ExecutionHooks {
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.flags.is_empty()
    }

    pub fn has(&self, flag: HookFlag) -> bool {
        self.flags.contains(&flag)
    }
}
