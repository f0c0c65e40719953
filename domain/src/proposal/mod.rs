//! Proposals: the on-chain action a forum votes on, and its lifecycle.
//!
//! - [`action`] - closed set of typed actions and execution hooks
//! - [`entities`] - [`Proposal`] and [`ProposalStatus`]
//! - [`lifecycle`] - vote application, expiry and execution transitions
//! - [`draft`] - parsing agent-generated proposal JSON

pub mod action;
pub mod draft;
pub mod entities;
pub mod lifecycle;

pub use action::{
    ActionKind, AddLiquidityParams, ExecutionHooks, HookFlag, LimitOrderParams, ProposalAction,
    RemoveLiquidityParams, SwapParams,
};
pub use draft::ProposalDraft;
pub use entities::{Proposal, ProposalStatus};
pub use lifecycle::LifecycleError;
