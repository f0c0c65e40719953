//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod cast_vote;
pub mod check_expiry;
pub mod execute_proposal;
pub mod execution_coordinator;
pub mod shared;
pub mod should_speak;

#[cfg(test)]
pub(crate) mod test_support;
