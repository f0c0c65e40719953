//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] - identifier newtypes (forum, proposal, agent, ...)
//! - [`error::DomainError`] - domain-level validation errors
//! - [`time`] - saturating span conversions

pub mod error;
pub mod ids;
pub mod time;
