//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod clock;
pub mod event_logger;
pub mod execution_capability;
pub mod progress;
pub mod repository;
pub mod signer;
