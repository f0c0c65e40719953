//! Execution of approved proposals: records, results and their summary.

pub mod entities;
pub mod summary;

pub use entities::{Execution, ExecutionResult, ExecutionStatus};
pub use summary::ExecutionSummary;
