//! Aggregation of execution results.

use super::entities::ExecutionResult;
use serde::{Deserialize, Serialize};

/// Totals across all executors of a proposal
///
/// # Example
///
/// ```
/// use forum_domain::execution::{ExecutionResult, ExecutionSummary};
///
/// let summary = ExecutionSummary::from_results(&[
///     ExecutionResult::success("alice.eth", "0x01"),
///     ExecutionResult::failure("bob.eth", "nonce too low"),
/// ]);
/// assert_eq!(summary.total, 2);
/// assert_eq!(summary.errors, vec!["bob.eth: nonce too low".to_string()]);
/// assert!(!summary.all_succeeded());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub tx_hashes: Vec<String>,
    /// `"<agent>: <error>"` per failed executor
    pub errors: Vec<String>,
}

impl ExecutionSummary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };

        for result in results {
            if result.is_success() {
                summary.successful += 1;
                if let Some(hash) = &result.tx_hash {
                    summary.tx_hashes.push(hash.clone());
                }
            } else {
                summary.failed += 1;
                summary.errors.push(format!(
                    "{}: {}",
                    result.agent_id,
                    result.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }

        summary
    }

    /// `executed` iff nothing failed
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
