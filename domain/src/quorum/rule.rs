//! Quorum configuration for consensus determination
//!
//! A forum fixes its quorum rule at creation: the fraction of agreeing votes
//! required and the minimum number of votes before any verdict is reached.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Rule for determining forum consensus
///
/// # Example
///
/// ```
/// use forum_domain::quorum::QuorumConfig;
///
/// let config = QuorumConfig::new(0.6, 3).unwrap();
/// assert_eq!(config.threshold(), 0.6);
/// assert_eq!(config.min_participants(), 3);
///
/// assert!(QuorumConfig::new(0.4, 3).is_err());
/// assert!(QuorumConfig::new(0.6, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuorumConfig")]
pub struct QuorumConfig {
    threshold: f64,
    min_participants: usize,
}

impl QuorumConfig {
    pub const MIN_THRESHOLD: f64 = 0.5;
    pub const MAX_THRESHOLD: f64 = 1.0;

    /// Create a validated quorum config.
    ///
    /// `threshold` must lie in `[0.5, 1.0]` and `min_participants` must be at
    /// least 1.
    pub fn new(threshold: f64, min_participants: usize) -> Result<Self, DomainError> {
        if !(Self::MIN_THRESHOLD..=Self::MAX_THRESHOLD).contains(&threshold) {
            return Err(DomainError::InvalidQuorumConfig(format!(
                "threshold must be between {} and {}, got {}",
                Self::MIN_THRESHOLD,
                Self::MAX_THRESHOLD,
                threshold
            )));
        }
        if min_participants == 0 {
            return Err(DomainError::InvalidQuorumConfig(
                "min_participants must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            threshold,
            min_participants,
        })
    }

    /// Fraction of agreeing votes required for approval
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Floor on total votes before any verdict
    pub fn min_participants(&self) -> usize {
        self.min_participants
    }

    /// Largest disagreement fraction that still leaves approval reachable
    pub fn max_disagreement(&self) -> f64 {
        1.0 - self.threshold
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        format!(
            "{:.0}% agreement, at least {} votes",
            self.threshold * 100.0,
            self.min_participants
        )
    }
}

#[derive(Deserialize)]
struct RawQuorumConfig {
    threshold: f64,
    min_participants: usize,
}

impl TryFrom<RawQuorumConfig> for QuorumConfig {
    type Error = DomainError;

    fn try_from(raw: RawQuorumConfig) -> Result<Self, Self::Error> {
        Self::new(raw.threshold, raw.min_participants)
    }
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            min_participants: 3,
        }
    }
}

impl std::fmt::Display for QuorumConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
