//! Quorum configuration from TOML (`[quorum]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [quorum]
//! threshold = 0.6          # share of agree votes needed, 0.5..=1.0
//! min_participants = 3     # votes required before any verdict
//! timeout_minutes = 60     # proposal expiry horizon
//! ```

use super::ConfigValidationError;
use forum_domain::{DomainError, QuorumConfig};
use serde::{Deserialize, Serialize};

/// One year
const MAX_TIMEOUT_MINUTES: u64 = 365 * 24 * 60;

/// Raw quorum configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuorumConfig {
    pub threshold: f64,
    pub min_participants: usize,
    pub timeout_minutes: u64,
}

impl Default for FileQuorumConfig {
    fn default() -> Self {
        let quorum = QuorumConfig::default();
        Self {
            threshold: quorum.threshold(),
            min_participants: quorum.min_participants(),
            timeout_minutes: 60,
        }
    }
}

impl FileQuorumConfig {
    /// Build the validated domain rule
    pub fn to_quorum_config(&self) -> Result<QuorumConfig, DomainError> {
        QuorumConfig::new(self.threshold, self.min_participants)
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigValidationError>) {
        if let Err(e) = self.to_quorum_config() {
            issues.push(ConfigValidationError::InvalidQuorum(e.to_string()));
        }
        if self.timeout_minutes == 0 {
            issues.push(ConfigValidationError::ZeroValue("quorum.timeout_minutes"));
        } else if self.timeout_minutes > MAX_TIMEOUT_MINUTES {
            issues.push(ConfigValidationError::TooLarge {
                field: "quorum.timeout_minutes",
                max: MAX_TIMEOUT_MINUTES,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quorum_config_default() {
        let config = FileQuorumConfig::default();
        assert_eq!(config.threshold, 0.6);
        assert_eq!(config.min_participants, 3);
        assert_eq!(config.timeout_minutes, 60);
    }

    #[test]
    fn test_quorum_config_deserialize() {
        let toml_str = r#"
[quorum]
threshold = 0.75
min_participants = 5
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let quorum = config.quorum.to_quorum_config().unwrap();
        assert_eq!(quorum.threshold(), 0.75);
        assert_eq!(quorum.min_participants(), 5);
        assert_eq!(config.quorum.timeout_minutes, 60);
    }

    #[test]
    fn test_timeout_upper_bound() {
        let mut config = FileQuorumConfig {
            timeout_minutes: MAX_TIMEOUT_MINUTES,
            ..FileQuorumConfig::default()
        };
        let mut issues = Vec::new();
        config.validate(&mut issues);
        assert!(issues.is_empty());

        config.timeout_minutes += 1;
        config.validate(&mut issues);
        assert_eq!(
            issues,
            vec![ConfigValidationError::TooLarge {
                field: "quorum.timeout_minutes",
                max: MAX_TIMEOUT_MINUTES,
            }]
        );
    }

    #[test]
    fn test_out_of_range_threshold() {
        let config = FileQuorumConfig {
            threshold: 0.4,
            ..FileQuorumConfig::default()
        };
        let mut issues = Vec::new();
        config.validate(&mut issues);
        assert!(matches!(
            issues.as_slice(),
            [ConfigValidationError::InvalidQuorum(_)]
        ));
    }
}
