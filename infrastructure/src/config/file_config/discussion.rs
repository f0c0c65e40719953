//! Discussion throttling from TOML (`[discussion]` section)
//!
//! ```toml
//! [discussion]
//! min_interval_ms = 30000   # gap between two autonomous messages of an agent
//! max_auto_messages = 3     # autonomous messages per agent per forum
//! message_window = 20       # recent messages the scheduler looks at
//! ```

use super::ConfigValidationError;
use forum_domain::DiscussionPolicy;
use serde::{Deserialize, Serialize};

/// One day
const MAX_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

/// Raw discussion configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    pub min_interval_ms: u64,
    pub max_auto_messages: usize,
    pub message_window: usize,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        let policy = DiscussionPolicy::default();
        Self {
            min_interval_ms: policy.min_interval_ms,
            max_auto_messages: policy.max_auto_messages,
            message_window: 20,
        }
    }
}

impl FileDiscussionConfig {
    pub fn to_policy(&self) -> DiscussionPolicy {
        DiscussionPolicy {
            min_interval_ms: self.min_interval_ms,
            max_auto_messages: self.max_auto_messages,
        }
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigValidationError>) {
        if self.message_window == 0 {
            issues.push(ConfigValidationError::ZeroValue("discussion.message_window"));
        }
        if self.min_interval_ms > MAX_INTERVAL_MS {
            issues.push(ConfigValidationError::TooLarge {
                field: "discussion.min_interval_ms",
                max: MAX_INTERVAL_MS,
            });
        }
    }
}
