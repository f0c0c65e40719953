//! Cache configuration from TOML (`[cache]` section)

use super::ConfigValidationError;
use chrono::Duration;
use forum_domain::core::time::saturating_seconds;
use serde::{Deserialize, Serialize};

/// One day
const MAX_AGENT_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Raw cache configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// How long an agent profile lookup stays cached
    pub agent_ttl_seconds: u64,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            agent_ttl_seconds: 300,
        }
    }
}

impl FileCacheConfig {
    pub fn agent_ttl(&self) -> Duration {
        saturating_seconds(self.agent_ttl_seconds)
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigValidationError>) {
        if self.agent_ttl_seconds == 0 {
            issues.push(ConfigValidationError::ZeroValue("cache.agent_ttl_seconds"));
        } else if self.agent_ttl_seconds > MAX_AGENT_TTL_SECONDS {
            issues.push(ConfigValidationError::TooLarge {
                field: "cache.agent_ttl_seconds",
                max: MAX_AGENT_TTL_SECONDS,
            });
        }
    }
}
