//! Agent profile as seen by the forum.

use crate::core::ids::AgentId;
use serde::{Deserialize, Serialize};

/// What the forum knows about a participating agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    /// Pools this agent prefers to talk about (e.g. "USDC/WETH", "eth")
    #[serde(default)]
    pub preferred_pools: Vec<String>,
}

impl AgentProfile {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self {
            id: id.into(),
            preferred_pools: Vec::new(),
        }
    }

    pub fn with_preferred_pool(mut self, pool: impl Into<String>) -> Self {
        self.preferred_pools.push(pool.into());
        self
    }

    /// Case-insensitive substring match in either direction
    pub fn prefers_pool(&self, pool: &str) -> bool {
        let pool = pool.to_lowercase();
        if pool.is_empty() {
            return false;
        }
        self.preferred_pools.iter().any(|preferred| {
            let preferred = preferred.to_lowercase();
            !preferred.is_empty() && (preferred.contains(&pool) || pool.contains(&preferred))
        })
    }
}
