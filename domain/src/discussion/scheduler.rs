//! Discussion turn gating.
//!
//! [`should_speak`] decides, per agent per tick, whether that agent may post
//! a discussion message. It is a pure function of its inputs; the caller
//! supplies the recent message window and the current time.
//!
//! Rules are checked in order and the first match wins:
//!
//! | # | Condition | Speak? | Reason |
//! |---|-----------|--------|--------|
//! | 1 | no recent messages | yes | `starting_discussion` |
//! | 2 | own last autonomous message within `min_interval` | no | `rate_limited` |
//! | 3 | own autonomous messages ≥ `max_auto_messages` | no | `message_cap_reached` |
//! | 4 | forum pool matches a preferred pool | yes | `pool_match` |
//! | 5 | agent id mentioned in a message | yes | `mentioned` |
//! | 6 | otherwise | yes | `active_participant` |

use super::message::DiscussionMessage;
use crate::core::time::saturating_millis;
use crate::forum::{AgentProfile, Forum};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Throttling policy for autonomous discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionPolicy {
    /// Minimum gap between two autonomous messages of the same agent
    pub min_interval_ms: u64,
    /// Hard cap on autonomous messages per agent in a forum
    pub max_auto_messages: usize,
}

impl Default for DiscussionPolicy {
    fn default() -> Self {
        Self {
            min_interval_ms: 30_000,
            max_auto_messages: 3,
        }
    }
}

impl DiscussionPolicy {
    pub fn min_interval(&self) -> Duration {
        saturating_millis(self.min_interval_ms)
    }
}

/// Why an agent may or may not speak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakReason {
    StartingDiscussion,
    RateLimited,
    MessageCapReached,
    PoolMatch,
    Mentioned,
    ActiveParticipant,
}

impl SpeakReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakReason::StartingDiscussion => "starting_discussion",
            SpeakReason::RateLimited => "rate_limited",
            SpeakReason::MessageCapReached => "message_cap_reached",
            SpeakReason::PoolMatch => "pool_match",
            SpeakReason::Mentioned => "mentioned",
            SpeakReason::ActiveParticipant => "active_participant",
        }
    }

    /// Ordering hint when several agents may speak; lower goes first.
    pub fn priority(&self) -> u8 {
        match self {
            SpeakReason::PoolMatch => 0,
            SpeakReason::Mentioned => 1,
            SpeakReason::StartingDiscussion => 2,
            SpeakReason::ActiveParticipant => 3,
            SpeakReason::RateLimited | SpeakReason::MessageCapReached => u8::MAX,
        }
    }
}

impl std::fmt::Display for SpeakReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of [`should_speak`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakDecision {
    pub should: bool,
    pub reason: SpeakReason,
}

impl SpeakDecision {
    fn speak(reason: SpeakReason) -> Self {
        Self {
            should: true,
            reason,
        }
    }

    fn hold(reason: SpeakReason) -> Self {
        Self {
            should: false,
            reason,
        }
    }
}

/// Decide whether `agent` may post in `forum` now.
///
/// `recent` need not be ordered; the latest autonomous message is found by
/// timestamp.
pub fn should_speak(
    agent: &AgentProfile,
    forum: &Forum,
    recent: &[DiscussionMessage],
    policy: &DiscussionPolicy,
    now: DateTime<Utc>,
) -> SpeakDecision {
    if recent.is_empty() {
        return SpeakDecision::speak(SpeakReason::StartingDiscussion);
    }

    let own_auto: Vec<&DiscussionMessage> = recent
        .iter()
        .filter(|m| m.is_autonomous_from(&agent.id))
        .collect();

    if let Some(last) = own_auto.iter().map(|m| m.created_at).max()
        && now - last < policy.min_interval()
    {
        return SpeakDecision::hold(SpeakReason::RateLimited);
    }

    if own_auto.len() >= policy.max_auto_messages {
        return SpeakDecision::hold(SpeakReason::MessageCapReached);
    }

    if let Some(pool) = forum.pool_focus.as_deref()
        && agent.prefers_pool(pool)
    {
        return SpeakDecision::speak(SpeakReason::PoolMatch);
    }

    let needle = agent.id.as_str().to_lowercase();
    if !needle.is_empty()
        && recent
            .iter()
            .any(|m| m.content.to_lowercase().contains(&needle))
    {
        return SpeakDecision::speak(SpeakReason::Mentioned);
    }

    SpeakDecision::speak(SpeakReason::ActiveParticipant)
}
