//! Port for the forum audit trail.
//!
//! Defines the [`ForumEventLogger`] trait for recording votes, verdicts and
//! executions to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable record of every state change (JSONL).

use serde_json::Value;

/// A structured forum event for logging.
///
/// Each event has a type string and a JSON payload containing event-specific
/// fields. The adapter adds the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ForumEvent {
    /// Event type identifier (e.g., "vote_cast", "verdict_reached").
    pub event_type: &'static str,
    pub payload: Value,
}

impl ForumEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging forum events.
///
/// `log` is synchronous and infallible; adapters swallow write failures so
/// the audit trail never blocks a vote or an execution.
pub trait ForumEventLogger: Send + Sync {
    fn log(&self, event: ForumEvent);
}

/// No-op implementation for tests and when the audit log is disabled.
pub struct NoForumEventLogger;

impl ForumEventLogger for NoForumEventLogger {
    fn log(&self, _event: ForumEvent) {}
}
