//! Saturating conversions from configured spans to chrono types.
//!
//! Configured spans are unsigned and unbounded; chrono panics on spans it
//! cannot represent. These helpers clamp to the representable range instead.

use chrono::{DateTime, Duration, Utc};

pub fn saturating_minutes(minutes: u64) -> Duration {
    i64::try_from(minutes)
        .ok()
        .and_then(Duration::try_minutes)
        .unwrap_or(Duration::MAX)
}

pub fn saturating_seconds(seconds: u64) -> Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

pub fn saturating_millis(millis: u64) -> Duration {
    i64::try_from(millis)
        .ok()
        .and_then(Duration::try_milliseconds)
        .unwrap_or(Duration::MAX)
}

/// `at + span`, clamped to the latest representable instant
pub fn saturating_add(at: DateTime<Utc>, span: Duration) -> DateTime<Utc> {
    at.checked_add_signed(span).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
