//! Discovery time window.
//!
//! Event discovery is restricted to a fixed window around the invocation
//! instant: the legacy tracker never scheduled events further out, and an
//! unbounded search over years of calendar history would be wasteful.

use chrono::{DateTime, Duration, Utc};

/// Days into the past covered by discovery.
const LOOKBACK_DAYS: i64 = 730;

/// Days into the future covered by discovery.
const LOOKAHEAD_DAYS: i64 = 365;

/// The bounded time window searched for legacy tracker events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupWindow {
    /// Inclusive lower bound for event start times.
    pub time_min: DateTime<Utc>,
    /// Inclusive upper bound for event start times.
    pub time_max: DateTime<Utc>,
}

impl CleanupWindow {
    /// Window relative to the invocation instant: two years back, one
    /// year ahead.
    pub fn around_now() -> Self {
        Self::around(Utc::now())
    }

    /// Window relative to an explicit instant.
    pub fn around(now: DateTime<Utc>) -> Self {
        Self {
            time_min: now - Duration::days(LOOKBACK_DAYS),
            time_max: now + Duration::days(LOOKAHEAD_DAYS),
        }
    }
}
