//! Event types for calendar cleanup.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Start marker of a calendar event.
///
/// The legacy tracker created both all-day entries (date only) and timed
/// entries, so both forms are carried through discovery and into the
/// deletion log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventStart {
    /// An all-day event date (no specific time).
    Date(NaiveDate),
    /// A specific datetime, stored in UTC.
    DateTime(DateTime<Utc>),
}

impl fmt::Display for EventStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// A calendar event under cleanup evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupEvent {
    /// Provider-assigned id, unique within one user's calendar.
    pub id: String,
    /// Event title as shown in the calendar.
    pub summary: String,
    /// Start marker (all-day date or timed start).
    pub start: EventStart,
}

impl CleanupEvent {
    /// Creates a new cleanup event.
    pub fn new(id: impl Into<String>, summary: impl Into<String>, start: EventStart) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            start,
        }
    }
}
