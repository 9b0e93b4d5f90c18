//! Core types for the calendar cleanup job: events, pattern matching,
//! run statistics, the discovery time window, and tracing setup.

pub mod event;
pub mod matcher;
pub mod stats;
pub mod tracing;
pub mod window;

pub use event::{CleanupEvent, EventStart};
pub use matcher::{TRACKER_PATTERNS, filter_and_dedupe, matches_any_pattern};
pub use stats::CleanupStats;
pub use tracing::{TracingConfig, TracingError, init_tracing};
pub use window::CleanupWindow;
