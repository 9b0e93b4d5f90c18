//! Run statistics and the final summary block.

use tracing::info;

/// Counters accumulated over one cleanup run.
///
/// Mutated only from the single orchestration task; lives for the
/// duration of one run and is logged once at the end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupStats {
    /// Users the run attempted, whether or not they succeeded.
    pub users_processed: u64,
    /// Users whose cleanup completed (including trivially, with zero events).
    pub users_succeeded: u64,
    /// Users skipped or failed; each has an entry in `errors`.
    pub users_failed: u64,
    /// Matching events discovered across all users, after deduplication.
    pub events_found: u64,
    /// Planning count: dry-run would-deletes are included so dry and live
    /// summaries are directly comparable.
    pub events_deleted: u64,
    /// Per-user error descriptions, in processing order.
    pub errors: Vec<String>,
}

impl CleanupStats {
    /// Creates a zeroed statistics block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successfully processed user.
    pub fn record_success(&mut self) {
        self.users_succeeded += 1;
    }

    /// Records one failed user with its error description.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.users_failed += 1;
        self.errors.push(error.into());
    }

    /// Emits the end-of-run summary block.
    pub fn log_summary(&self, dry_run: bool) {
        info!("{}", "=".repeat(70));
        info!("CLEANUP SUMMARY");
        info!("{}", "=".repeat(70));
        if dry_run {
            info!("mode: DRY RUN (no events were deleted)");
        } else {
            info!("mode: LIVE");
        }
        info!("users processed: {}", self.users_processed);
        info!("users succeeded: {}", self.users_succeeded);
        info!("users failed: {}", self.users_failed);
        info!("events found: {}", self.events_found);
        if dry_run {
            info!("events that would be deleted: {}", self.events_deleted);
        } else {
            info!("events deleted: {}", self.events_deleted);
        }
        if !self.errors.is_empty() {
            info!("errors ({}):", self.errors.len());
            for error in &self.errors {
                info!("  - {}", error);
            }
        }
        info!("{}", "=".repeat(70));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stats_are_zeroed() {
        let stats = CleanupStats::new();
        assert_eq!(stats.users_processed, 0);
        assert_eq!(stats.users_succeeded, 0);
        assert_eq!(stats.users_failed, 0);
        assert_eq!(stats.events_found, 0);
        assert_eq!(stats.events_deleted, 0);
        assert!(stats.errors.is_empty());
    }

    #[test]
    fn record_failure_keeps_error_order() {
        let mut stats = CleanupStats::new();
        stats.record_failure("user a@example.com: credential/auth failure");
        stats.record_failure("user b@example.com: request timeout");
        assert_eq!(stats.users_failed, 2);
        assert!(stats.errors[0].contains("a@example.com"));
        assert!(stats.errors[1].contains("b@example.com"));
    }

    #[test]
    fn record_success_counts() {
        let mut stats = CleanupStats::new();
        stats.record_success();
        stats.record_success();
        assert_eq!(stats.users_succeeded, 2);
        assert!(stats.errors.is_empty());
    }
}
