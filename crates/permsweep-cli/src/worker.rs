//! Per-user cleanup.
//!
//! Everything that can go wrong for one user stays inside this module:
//! search failures degrade to zero results for that pattern, delete
//! failures are logged and skipped, and only an unusable credential set
//! fails the user as a whole.

use std::time::Duration;

use tracing::{info, warn};

use permsweep_core::{filter_and_dedupe, CleanupStats, CleanupWindow, TRACKER_PATTERNS};
use permsweep_providers::{CalendarClient, ProviderResult};

use crate::resolver::CredentialResolver;
use crate::store::UserRecord;

/// Outcome of processing one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOutcome {
    /// The user's calendar was swept; individual event failures may
    /// still have been logged.
    Cleaned,
    /// No usable credentials could be produced for the user.
    NoCredentials,
}

/// Runs the cleanup for one user at a time.
#[derive(Debug)]
pub struct UserCleanupWorker {
    resolver: CredentialResolver,
    api_base: Option<String>,
    timeout: Duration,
    dry_run: bool,
}

impl UserCleanupWorker {
    /// Creates a worker.
    pub fn new(resolver: CredentialResolver, timeout: Duration, dry_run: bool) -> Self {
        Self {
            resolver,
            api_base: None,
            timeout,
            dry_run,
        }
    }

    /// Overrides the Calendar API base URL. Used by tests.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Sweeps one user's calendar, accumulating counts into `stats`.
    pub async fn process_user(
        &self,
        user: &UserRecord,
        stats: &mut CleanupStats,
    ) -> ProviderResult<UserOutcome> {
        info!("processing user {}", user.email);

        let Some(credentials) = self.resolver.resolve(user).await else {
            warn!("no usable credentials for {}, skipping", user.email);
            return Ok(UserOutcome::NoCredentials);
        };
        let Some(access_token) = credentials.access_token else {
            warn!("no access token for {}, skipping", user.email);
            return Ok(UserOutcome::NoCredentials);
        };

        let mut client = CalendarClient::new(access_token, self.timeout);
        if let Some(api_base) = &self.api_base {
            client = client.with_api_base(api_base.clone());
        }

        let window = CleanupWindow::around_now();
        let mut discovered = Vec::new();
        for pattern in TRACKER_PATTERNS {
            match client.search_events(pattern, &window).await {
                Ok(events) => discovered.extend(events),
                Err(e) => {
                    warn!(
                        "search for {:?} failed for {}: {}",
                        pattern, user.email, e
                    );
                }
            }
        }

        let events = filter_and_dedupe(discovered, &TRACKER_PATTERNS);
        stats.events_found += events.len() as u64;

        if events.is_empty() {
            info!("no legacy events for {}", user.email);
            return Ok(UserOutcome::Cleaned);
        }

        for event in &events {
            if self.dry_run {
                info!("[dry run] would delete: {} ({})", event.summary, event.start);
                stats.events_deleted += 1;
                continue;
            }
            match client.delete_event(&event.id).await {
                Ok(()) => {
                    info!("deleted: {} ({})", event.summary, event.start);
                    stats.events_deleted += 1;
                }
                Err(e) => {
                    warn!("failed to delete event {}: {}", event.id, e);
                }
            }
        }

        Ok(UserOutcome::Cleaned)
    }
}
