//! Whole-run orchestration.
//!
//! Fetches the user list once, then sweeps users strictly one at a time
//! with a short pause between them to stay well under API quotas. A
//! failed user never stops the loop; the summary at the end reports
//! every failure.

use std::time::Duration;

use tracing::{error, info};

use permsweep_core::CleanupStats;
use permsweep_providers::{OAuthClient, OAuthCredentials};

use crate::config::AppConfig;
use crate::error::RunResult;
use crate::resolver::CredentialResolver;
use crate::secrets::TokenDecryptor;
use crate::store::UserStore;
use crate::worker::{UserCleanupWorker, UserOutcome};

/// Pause between users.
const USER_PACING: Duration = Duration::from_secs(1);

/// Timeout applied to every outbound HTTP request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint overrides. Used by tests to point at a local mock server.
#[derive(Debug, Default)]
pub struct Endpoints {
    /// OAuth token endpoint override.
    pub token_url: Option<String>,
    /// Calendar API base URL override.
    pub calendar_api_base: Option<String>,
}

/// Drives one full cleanup run.
#[derive(Debug)]
pub struct CleanupRunner {
    store: UserStore,
    worker: UserCleanupWorker,
    pacing: Duration,
    dry_run: bool,
}

impl CleanupRunner {
    /// Creates a runner against the real Google endpoints.
    pub fn new(config: &AppConfig, dry_run: bool) -> Self {
        Self::with_endpoints(config, dry_run, Endpoints::default())
    }

    /// Creates a runner with endpoint overrides.
    pub fn with_endpoints(config: &AppConfig, dry_run: bool, endpoints: Endpoints) -> Self {
        let store = UserStore::new(&config.supabase_url, &config.supabase_key, HTTP_TIMEOUT);

        let mut oauth = OAuthClient::new(
            OAuthCredentials::new(&config.google_client_id, &config.google_client_secret),
            HTTP_TIMEOUT,
        );
        if let Some(token_url) = endpoints.token_url {
            oauth = oauth.with_token_url(token_url);
        }

        let resolver = CredentialResolver::new(TokenDecryptor::new(&config.encryption_key), oauth);

        let mut worker = UserCleanupWorker::new(resolver, HTTP_TIMEOUT, dry_run);
        if let Some(api_base) = endpoints.calendar_api_base {
            worker = worker.with_api_base(api_base);
        }

        Self {
            store,
            worker,
            pacing: USER_PACING,
            dry_run,
        }
    }

    /// Overrides the pause between users. Used by tests.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Runs the cleanup over every connected user.
    ///
    /// Only a failed user-table query is fatal; every per-user failure is
    /// recorded in the returned statistics instead.
    pub async fn run(&self) -> RunResult<CleanupStats> {
        info!(
            "starting calendar cleanup ({} mode)",
            if self.dry_run { "dry run" } else { "live" }
        );

        let users = self.store.fetch_connected_users().await?;
        info!("found {} user(s) with calendar connected", users.len());

        let mut stats = CleanupStats::new();
        if users.is_empty() {
            info!("no users to process");
            stats.log_summary(self.dry_run);
            return Ok(stats);
        }

        let last = users.len() - 1;
        for (i, user) in users.iter().enumerate() {
            stats.users_processed += 1;
            match self.worker.process_user(user, &mut stats).await {
                Ok(UserOutcome::Cleaned) => stats.record_success(),
                Ok(UserOutcome::NoCredentials) => {
                    stats.record_failure(format!("user {}: credential/auth failure", user.email));
                }
                Err(e) => {
                    error!("cleanup failed for {}: {}", user.email, e);
                    stats.record_failure(format!("user {}: {}", user.email, e));
                }
            }

            if i < last {
                tokio::time::sleep(self.pacing).await;
            }
        }

        stats.log_summary(self.dry_run);
        Ok(stats)
    }
}
