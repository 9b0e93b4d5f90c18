//! Per-user credential bundle.

use chrono::{DateTime, Duration, Utc};

/// Resolved credentials for one user.
///
/// The bundle lives in memory for the duration of one user's processing
/// and is then discarded. Refreshed access tokens are never written back
/// to storage: the job is one-shot, and the stored refresh token stays
/// valid across runs.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// Access token from the user row, if one was stored.
    pub access_token: Option<String>,
    /// Decrypted OAuth refresh token.
    pub refresh_token: String,
    /// Scopes granted to the legacy app.
    pub scopes: Vec<String>,
    /// Recorded access token expiry. Absent means unknown, which is
    /// treated as expired.
    pub expires_at: Option<DateTime<Utc>>,
}

impl UserCredentials {
    /// Creates a credential bundle from stored row data.
    pub fn new(
        access_token: Option<String>,
        refresh_token: impl Into<String>,
        scopes: Vec<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token,
            refresh_token: refresh_token.into(),
            scopes,
            expires_at,
        }
    }

    /// Whether the access token must be refreshed before use.
    ///
    /// A missing token, a missing expiry, or an expiry at or before `now`
    /// all require a refresh. Any ambiguity resolves toward refreshing
    /// rather than risking a stale token.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_none() {
            return true;
        }
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    /// Installs a freshly minted access token.
    pub fn update_access_token(
        &mut self,
        access_token: impl Into<String>,
        expires_in_secs: Option<i64>,
    ) {
        self.access_token = Some(access_token.into());
        self.expires_at = expires_in_secs.map(|secs| Utc::now() + Duration::seconds(secs));
    }
}
