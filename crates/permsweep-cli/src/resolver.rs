//! Credential resolution for one user.
//!
//! Turns a stored user row into a usable credential bundle: decrypt the
//! refresh token, parse scopes and expiry, and refresh the access token
//! when it is expired or in doubt. Every failure path here is an expected
//! per-user condition and resolves to `None` (skip this user), never to a
//! run-fatal error.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use permsweep_providers::{OAuthClient, UserCredentials};

use crate::secrets::TokenDecryptor;
use crate::store::{ScopeField, UserRecord};

/// Resolves stored rows into usable credentials.
#[derive(Debug)]
pub struct CredentialResolver {
    decryptor: TokenDecryptor,
    oauth: OAuthClient,
}

impl CredentialResolver {
    /// Creates a resolver from the decryptor and OAuth client.
    pub fn new(decryptor: TokenDecryptor, oauth: OAuthClient) -> Self {
        Self { decryptor, oauth }
    }

    /// Produces valid credentials for a user, or `None` when the user
    /// cannot be authorized (no decryptable refresh token, or the refresh
    /// was rejected).
    pub async fn resolve(&self, user: &UserRecord) -> Option<UserCredentials> {
        let refresh_token = self
            .decryptor
            .decrypt(user.google_refresh_token.as_deref())?;

        let scopes = parse_scopes(user.google_scopes.as_ref());
        let expires_at = parse_expiry(user.google_token_expiry.as_deref());

        let mut credentials = UserCredentials::new(
            user.google_access_token.clone(),
            refresh_token,
            scopes,
            expires_at,
        );

        if credentials.needs_refresh(Utc::now()) {
            match self
                .oauth
                .refresh_access_token(&credentials.refresh_token)
                .await
            {
                Ok((access_token, expires_in)) => {
                    debug!("refreshed access token for {}", user.email);
                    credentials.update_access_token(access_token, expires_in);
                }
                Err(e) => {
                    warn!("token refresh failed for {}: {}", user.email, e);
                    return None;
                }
            }
        }

        Some(credentials)
    }
}

/// Parses the scope column.
///
/// A JSON array is used as-is. Text that parses as a JSON string array is
/// unwrapped; any other text is treated as a single scope, matching what
/// the legacy app stored in its earliest rows.
fn parse_scopes(field: Option<&ScopeField>) -> Vec<String> {
    match field {
        None => Vec::new(),
        Some(ScopeField::List(scopes)) => scopes.clone(),
        Some(ScopeField::Text(text)) => {
            serde_json::from_str::<Vec<String>>(text).unwrap_or_else(|_| vec![text.clone()])
        }
    }
}

/// Parses the recorded expiry. Unparseable text maps to `None`, which the
/// credential bundle treats as expired.
fn parse_expiry(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!("unparseable token expiry {:?}: {}", raw, e);
            None
        }
    }
}
