//! Read-only access to the legacy user table.
//!
//! The legacy project exposes its Postgres tables through PostgREST, so a
//! single filtered, projected GET is all this job needs. Nothing is ever
//! written back.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Table holding the legacy user rows.
const USERS_TABLE: &str = "perm_users";

/// Columns projected from the user table.
const USER_COLUMNS: &str = "id,email,google_refresh_token,google_access_token,\
                            google_token_expiry,google_scopes,calendar_connected";

/// One row from the legacy user table.
///
/// Every credential field is optional: rows exist for users who never
/// completed calendar authorization, and absence is an ordinary value
/// here, not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    /// Opaque user id.
    pub id: String,
    /// User email, used for log lines and error entries.
    pub email: String,
    /// Fernet ciphertext of the OAuth refresh token.
    pub google_refresh_token: Option<String>,
    /// Last stored access token, possibly expired.
    pub google_access_token: Option<String>,
    /// RFC 3339 expiry of the stored access token.
    pub google_token_expiry: Option<String>,
    /// Scope grant, stored either as a JSON array or as free text.
    pub google_scopes: Option<ScopeField>,
    /// Whether the calendar integration was ever enabled.
    #[serde(default)]
    pub calendar_connected: bool,
}

/// The scope column as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScopeField {
    /// A proper JSON array of scope URLs.
    List(Vec<String>),
    /// Free text; older rows stored the serialized list or a bare scope.
    Text(String),
}

/// Errors from the user table query. Always fatal to the run.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request could not be completed.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// PostgREST answered with an error status.
    #[error("user query failed ({status}): {body}")]
    Query {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the expected row shape.
    #[error("failed to parse user rows: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the legacy user table.
#[derive(Debug)]
pub struct UserStore {
    http_client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl UserStore {
    /// Creates a store client for the given Supabase project.
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    /// Fetches every user whose calendar integration was ever enabled,
    /// projecting only the columns the cleanup needs.
    pub async fn fetch_connected_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, USERS_TABLE);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(&[
                ("select", USER_COLUMNS),
                ("calendar_connected", "eq.true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Query { status, body });
        }

        let body = response.text().await?;
        let users: Vec<UserRecord> = serde_json::from_str(&body)?;
        debug!("fetched {} connected user(s)", users.len());
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn parse_row_with_scope_array() {
        let row: UserRecord = serde_json::from_value(json!({
            "id": "u1",
            "email": "a@example.com",
            "google_refresh_token": "gAAAAA...",
            "google_access_token": "ya29.token",
            "google_token_expiry": "2025-06-01T10:00:00Z",
            "google_scopes": ["https://www.googleapis.com/auth/calendar"],
            "calendar_connected": true
        }))
        .unwrap();

        assert!(matches!(row.google_scopes, Some(ScopeField::List(ref s)) if s.len() == 1));
        assert!(row.calendar_connected);
    }

    #[test]
    fn parse_row_with_scope_text_and_missing_fields() {
        let row: UserRecord = serde_json::from_value(json!({
            "id": "u2",
            "email": "b@example.com",
            "google_refresh_token": null,
            "google_access_token": null,
            "google_token_expiry": null,
            "google_scopes": "https://www.googleapis.com/auth/calendar",
            "calendar_connected": true
        }))
        .unwrap();

        assert!(row.google_refresh_token.is_none());
        assert!(matches!(row.google_scopes, Some(ScopeField::Text(_))));
    }

    #[tokio::test]
    async fn fetch_issues_filtered_projected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/perm_users"))
            .and(query_param("calendar_connected", "eq.true"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "u1",
                    "email": "a@example.com",
                    "google_refresh_token": "blob",
                    "google_access_token": null,
                    "google_token_expiry": null,
                    "google_scopes": null,
                    "calendar_connected": true
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let store = UserStore::new(server.uri(), "service-key", Duration::from_secs(5));
        let users = store.fetch_connected_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "a@example.com");
    }

    #[tokio::test]
    async fn error_status_is_fatal_query_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/perm_users"))
            .respond_with(ResponseTemplate::new(401).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let store = UserStore::new(server.uri(), "bad-key", Duration::from_secs(5));
        let err = store.fetch_connected_users().await.unwrap_err();
        assert!(matches!(err, StoreError::Query { .. }));
        assert!(err.to_string().contains("permission denied"));
    }
}
