//! Google Calendar API client.
//!
//! Low-level HTTP client for the two Calendar API v3 operations the
//! cleanup job needs: free-text event search over a bounded time window
//! (paginated) and delete-by-id, both against the user's primary
//! calendar.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use permsweep_core::{CleanupEvent, CleanupWindow, EventStart};

use crate::error::{ProviderError, ProviderResult};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar queried and cleaned for every user.
const PRIMARY_CALENDAR: &str = "primary";

/// Page size for event search.
const SEARCH_PAGE_SIZE: usize = 100;

/// Google Calendar API client, scoped to one user's access token.
#[derive(Debug)]
pub struct CalendarClient {
    http_client: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl CalendarClient {
    /// Creates a new client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            api_base: CALENDAR_API_BASE.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Overrides the API base URL. Used by tests to point at a mock
    /// server.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Searches the primary calendar for events matching a free-text
    /// query inside the given window, following continuation tokens until
    /// the result set is exhausted.
    ///
    /// Recurring events are expanded server-side (`singleEvents`), so
    /// each returned entry is individually deletable.
    pub async fn search_events(
        &self,
        query: &str,
        window: &CleanupWindow,
    ) -> ProviderResult<Vec<CleanupEvent>> {
        let mut found = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .search_page(query, window, page_token.as_deref())
                .await?;

            for event in page.items {
                if let Some(event) = convert_event(event) {
                    found.push(event);
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("query {:?} matched {} event(s)", query, found.len());
        Ok(found)
    }

    /// Fetches a single page of search results.
    async fn search_page(
        &self,
        query: &str,
        window: &CleanupWindow,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let url = format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(PRIMARY_CALENDAR)
        );

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("q", query.to_string()),
                ("timeMin", window.time_min.to_rfc3339()),
                ("timeMax", window.time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("maxResults", SEARCH_PAGE_SIZE.to_string()),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token.to_string())]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timeout")
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {}", e))
            } else {
                ProviderError::network(format!("request failed: {}", e))
            }
        })?;

        let response = fail_on_error_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::invalid_response(format!("failed to parse response: {}", e)))
    }

    /// Deletes one event from the primary calendar.
    ///
    /// An event that no longer exists (deleted by the user, or by an
    /// earlier run) surfaces as a not-found error; the caller decides how
    /// loud to be about it.
    pub async fn delete_event(&self, event_id: &str) -> ProviderResult<()> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.api_base,
            urlencoding::encode(PRIMARY_CALENDAR),
            urlencoding::encode(event_id)
        );

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("delete request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Err(ProviderError::not_found(format!(
                "event {} does not exist",
                event_id
            )));
        }

        fail_on_error_status(response).await?;
        debug!("deleted event {}", event_id);
        Ok(())
    }
}

/// Maps non-success statuses to provider errors.
async fn fail_on_error_status(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return Err(ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        )));
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::authentication(
            "access token expired or invalid",
        ));
    }

    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::authorization("access denied to calendar"));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::server(format!(
            "API error ({}): {}",
            status, body
        )));
    }

    Ok(response)
}

/// Converts a Google Calendar API event to a [`CleanupEvent`].
///
/// Cancelled events and events without a parseable start marker are
/// skipped; there is nothing to delete for the former and nothing to log
/// meaningfully for the latter.
fn convert_event(event: ApiEvent) -> Option<CleanupEvent> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }

    let id = event.id?;
    let summary = event.summary.unwrap_or_default();

    let start = event.start?;
    let start = match (start.date_time, start.date) {
        (Some(dt), _) => {
            let parsed = DateTime::parse_from_rfc3339(&dt)
                .map_err(|e| warn!("failed to parse start time for {}: {}", id, e))
                .ok()?;
            EventStart::DateTime(parsed.with_timezone(&Utc))
        }
        (None, Some(date)) => {
            let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| warn!("failed to parse start date for {}: {}", id, e))
                .ok()?;
            EventStart::Date(parsed)
        }
        (None, None) => {
            warn!("event {} has no start marker", id);
            return None;
        }
    };

    Some(CleanupEvent::new(id, summary, start))
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

/// A single event from the Google Calendar API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    status: Option<String>,
    start: Option<ApiEventTime>,
}

/// Event time from the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(api_base: String) -> CalendarClient {
        CalendarClient::new("test-token", Duration::from_secs(5)).with_api_base(api_base)
    }

    #[test]
    fn parse_event_list_response() {
        let json = r#"{
            "items": [
                {
                    "id": "event1",
                    "summary": "PWD Expiration: Acme",
                    "start": {
                        "date": "2025-03-15"
                    },
                    "status": "confirmed"
                }
            ],
            "nextPageToken": "page2"
        }"#;

        let response: EventListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.next_page_token, Some("page2".to_string()));
    }

    #[test]
    fn convert_skips_cancelled_events() {
        let event: ApiEvent = serde_json::from_str(
            r#"{"id": "e1", "summary": "PWD Expiration: Acme",
                "start": {"date": "2025-03-15"}, "status": "cancelled"}"#,
        )
        .unwrap();
        assert!(convert_event(event).is_none());
    }

    #[test]
    fn convert_all_day_event() {
        let event: ApiEvent = serde_json::from_str(
            r#"{"id": "e1", "summary": "Ready to File: Acme",
                "start": {"date": "2025-03-15"}}"#,
        )
        .unwrap();
        let converted = convert_event(event).unwrap();
        assert_eq!(
            converted.start,
            EventStart::Date(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
        );
    }

    #[test]
    fn convert_timed_event() {
        let event: ApiEvent = serde_json::from_str(
            r#"{"id": "e1", "summary": "I-140 Deadline: Acme",
                "start": {"dateTime": "2025-03-15T10:00:00Z"}}"#,
        )
        .unwrap();
        let converted = convert_event(event).unwrap();
        assert!(matches!(converted.start, EventStart::DateTime(_)));
    }

    #[test]
    fn convert_skips_event_without_start_marker() {
        let event: ApiEvent =
            serde_json::from_str(r#"{"id": "e1", "summary": "odd", "start": {}}"#).unwrap();
        assert!(convert_event(event).is_none());
    }

    #[tokio::test]
    async fn search_follows_continuation_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("q", "PWD Expiration:"))
            .and(query_param("pageToken", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "e2", "summary": "PWD Expiration: Beta",
                     "start": {"date": "2025-04-01"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("q", "PWD Expiration:"))
            .and(query_param("singleEvents", "true"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "e1", "summary": "PWD Expiration: Acme",
                     "start": {"date": "2025-03-15"}}
                ],
                "nextPageToken": "page2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(server.uri());
        let window = CleanupWindow::around_now();
        let events = client.search_events("PWD Expiration:", &window).await.unwrap();

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn search_maps_unauthorized_to_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client(server.uri());
        let window = CleanupWindow::around_now();
        let err = client.search_events("PWD Expiration:", &window).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
    }

    #[tokio::test]
    async fn delete_event_succeeds_on_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/e1"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(server.uri());
        client.delete_event("e1").await.unwrap();
    }

    #[tokio::test]
    async fn delete_of_missing_event_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let client = client(server.uri());
        let err = client.delete_event("gone").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
    }
}
