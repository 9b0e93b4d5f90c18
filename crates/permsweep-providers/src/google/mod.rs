//! Google Calendar integration.
//!
//! The cleanup job talks to two Google endpoints: the Calendar API v3 for
//! event search and deletion, and the OAuth token endpoint for refreshing
//! expired access tokens. There is no interactive authorization here; the
//! job replays credentials users granted to the legacy app.

mod client;
mod credentials;
mod oauth;

pub use client::CalendarClient;
pub use credentials::UserCredentials;
pub use oauth::{OAuthClient, OAuthCredentials};
