//! Google Calendar access for the cleanup job.
//!
//! - [`CalendarClient`] - paginated event search and delete-by-id
//! - [`OAuthClient`] - refresh-token grant for expired access tokens
//! - [`UserCredentials`] - per-user credential bundle with expiry logic
//! - [`ProviderError`] - error taxonomy for provider operations

pub mod error;
pub mod google;

// Re-export main types at crate root
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use google::{CalendarClient, OAuthClient, OAuthCredentials, UserCredentials};
