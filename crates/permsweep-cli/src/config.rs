//! Process-wide configuration.
//!
//! All settings come from the environment and are read once at startup
//! into an explicit struct that gets passed down; there are no ambient
//! singletons. Validation fails fast with every missing variable
//! enumerated, so an operator can fix the whole set in one pass.

use std::env;

use crate::error::RunError;

/// Resolved process-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the legacy Supabase project.
    pub supabase_url: String,
    /// Service-role key for the user table query.
    pub supabase_key: String,
    /// Symmetric key the legacy app used to encrypt refresh tokens.
    pub encryption_key: String,
    /// OAuth client id registered for the legacy app.
    pub google_client_id: String,
    /// OAuth client secret registered for the legacy app.
    pub google_client_secret: String,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, RunError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary lookup function.
    ///
    /// A variable set to the empty string counts as missing; an empty
    /// endpoint or key is never usable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| {
            let value = lookup(name).filter(|v| !v.is_empty());
            if value.is_none() {
                missing.push(name.to_string());
            }
            value.unwrap_or_default()
        };

        let config = Self {
            supabase_url: get("SUPABASE_URL"),
            supabase_key: get("SUPABASE_KEY"),
            encryption_key: get("ENCRYPTION_KEY"),
            google_client_id: get("GOOGLE_CLIENT_ID"),
            google_client_secret: get("GOOGLE_CLIENT_SECRET"),
        };

        if missing.is_empty() {
            Ok(config)
        } else {
            Err(RunError::MissingConfig(missing))
        }
    }
}
