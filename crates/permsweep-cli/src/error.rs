//! Run-level error types.
//!
//! Only two failure categories are fatal to a run: missing configuration
//! and a failed user-table query. Everything else is isolated to one user
//! and recorded in the statistics instead.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for run-level operations.
pub type RunResult<T> = Result<T, RunError>;

/// Fatal errors that abort the run before the per-user loop.
#[derive(Debug, Error)]
pub enum RunError {
    /// Required configuration is missing.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    /// The user table could not be queried.
    #[error("failed to query users: {0}")]
    Store(#[from] StoreError),
}
