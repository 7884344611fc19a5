//! Shared HTTP client construction

use crate::error::RemoteError;

/// User agent sent with every request (the GitHub API rejects requests without one)
pub const USER_AGENT: &str = concat!("tracksync/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used by both remote adapters
///
/// Uses the client's default timeouts; no retry or backoff is layered on top.
pub(crate) fn http_client() -> Result<reqwest::Client, RemoteError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(RemoteError::Client)
}
