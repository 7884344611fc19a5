//! Error types for tracksync Core
//!
//! Three tiers, matching how far a failure reaches:
//! - Configuration errors (missing credentials, unreadable config) stop the
//!   whole run before any entry is processed
//! - Fetch errors skip one entry; they surface in the [`RunReport`]
//! - Write errors are isolated to one remote operation and recorded as
//!   [`OperationFailure`]s
//!
//! [`RunReport`]: crate::outcome::RunReport
//! [`OperationFailure`]: crate::outcome::OperationFailure

use std::path::PathBuf;
use tracksync_remote::RemoteError;

/// Errors loading settings or the tracked-entry configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variables are unset or blank
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<&'static str>),

    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON of the expected shape
    #[error("malformed config {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create malformed-config error for path
    pub fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Malformed {
            path: path.into(),
            source,
        }
    }
}

/// Errors persisting the run state file
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Temporary file could not be created or written
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State could not be encoded
    #[error("state encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Temporary file could not replace the state file
    #[error("could not replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StateError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Combined error for the run entry point
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl SyncError {
    /// Whether the error stops the run before any entry is processed
    #[inline]
    #[must_use]
    pub fn is_fatal_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Remote(RemoteError::Client(_)))
    }
}

/// Result type alias for tracksync operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_lists_every_name() {
        let err = ConfigError::MissingEnv(vec!["GITHUB_TOKEN", "TRELLO_API_KEY"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: GITHUB_TOKEN, TRELLO_API_KEY"
        );
    }

    #[test]
    fn io_error_mentions_path() {
        let err = ConfigError::io_error(
            "config.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn error_conversions() {
        let config_err = ConfigError::MissingEnv(vec!["GITHUB_TOKEN"]);
        let sync_err: SyncError = config_err.into();
        assert!(matches!(sync_err, SyncError::Config(_)));
        assert!(sync_err.is_fatal_config());

        let state_err = StateError::io_error(
            "sync_state.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let sync_err: SyncError = state_err.into();
        assert!(!sync_err.is_fatal_config());
    }
}
