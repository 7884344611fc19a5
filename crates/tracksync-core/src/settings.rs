//! Run settings: credentials and API endpoints
//!
//! Read once at startup from the environment and passed by reference to
//! whatever needs them. Nothing here is global.

use crate::error::ConfigError;
use tracksync_remote::{
    GitHubSource, RemoteError, TrelloClient, DEFAULT_GITHUB_API_URL, DEFAULT_TRELLO_API_URL,
};

/// Owner of the repository holding the progress documents
pub const ENV_GITHUB_REPO_OWNER: &str = "GITHUB_REPO_OWNER";
/// Name of the repository holding the progress documents
pub const ENV_GITHUB_REPO_NAME: &str = "GITHUB_REPO_NAME";
/// Token for the GitHub contents API
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Trello API key
pub const ENV_TRELLO_API_KEY: &str = "TRELLO_API_KEY";
/// Trello API token
pub const ENV_TRELLO_API_TOKEN: &str = "TRELLO_API_TOKEN";
/// Optional GitHub API root override
pub const ENV_GITHUB_API_URL: &str = "TRACKSYNC_GITHUB_API_URL";
/// Optional Trello API root override
pub const ENV_TRELLO_API_URL: &str = "TRACKSYNC_TRELLO_API_URL";

/// Document host settings
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    /// API root
    pub api_url: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Bearer token
    pub token: String,
}

/// Task-board settings
#[derive(Clone, PartialEq, Eq)]
pub struct TrelloSettings {
    /// API root
    pub api_url: String,
    /// API key
    pub key: String,
    /// API token
    pub token: String,
}

/// Everything a run needs to reach both remote systems
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Document host
    pub github: GitHubSettings,
    /// Task board
    pub trello: TrelloSettings,
}

impl Settings {
    /// Read settings from the process environment
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnv` naming every required variable that
    /// is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnv` naming every required variable that
    /// is unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            value(name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };

        let owner = required(ENV_GITHUB_REPO_OWNER);
        let repo = required(ENV_GITHUB_REPO_NAME);
        let github_token = required(ENV_GITHUB_TOKEN);
        let key = required(ENV_TRELLO_API_KEY);
        let trello_token = required(ENV_TRELLO_API_TOKEN);

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing));
        }

        Ok(Self {
            github: GitHubSettings {
                api_url: value(ENV_GITHUB_API_URL)
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                owner,
                repo,
                token: github_token,
            },
            trello: TrelloSettings {
                api_url: value(ENV_TRELLO_API_URL)
                    .unwrap_or_else(|| DEFAULT_TRELLO_API_URL.to_string()),
                key,
                token: trello_token,
            },
        })
    }

    /// Document source for the configured repository
    ///
    /// # Errors
    /// Returns `RemoteError::Client` if the HTTP client cannot be built.
    pub fn document_source(&self) -> Result<GitHubSource, RemoteError> {
        GitHubSource::new(
            &self.github.api_url,
            &self.github.owner,
            &self.github.repo,
            &self.github.token,
        )
    }

    /// Board client for the configured Trello account
    ///
    /// # Errors
    /// Returns `RemoteError::Client` if the HTTP client cannot be built.
    pub fn board_client(&self) -> Result<TrelloClient, RemoteError> {
        TrelloClient::new(&self.trello.api_url, &self.trello.key, &self.trello.token)
    }
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("api_url", &self.api_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for TrelloSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloSettings")
            .field("api_url", &self.api_url)
            .field("key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}
