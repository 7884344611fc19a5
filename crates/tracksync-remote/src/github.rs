//! GitHub contents API client
//!
//! Reads one file's raw text at a branch/path, authenticated with a bearer
//! token.

use crate::error::{ensure_success, RemoteError};
use crate::http::http_client;
use crate::source::DocumentSource;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Method;

/// Public GitHub API root
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Media type asking the contents API for the raw file instead of JSON
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// [`DocumentSource`] backed by one GitHub repository
#[derive(Clone)]
pub struct GitHubSource {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl std::fmt::Debug for GitHubSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSource")
            .field("api_url", &self.api_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GitHubSource {
    /// Create source for `owner/repo` under `api_url`
    ///
    /// # Errors
    /// Returns `RemoteError::Client` if the HTTP client cannot be built.
    pub fn new(
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            http: http_client()?,
            api_url: api_url.into(),
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        })
    }

    /// Contents endpoint for `path`
    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl DocumentSource for GitHubSource {
    async fn fetch_document(&self, branch: &str, path: &str) -> Result<String, RemoteError> {
        let url = self.contents_url(path);
        tracing::debug!(%url, branch, "fetching document");
        let response = self
            .http
            .get(&url)
            .query(&[("ref", branch)])
            .bearer_auth(&self.token)
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| RemoteError::transport(Method::GET, url.clone(), e))?;
        let response = ensure_success(&Method::GET, &url, response).await?;
        response
            .text()
            .await
            .map_err(|e| RemoteError::transport(Method::GET, url, e))
    }
}
