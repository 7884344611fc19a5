//! Document-host seam

use crate::error::RemoteError;
use async_trait::async_trait;

/// Read-only access to progress documents kept in source control
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Raw text of the file at `path` on `branch`
    async fn fetch_document(&self, branch: &str, path: &str) -> Result<String, RemoteError>;
}
