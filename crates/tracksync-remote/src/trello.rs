//! Trello REST client
//!
//! Authenticates every call with the key + token pair as query parameters.

use crate::board::BoardClient;
use crate::error::{ensure_success, RemoteError};
use crate::http::http_client;
use crate::model::{
    ActionPayload, CardPayload, ItemState, RemoteCard, RemoteChecklist, RemoteComment, RemoteItem,
    COMMENT_ACTION,
};
use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;

/// Public Trello API root
pub const DEFAULT_TRELLO_API_URL: &str = "https://api.trello.com/1";

/// Comment actions requested per card fetch (Trello's default page is 50)
const COMMENT_FETCH_LIMIT: &str = "1000";

/// [`BoardClient`] backed by the Trello REST API
#[derive(Clone)]
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
    token: String,
}

impl std::fmt::Debug for TrelloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloClient")
            .field("base_url", &self.base_url)
            .field("key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl TrelloClient {
    /// Create client for `base_url` authenticated with `key` + `token`
    ///
    /// # Errors
    /// Returns `RemoteError::Client` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        key: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into(),
            key: key.into(),
            token: token.into(),
        })
    }

    /// API root this client talks to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<(String, Response), RemoteError> {
        let url = self.url(path);
        tracing::trace!(%method, %url, "trello request");
        let response = self
            .http
            .request(method.clone(), &url)
            .query(&[("key", self.key.as_str()), ("token", self.token.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| RemoteError::transport(method.clone(), url.clone(), e))?;
        let response = ensure_success(&method, &url, response).await?;
        Ok((url, response))
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, RemoteError> {
        let (url, response) = self.call(method.clone(), path, params).await?;
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::transport(method, url.clone(), e))?;
        serde_json::from_str(&body).map_err(|e| RemoteError::decode(url, e))
    }
}

#[async_trait]
impl BoardClient for TrelloClient {
    async fn fetch_card(&self, card_id: &str) -> Result<RemoteCard, RemoteError> {
        let payload: CardPayload = self
            .call_json(
                Method::GET,
                &format!("cards/{card_id}"),
                &[
                    ("checklists", "all"),
                    ("actions", COMMENT_ACTION),
                    ("actions_limit", COMMENT_FETCH_LIMIT),
                ],
            )
            .await?;
        Ok(payload.into())
    }

    async fn create_checklist(
        &self,
        card_id: &str,
        name: &str,
    ) -> Result<RemoteChecklist, RemoteError> {
        self.call_json(Method::POST, "checklists", &[("idCard", card_id), ("name", name)])
            .await
    }

    async fn create_check_item(
        &self,
        checklist_id: &str,
        name: &str,
        checked: bool,
    ) -> Result<RemoteItem, RemoteError> {
        let checked = if checked { "true" } else { "false" };
        self.call_json(
            Method::POST,
            &format!("checklists/{checklist_id}/checkItems"),
            &[("name", name), ("checked", checked)],
        )
        .await
    }

    async fn set_check_item_state(
        &self,
        card_id: &str,
        item_id: &str,
        state: ItemState,
    ) -> Result<(), RemoteError> {
        self.call(
            Method::PUT,
            &format!("cards/{card_id}/checkItem/{item_id}"),
            &[("state", state.as_str())],
        )
        .await
        .map(drop)
    }

    async fn delete_check_item(
        &self,
        checklist_id: &str,
        item_id: &str,
    ) -> Result<(), RemoteError> {
        self.call(
            Method::DELETE,
            &format!("checklists/{checklist_id}/checkItems/{item_id}"),
            &[],
        )
        .await
        .map(drop)
    }

    async fn create_comment(
        &self,
        card_id: &str,
        text: &str,
    ) -> Result<RemoteComment, RemoteError> {
        let action: ActionPayload = self
            .call_json(
                Method::POST,
                &format!("cards/{card_id}/actions/comments"),
                &[("text", text)],
            )
            .await?;
        let id = action.id.clone();
        Ok(action
            .into_comment()
            .unwrap_or_else(|| RemoteComment::new(id, text)))
    }

    async fn update_comment(&self, comment_id: &str, text: &str) -> Result<(), RemoteError> {
        self.call(Method::PUT, &format!("actions/{comment_id}"), &[("text", text)])
            .await
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = TrelloClient::new("https://api.trello.com/1/", "k", "t").unwrap();
        assert_eq!(client.url("/cards/abc"), "https://api.trello.com/1/cards/abc");
        assert_eq!(client.url("checklists"), "https://api.trello.com/1/checklists");
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let client = TrelloClient::new(DEFAULT_TRELLO_API_URL, "my-key", "my-token").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains(DEFAULT_TRELLO_API_URL));
        assert!(!debug.contains("my-key"));
        assert!(!debug.contains("my-token"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = TrelloClient::new("http://127.0.0.1:9", "k", "secret-token").unwrap();
        let err = client.fetch_card("abc").await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }));
        assert!(!err.to_string().contains("secret-token"));
    }
}
