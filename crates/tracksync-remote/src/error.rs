//! Error types for remote calls
//!
//! Every failure of a remote read or write collapses into [`RemoteError`]:
//! - transport failures (DNS, TLS, connection reset)
//! - non-2xx responses
//! - bodies that do not decode into the expected shape
//!
//! Request URLs are recorded without their query string so credentials passed
//! as query parameters never end up in logs.

use reqwest::{Method, Response};

/// Longest response body excerpt kept in a status error
const BODY_EXCERPT_LEN: usize = 200;

/// Errors from the task board or the document host
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// HTTP client could not be constructed
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// Request never produced a response
    #[error("{method} {url} failed: {source}")]
    Transport {
        /// HTTP method of the request
        method: Method,
        /// Request URL without its query string
        url: String,
        /// Underlying client error, stripped of its URL
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        /// HTTP method of the request
        method: Method,
        /// Request URL without its query string
        url: String,
        /// Response status code
        status: u16,
        /// Trimmed excerpt of the response body
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("malformed response from {url}: {message}")]
    Decode {
        /// Request URL without its query string
        url: String,
        /// Decoder message
        message: String,
    },
}

impl RemoteError {
    /// Create transport error, stripping the URL embedded in the source
    pub fn transport(method: Method, url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            method,
            url: url.into(),
            source: source.without_url(),
        }
    }

    /// Create status error
    pub fn status(
        method: Method,
        url: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::Status {
            method,
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Create decode error
    pub fn decode(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// HTTP status, when the server answered
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pass successful responses through, turn everything else into [`RemoteError::Status`]
pub(crate) async fn ensure_success(
    method: &Method,
    url: &str,
    response: Response,
) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::status(
        method.clone(),
        url,
        status.as_u16(),
        excerpt(&body),
    ))
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = RemoteError::status(Method::GET, "https://api.trello.com/1/cards/abc", 404, "not found");
        assert_eq!(
            err.to_string(),
            "GET https://api.trello.com/1/cards/abc returned 404: not found"
        );
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn decode_error_display() {
        let err = RemoteError::decode("https://x/cards/1", "missing field `id`");
        assert!(err.to_string().contains("malformed response"));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "a".repeat(500);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), BODY_EXCERPT_LEN + 1);
        assert_eq!(excerpt("  short  "), "short");
    }
}
