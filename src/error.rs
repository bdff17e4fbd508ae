//! Error types shared by the transport, the authenticator and the API client.
//!
//! Every failure reaches the immediate caller as an [`Error`]. Nothing is
//! retried locally. The three remote failure kinds stay distinguishable:
//!
//! - [`Error::Transport`] - the round-trip itself failed (connection, stream)
//! - [`Error::Authentication`] - the token endpoint refused the exchange
//! - [`Error::Query`] - a catalog endpoint answered with a non-success status
//!
//! A response body that is not valid JSON is never an error on its own; it is
//! carried as [`Body::Text`] and only becomes [`Error::Decode`] when a typed
//! result was expected.

use std::path::PathBuf;

use reqwest::Method;

use crate::spotify::transport::Body;

/// Boxed source error for failures coming from arbitrary transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to authenticate with the Spotify accounts service (status {status}): {body}")]
    Authentication { status: u16, body: Body },

    #[error("{method} {endpoint} failed with status {status}: {body}")]
    Query {
        method: Method,
        endpoint: String,
        status: u16,
        body: Body,
    },

    #[error("unexpected response shape from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },

    #[error("authorization callback state does not match the pending request")]
    StateMismatch,

    #[error("authorization was denied: {0}")]
    AuthorizationDenied(String),

    #[error("authorization callback did not carry a code")]
    MissingCode,

    #[error("no authorization callback received in time")]
    CallbackTimeout,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to encode query parameters: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    #[error("failed to load credentials from '{}': {reason}", path.display())]
    Credentials { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn transport(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    /// HTTP status of a failed exchange, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. } | Error::Query { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body returned by the server for a failed exchange.
    pub fn body(&self) -> Option<&Body> {
        match self {
            Error::Authentication { body, .. } | Error::Query { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_error_exposes_status_and_body() {
        let err = Error::Query {
            method: Method::GET,
            endpoint: "/v1/albums/x".to_string(),
            status: 401,
            body: Body::Json(json!({"error": {"status": 401, "message": "expired"}})),
        };

        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("GET /v1/albums/x"));
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = Error::transport("https://api.spotify.com/v1/me", "connection reset");
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
    }
}
