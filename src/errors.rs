use http::header::{InvalidHeaderName, InvalidHeaderValue};

/// Errors returned while building, performing or reading a request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// A body accessor was used on a response with a different content type.
    #[error("Expected {expected} response but got \"{actual}\" instead")]
    ContentMismatch {
        expected: &'static str,
        actual: String,
    },

    /// The server answered 401 with a `WWW-Authenticate` location. The page has already been
    /// sent there; the value is the bare URL.
    #[error("{0}")]
    AuthenticationRequired(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response body already consumed")]
    BodyConsumed,
}

impl FetchError {
    /// Returns the authentication URL when this is the 401 redirect rejection.
    pub fn authentication_url(&self) -> Option<&str> {
        match self {
            FetchError::AuthenticationRequired(url) => Some(url),
            _ => None,
        }
    }
}

/// Errors produced by a [`Transport`](crate::net::Transport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request canceled")]
    Canceled,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Net(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}
