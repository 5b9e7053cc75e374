//! Minimal HTTP response model.
//!
//! This struct represents the response handed back by a [`Transport`](crate::net::Transport)
//! before any interpretation. It carries the final URL (after redirects, if the transport
//! follows them), status code + reason, response headers, and a body that is read lazily.
//!
//! ## Notes
//! - The body can be read **once**. [`FetchResponse`](crate::response::FetchResponse) takes
//!   it and caches what it read, so callers never see it twice.
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for header names.
//! - `status_text` is derived from the status code's canonical reason phrase and may be
//!   `"Unknown"` for non-standard codes.
//!
use crate::errors::TransportError;
use futures::future::BoxFuture;
use http::header::IntoHeaderName;
use http::{HeaderMap, HeaderValue, StatusCode};

/// Response body as produced by the transport.
pub enum Body {
    /// Body already in memory.
    Bytes(Vec<u8>),
    /// Body still on the wire; resolves when the whole body has been received.
    Pending(BoxFuture<'static, Result<Vec<u8>, TransportError>>),
}

impl Default for Body {
    fn default() -> Self {
        Body::Bytes(Vec::new())
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Bytes(bytes) => write!(f, "Body::Bytes({} bytes)", bytes.len()),
            Body::Pending(_) => write!(f, "Body::Pending"),
        }
    }
}

impl Body {
    /// Reads the whole body.
    pub async fn read(self) -> Result<Vec<u8>, TransportError> {
        match self {
            Body::Bytes(bytes) => Ok(bytes),
            Body::Pending(fut) => fut.await,
        }
    }
}

/// Simple structure for HTTP responses.
///
/// All fields reflect the **received** response as-is; no additional parsing
/// or transformation is performed by this type.
#[derive(Debug, Default)]
pub struct Response {
    /// Final URL of the response (after redirects, if any), when the transport knows it.
    pub url: Option<url::Url>,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status: u16,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    pub status_text: String,

    /// True when the transport followed at least one redirect.
    pub redirected: bool,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Response body.
    pub body: Body,
}

impl Response {
    /// Creates an empty response with the given status.
    pub fn new(status: u16) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            status,
            status_text,
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: url::Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    /// Appends a header. Repeated calls with the same name keep every value.
    pub fn with_header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    /// True for any 2xx status.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
