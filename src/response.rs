//! Interpreted view over a transport [`Response`].
//!
//! [`FetchResponse`] answers the questions callers ask about a response (status
//! predicates, the auth redirect location, the media type) and reads the body at most
//! once. Every body accessor is idempotent: the first read caches its result and later
//! calls hand back the cached value.

use crate::errors::FetchError;
use crate::net::{Body, Response};
use crate::render::StreamRendererHandle;
use http::header::{CONTENT_TYPE, WWW_AUTHENTICATE};
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use tokio::sync::OnceCell;
use url::Url;

const TURBO_STREAM: &str = "text/vnd.turbo-stream.html";

fn is_html(content_type: &str) -> bool {
    matches!(
        content_type.split_once('/'),
        Some(("application" | "text", "html" | "xhtml+xml"))
    )
}

fn is_json(content_type: &str) -> bool {
    content_type.starts_with("application/json") || content_type == "application/vnd.api+json"
}

pub struct FetchResponse {
    url: Option<Url>,
    status: u16,
    status_text: String,
    redirected: bool,
    headers: HeaderMap,
    body: Mutex<Option<Body>>,
    bytes: OnceCell<Vec<u8>>,
    text: OnceCell<String>,
    json: OnceCell<Value>,
    stream_renderer: Option<StreamRendererHandle>,
}

impl std::fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchResponse")
            .field("url", &self.url)
            .field("status", &self.status)
            .field("redirected", &self.redirected)
            .field("content_type", &self.content_type())
            .field("body_read", &self.bytes.initialized())
            .finish_non_exhaustive()
    }
}

impl FetchResponse {
    pub fn new(mut response: Response) -> Self {
        let body = std::mem::take(&mut response.body);

        Self {
            url: response.url,
            status: response.status,
            status_text: response.status_text,
            redirected: response.redirected,
            headers: response.headers,
            body: Mutex::new(Some(body)),
            bytes: OnceCell::new(),
            text: OnceCell::new(),
            json: OnceCell::new(),
            stream_renderer: None,
        }
    }

    /// Sets the renderer used by [`render_turbo_stream`](Self::render_turbo_stream).
    pub fn with_stream_renderer(mut self, renderer: Option<StreamRendererHandle>) -> Self {
        self.stream_renderer = renderer;
        self
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn redirected(&self) -> bool {
        self.redirected
    }

    pub fn unauthenticated(&self) -> bool {
        self.status == 401
    }

    pub fn unprocessable_entity(&self) -> bool {
        self.status == 422
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Value of `WWW-Authenticate`, used as the login location on 401 responses.
    pub fn authentication_url(&self) -> Option<&str> {
        self.headers
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }

    /// Media type without parameters, empty when the header is missing.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .unwrap_or_default()
    }

    pub fn is_turbo_stream(&self) -> bool {
        self.content_type() == TURBO_STREAM
    }

    pub fn is_html(&self) -> bool {
        is_html(self.content_type())
    }

    pub fn is_json(&self) -> bool {
        is_json(self.content_type())
    }

    async fn bytes(&self) -> Result<&[u8], FetchError> {
        let bytes = self
            .bytes
            .get_or_try_init(|| async {
                let body = self.body.lock().unwrap_or_else(PoisonError::into_inner).take();
                match body {
                    Some(body) => body.read().await.map_err(FetchError::from),
                    None => Err(FetchError::BodyConsumed),
                }
            })
            .await?;

        Ok(bytes.as_slice())
    }

    /// Body as text, whatever the content type.
    pub async fn text(&self) -> Result<&str, FetchError> {
        let text = self
            .text
            .get_or_try_init(|| async {
                self.bytes()
                    .await
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            })
            .await?;

        Ok(text.as_str())
    }

    /// Body as text, only for HTML and XHTML responses.
    pub async fn html(&self) -> Result<&str, FetchError> {
        if !self.is_html() {
            return Err(FetchError::ContentMismatch {
                expected: "an HTML",
                actual: self.content_type().to_string(),
            });
        }
        self.text().await
    }

    /// Parsed JSON body, only for JSON responses.
    pub async fn json(&self) -> Result<&Value, FetchError> {
        if !self.is_json() {
            return Err(FetchError::ContentMismatch {
                expected: "a JSON",
                actual: self.content_type().to_string(),
            });
        }

        self.json
            .get_or_try_init(|| async {
                match self.text().await {
                    Ok(text) => serde_json::from_str::<Value>(text).map_err(FetchError::from),
                    Err(e) => Err(e),
                }
            })
            .await
    }

    /// Deserializes the JSON body into `T`.
    pub async fn json_as<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        let value = self.json().await?;
        Ok(T::deserialize(value)?)
    }

    /// Reads the body and hands it to the stream renderer. Without a renderer only a
    /// warning is logged.
    pub async fn render_turbo_stream(&self) -> Result<(), FetchError> {
        if !self.is_turbo_stream() {
            return Err(FetchError::ContentMismatch {
                expected: "a Turbo Stream",
                actual: self.content_type().to_string(),
            });
        }

        let markup = self.text().await?;

        match self.stream_renderer.as_ref() {
            Some(renderer) => renderer.render_stream_message(markup),
            None => log::warn!(
                "You must set a stream renderer to render turbo stream responses ({} {})",
                self.status,
                self.url.as_ref().map(Url::as_str).unwrap_or_default()
            ),
        }
        Ok(())
    }
}

impl From<Response> for FetchResponse {
    fn from(response: Response) -> Self {
        Self::new(response)
    }
}
