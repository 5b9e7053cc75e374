use http::HeaderMap;
use std::fmt::{Display, Formatter};
use tokio_util::sync::CancellationToken;

/// A file-like body or form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub name: String,
    /// Declared media type, may be empty.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl File {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(File),
}

/// Ordered multipart form entries. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.entries.push((name.into(), FormValue::Text(value.to_string())));
        self
    }

    pub fn append_file(&mut self, name: impl Into<String>, file: File) -> &mut Self {
        self.entries.push((name.into(), FormValue::File(file)));
        self
    }

    pub fn entries(&self) -> &[(String, FormValue)] {
        &self.entries
    }

    /// Text entries only; file entries are skipped.
    pub fn string_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(name, value)| match value {
            FormValue::Text(text) => Some((name.as_str(), text.as_str())),
            FormValue::File(_) => None,
        })
    }
}

/// Request body as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    /// Structured data, JSON-encoded when the request's content type is `application/json`.
    Json(serde_json::Value),
    File(File),
    FormData(FormData),
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<File> for RequestBody {
    fn from(file: File) -> Self {
        RequestBody::File(file)
    }
}

impl From<FormData> for RequestBody {
    fn from(form: FormData) -> Self {
        RequestBody::FormData(form)
    }
}

/// What kind of response the caller expects. Drives the `Accept` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseKind {
    #[default]
    Html,
    Json,
    TurboStream,
    Other(String),
}

impl ResponseKind {
    pub fn accept(&self) -> &'static str {
        match self {
            ResponseKind::Html => "text/html, application/xhtml+xml",
            ResponseKind::TurboStream => "text/vnd.turbo-stream.html, text/html, application/xhtml+xml",
            ResponseKind::Json => "application/json, application/vnd.api+json",
            ResponseKind::Other(_) => "*/*",
        }
    }
}

impl From<&str> for ResponseKind {
    fn from(kind: &str) -> Self {
        match kind {
            "html" => ResponseKind::Html,
            "json" => ResponseKind::Json,
            "turbo-stream" => ResponseKind::TurboStream,
            other => ResponseKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedirectMode {
    #[default]
    Follow,
    Error,
    Manual,
}

impl Display for RedirectMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectMode::Follow => write!(f, "follow"),
            RedirectMode::Error => write!(f, "error"),
            RedirectMode::Manual => write!(f, "manual"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Credentials {
    Omit,
    #[default]
    SameOrigin,
    Include,
}

impl Display for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Omit => write!(f, "omit"),
            Credentials::SameOrigin => write!(f, "same-origin"),
            Credentials::Include => write!(f, "include"),
        }
    }
}

/// Query data merged into the request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// Plain name/value mapping.
    Entries(Vec<(String, String)>),
    /// Form entries; only text values end up in the query.
    FormData(FormData),
    /// An URL query string such as `a[]=1&a[]=2`, a leading `?` is ignored.
    SearchParams(String),
}

impl QuerySource {
    pub fn entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        QuerySource::Entries(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }

    pub fn search_params(query: impl Into<String>) -> Self {
        QuerySource::SearchParams(query.into())
    }

    /// Normalizes any source shape into ordered name/value pairs.
    pub(crate) fn pairs(&self) -> Vec<(String, String)> {
        match self {
            QuerySource::Entries(entries) => entries.clone(),
            QuerySource::FormData(form) => form
                .string_entries()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            QuerySource::SearchParams(query) => {
                url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                    .into_owned()
                    .collect()
            }
        }
    }
}

impl From<FormData> for QuerySource {
    fn from(form: FormData) -> Self {
        QuerySource::FormData(form)
    }
}

/// Caller configuration for a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: Option<RequestBody>,
    /// Explicit `Content-Type`, wins over the inferred one.
    pub content_type: Option<String>,
    pub response_kind: ResponseKind,
    pub query: Option<QuerySource>,
    /// Additional headers, applied last. Names are matched case-insensitively.
    pub headers: Vec<(String, String)>,
    /// Handed to the transport untouched.
    pub signal: Option<CancellationToken>,
    pub redirect: Option<RedirectMode>,
    /// Accepted for compatibility; requests always use `same-origin`.
    pub credentials: Option<Credentials>,
}

/// Options handed to the transport, derived from a [`FetchRequest`](crate::request::FetchRequest).
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub method: String,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub signal: Option<CancellationToken>,
    pub credentials: Credentials,
    pub redirect: RedirectMode,
}
