use crate::context::FetchContext;
use crate::errors::FetchError;
use crate::page::Page;
use crate::request::options::{
    Credentials, FetchOptions, RedirectMode, RequestBody, RequestOptions, ResponseKind,
};
use crate::request::query::{split_url, QueryParams};
use crate::response::FetchResponse;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;
use url::Url;

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
const X_CSRF_TOKEN: HeaderName = HeaderName::from_static("x-csrf-token");

/// A single request: verb, URL and caller options.
///
/// Nothing is derived at construction. Method, headers, URL and body are computed from
/// the stored values every time they are asked for, so [`add_header`](Self::add_header)
/// (or an interceptor) is reflected in everything derived afterwards.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    method: String,
    original_url: String,
    options: RequestOptions,
}

impl FetchRequest {
    /// Creates a request. Neither the method nor the URL is validated here.
    pub fn new(method: impl Into<String>, url: impl AsRef<str>, options: RequestOptions) -> Self {
        Self {
            method: method.into(),
            original_url: url.as_ref().to_string(),
            options,
        }
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Uppercased HTTP method. Any token is accepted.
    pub fn method(&self) -> String {
        self.method.to_uppercase()
    }

    /// Adds or replaces one additional header.
    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self
            .options
            .headers
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.options.headers.push((key, value)),
        }
    }

    pub fn additional_headers(&self) -> &[(String, String)] {
        &self.options.headers
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.options.body.as_ref()
    }

    pub fn response_kind(&self) -> &ResponseKind {
        &self.options.response_kind
    }

    pub fn signal(&self) -> Option<&CancellationToken> {
        self.options.signal.as_ref()
    }

    pub fn redirect(&self) -> RedirectMode {
        self.options.redirect.unwrap_or_default()
    }

    /// Always `same-origin`; a caller supplied value is ignored.
    pub fn credentials(&self) -> Credentials {
        Credentials::SameOrigin
    }

    /// Inferred `Content-Type`, before additional headers are applied.
    pub fn content_type(&self) -> Option<&str> {
        if let Some(content_type) = self.options.content_type.as_deref() {
            return Some(content_type);
        }

        match self.body() {
            None | Some(RequestBody::FormData(_)) => None,
            Some(RequestBody::File(file)) => Some(file.content_type.as_str()),
            Some(_) => Some("application/json"),
        }
    }

    pub fn accept(&self) -> &'static str {
        self.options.response_kind.accept()
    }

    /// True when the CSRF token may be sent to the target URL.
    ///
    /// Relative and unparseable URLs count as same-origin.
    pub fn same_hostname(&self, page: &Page) -> bool {
        match Url::parse(&self.original_url) {
            Ok(url) => match url.host_str() {
                Some(host) => page.hostname().as_deref() == Some(host),
                None => true,
            },
            Err(_) => true,
        }
    }

    /// Headers for the transport.
    ///
    /// Base headers first, then the CSRF token for same-hostname targets, then the
    /// additional headers which may overwrite either.
    pub fn headers(&self, page: &Page) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
        if let Some(content_type) = self.content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        }
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept()));

        if self.same_hostname(page) {
            if let Some(token) = page.csrf_token() {
                headers.insert(X_CSRF_TOKEN, HeaderValue::from_str(&token)?);
            }
        }

        for (name, value) in &self.options.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        Ok(headers)
    }

    /// `Content-Type` as it will be sent, additional headers included.
    fn effective_content_type(&self) -> Option<&str> {
        self.options
            .headers
            .iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
            .map(|(_, value)| value.as_str())
            .or_else(|| self.content_type())
    }

    /// Merged query string including the leading `?`, or empty.
    pub fn query(&self) -> String {
        let (_, original_query) = split_url(&self.original_url);
        let mut params = QueryParams::parse(original_query);

        if let Some(query) = &self.options.query {
            params.merge(query.pairs());
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.serialize())
        }
    }

    /// Final URL: original path, merged query, no fragment.
    pub fn url(&self) -> String {
        let (path, _) = split_url(&self.original_url);
        format!("{path}{}", self.query())
    }

    /// Body as sent: structured data is JSON-encoded when the content type is
    /// `application/json`, anything else passes through.
    pub fn formatted_body(&self) -> Option<RequestBody> {
        let body = self.body()?;

        match body {
            RequestBody::Json(value) if self.effective_content_type() == Some("application/json") => {
                Some(RequestBody::Text(value.to_string()))
            }
            _ => Some(body.clone()),
        }
    }

    pub fn fetch_options(&self, page: &Page) -> Result<FetchOptions, FetchError> {
        Ok(FetchOptions {
            method: self.method(),
            headers: self.headers(page)?,
            body: self.formatted_body(),
            signal: self.options.signal.clone(),
            credentials: self.credentials(),
            redirect: self.redirect(),
        })
    }

    /// Runs the request through `context`.
    ///
    /// A failing interceptor is logged and ignored. A 401 carrying a `WWW-Authenticate`
    /// location navigates there and fails with [`FetchError::AuthenticationRequired`].
    /// Turbo stream responses to successful or 422 requests are rendered before returning.
    pub async fn perform(&mut self, context: &FetchContext) -> Result<FetchResponse, FetchError> {
        if let Some(interceptor) = context.interceptors().get() {
            if let Err(e) = interceptor.intercept(self).await {
                log::error!("Request interceptor failed for {}: {e:#}", self.original_url);
            }
        }

        let url = self.url();
        let options = self.fetch_options(context.page())?;
        log::debug!("Performing {} {}", options.method, url);

        let raw = context.transport().fetch(&url, &options).await?;
        context
            .page()
            .store_response_cookies(raw.url.as_ref(), &raw.headers);

        let response = FetchResponse::new(raw).with_stream_renderer(context.stream_renderer());

        if response.unauthenticated() {
            if let Some(location) = response.authentication_url() {
                let location = location.to_string();
                log::info!("Authentication required, redirecting to {location}");
                context.navigator().navigate_to(&location);
                return Err(FetchError::AuthenticationRequired(location));
            }
        }

        let renderable = response.ok() || response.unprocessable_entity();
        if renderable && response.is_turbo_stream() {
            response.render_turbo_stream().await?;
        }

        Ok(response)
    }
}
