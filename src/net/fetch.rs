use crate::config::TransportConfig;
use crate::errors::TransportError;
use crate::net::{Body, Response, Transport};
use crate::request::{FetchOptions, FormData, FormValue, RedirectMode, RequestBody};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use url::Url;

/// Production transport built on `reqwest`.
///
/// One client is kept per redirect mode since reqwest fixes the redirect policy at
/// client build time.
pub struct ReqwestTransport {
    config: TransportConfig,
    follow: reqwest::Client,
    manual: reqwest::Client,
    error: reqwest::Client,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let build = |policy: Policy| {
            reqwest::Client::builder()
                .user_agent(config.user_agent.as_str())
                .cookie_store(config.cookie_store)
                .redirect(policy)
                .build()
        };

        Ok(Self {
            follow: build(Policy::limited(config.max_redirects))?,
            manual: build(Policy::none())?,
            error: build(Policy::custom(|attempt| attempt.error("redirect mode is set to error")))?,
            config,
        })
    }

    fn client_for(&self, redirect: &RedirectMode) -> &reqwest::Client {
        match redirect {
            RedirectMode::Follow => &self.follow,
            RedirectMode::Manual => &self.manual,
            RedirectMode::Error => &self.error,
        }
    }

    /// Resolves `url` against the configured base URL when it is relative.
    fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.config.base_url {
                Some(base) => base
                    .join(url)
                    .map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}"))),
                None => Err(TransportError::InvalidUrl(format!("{url}: relative URL without a base"))),
            },
            Err(e) => Err(TransportError::InvalidUrl(format!("{url}: {e}"))),
        }
    }
}

fn multipart_form(form: &FormData) -> Result<Form, TransportError> {
    let mut multipart = Form::new();
    for (name, value) in form.entries() {
        multipart = match value {
            FormValue::Text(text) => multipart.text(name.clone(), text.clone()),
            FormValue::File(file) => {
                let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
                if !file.content_type.is_empty() {
                    part = part.mime_str(&file.content_type)?;
                }
                multipart.part(name.clone(), part)
            }
        };
    }
    Ok(multipart)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Response, TransportError> {
        let url = self.resolve(url)?;
        let method = reqwest::Method::from_bytes(options.method.as_bytes())
            .map_err(|_| TransportError::Other(format!("invalid HTTP method {}", options.method)))?;

        let mut request = self
            .client_for(&options.redirect)
            .request(method, url.clone())
            .headers(options.headers.clone());

        request = match &options.body {
            None => request,
            Some(RequestBody::Text(text)) => request.body(text.clone()),
            Some(RequestBody::Json(value)) => request.body(value.to_string()),
            Some(RequestBody::File(file)) => request.body(file.bytes.clone()),
            Some(RequestBody::FormData(form)) => request.multipart(multipart_form(form)?),
        };

        let send = request.send();
        let res = match &options.signal {
            Some(signal) => tokio::select! {
                biased;
                _ = signal.cancelled() => return Err(TransportError::Canceled),
                res = send => res?,
            },
            None => send.await?,
        };

        let final_url = res.url().clone();
        let status = res.status().as_u16();
        let status_text = res.status().canonical_reason().unwrap_or("Unknown").to_string();
        let headers = res.headers().clone();
        let redirected = final_url != url;

        log::debug!("{} {} -> {}", options.method, url, status);

        // The body stays on the wire until someone asks for it
        let body = Body::Pending(Box::pin(async move {
            res.bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(TransportError::from)
        }));

        Ok(Response {
            url: Some(final_url),
            status,
            status_text,
            redirected,
            headers,
            body,
        })
    }
}
