//! Verb helpers: build a [`FetchRequest`] and perform it once.
//!
//! ```no_run
//! use gosub_request::context::FetchContext;
//! use gosub_request::request::{QuerySource, RequestOptions};
//! use gosub_request::verbs;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = FetchContext::new()?;
//! let options = RequestOptions {
//!     response_kind: "json".into(),
//!     query: Some(QuerySource::entries([("page", 2)])),
//!     ..Default::default()
//! };
//! let response = verbs::get(&ctx, "https://example.com/posts", options).await?;
//! println!("{}", response.json().await?);
//! # Ok(())
//! # }
//! ```

use crate::context::FetchContext;
use crate::errors::FetchError;
use crate::request::{FetchRequest, RequestOptions};
use crate::response::FetchResponse;

async fn perform(
    context: &FetchContext,
    method: &str,
    url: &str,
    options: RequestOptions,
) -> Result<FetchResponse, FetchError> {
    FetchRequest::new(method, url, options).perform(context).await
}

pub async fn get(
    context: &FetchContext,
    url: impl AsRef<str>,
    options: RequestOptions,
) -> Result<FetchResponse, FetchError> {
    perform(context, "get", url.as_ref(), options).await
}

pub async fn post(
    context: &FetchContext,
    url: impl AsRef<str>,
    options: RequestOptions,
) -> Result<FetchResponse, FetchError> {
    perform(context, "post", url.as_ref(), options).await
}

pub async fn put(
    context: &FetchContext,
    url: impl AsRef<str>,
    options: RequestOptions,
) -> Result<FetchResponse, FetchError> {
    perform(context, "put", url.as_ref(), options).await
}

pub async fn patch(
    context: &FetchContext,
    url: impl AsRef<str>,
    options: RequestOptions,
) -> Result<FetchResponse, FetchError> {
    perform(context, "patch", url.as_ref(), options).await
}

/// Sends a `DELETE` request.
pub async fn destroy(
    context: &FetchContext,
    url: impl AsRef<str>,
    options: RequestOptions,
) -> Result<FetchResponse, FetchError> {
    perform(context, "delete", url.as_ref(), options).await
}
