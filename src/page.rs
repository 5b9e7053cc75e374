//! The page a request is made from.
//!
//! A [`Page`] stands in for the browsing environment: it knows its current location,
//! the `<meta>` values rendered into its head (`csrf-param`, `csrf-token`) and the
//! cookie store scripts can read. It also owns navigation, so an authentication
//! redirect can move it elsewhere through the [`Navigator`] trait.

use crate::cookies::{CookieJarHandle, DefaultCookieJar};
use http::HeaderMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use url::Url;

/// Characters a URI component keeps unescaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Performs a full-page navigation.
///
/// Invoked when a request comes back `401 Unauthorized` with a `WWW-Authenticate`
/// location. Applications that want a different policy can supply their own.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, url: &str);
}

/// Page-level state consulted while building requests.
pub struct Page {
    location: RwLock<Option<Url>>,
    meta: HashMap<String, String>,
    cookie_jar: CookieJarHandle,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("location", &self.location())
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Creates a page without location, meta tags or cookies.
    pub fn new() -> Self {
        Self {
            location: RwLock::new(None),
            meta: HashMap::new(),
            cookie_jar: DefaultCookieJar::new().into(),
        }
    }

    pub fn with_location(self, location: Url) -> Self {
        Self {
            location: RwLock::new(Some(location)),
            ..self
        }
    }

    /// Adds a `<meta name=".." content="..">` value.
    pub fn with_meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta.insert(name.into(), content.into());
        self
    }

    pub fn with_cookie_jar(self, cookie_jar: CookieJarHandle) -> Self {
        Self { cookie_jar, ..self }
    }

    /// Current location of the page.
    pub fn location(&self) -> Option<Url> {
        self.location
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hostname of the current location.
    pub fn hostname(&self) -> Option<String> {
        self.location()
            .and_then(|url| url.host_str().map(str::to_string))
    }

    /// Content of the named `<meta>` tag.
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    pub fn cookie_jar(&self) -> CookieJarHandle {
        self.cookie_jar.clone()
    }

    /// Reads a script-visible cookie for the current location.
    ///
    /// The name is matched in its percent-encoded form and the value is percent-decoded;
    /// an empty value counts as no cookie.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let location = self.location()?;
        let cookies = self
            .cookie_jar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_request_cookies(&location)?;

        let prefix = format!("{}=", utf8_percent_encode(name, URI_COMPONENT));
        let value = cookies
            .split("; ")
            .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))?;

        if value.is_empty() {
            return None;
        }
        Some(percent_decode_str(value).decode_utf8_lossy().into_owned())
    }

    /// CSRF token: the cookie named by the `csrf-param` meta tag, falling back to the
    /// `csrf-token` meta tag.
    pub fn csrf_token(&self) -> Option<String> {
        self.meta_content("csrf-param")
            .and_then(|param| self.cookie(param))
            .or_else(|| self.meta_content("csrf-token").map(str::to_string))
    }

    /// Stores the `Set-Cookie` headers of a response received from `url`, or from the
    /// current location when the response carries no URL.
    pub(crate) fn store_response_cookies(&self, url: Option<&Url>, headers: &HeaderMap) {
        if !headers.contains_key(http::header::SET_COOKIE) {
            return;
        }

        let Some(url) = url.cloned().or_else(|| self.location()) else {
            log::debug!("Dropping response cookies, no URL to scope them to");
            return;
        };

        self.cookie_jar
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .store_response_cookies(&url, headers);
    }
}

impl Navigator for Page {
    fn navigate_to(&self, url: &str) {
        let mut location = self.location.write().unwrap_or_else(PoisonError::into_inner);

        let target = match location.as_ref() {
            Some(current) => current.join(url),
            None => Url::parse(url),
        };

        match target {
            Ok(target) => {
                log::info!("Page: navigating to {target}");
                *location = Some(target);
            }
            Err(e) => log::error!("Page: Cannot parse URL {url}: {e}"),
        }
    }
}
