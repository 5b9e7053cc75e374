//! Cookie core types.
//!
//! [`CookieJarHandle`] is the shared, lock-protected handle a [`Page`](crate::page::Page)
//! keeps. Take a **read lock** to look cookies up and a **write lock** to store the
//! `Set-Cookie` headers of a response.
//!
//! ```rust
//! use gosub_request::cookies::Cookie;
//!
//! let c = Cookie::parse("csrf_token=abc%3D%3D; Path=/; Secure", "/").unwrap();
//! assert_eq!(c.name, "csrf_token");
//! assert_eq!(c.value, "abc%3D%3D");
//! assert!(c.secure);
//! ```

use crate::cookies::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use url::Url;

/// A handle to a cookie jar trait.
pub type CookieJarHandle = Arc<RwLock<dyn CookieJar + Send + Sync>>;

/// A cookie as stored in a jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value, still percent-encoded.
    pub value: String,

    /// Path scoping, defaults to the directory of the URL that set it.
    pub path: Option<String>,

    /// Domain scoping (host-only if `None`), stored without a leading dot.
    pub domain: Option<String>,

    /// If `true`, cookie is only visible to `https` URLs.
    pub secure: bool,

    /// If `true`, cookie is hidden from page scripts and therefore from CSRF lookups.
    pub http_only: bool,
}

impl Cookie {
    /// Creates a host-only session cookie at path `/`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: Some("/".to_string()),
            domain: None,
            secure: false,
            http_only: false,
        }
    }

    /// Parses a single `Set-Cookie` header value. Unknown attributes are ignored.
    pub fn parse(header: &str, default_path: &str) -> Option<Cookie> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name, value.trim());
        cookie.path = None;

        for attr in parts.map(str::trim) {
            match attr.split_once('=') {
                Some((k, v)) if k.trim().eq_ignore_ascii_case("path") => {
                    cookie.path = Some(v.trim().to_string());
                }
                Some((k, v)) if k.trim().eq_ignore_ascii_case("domain") => {
                    cookie.domain = Some(v.trim().trim_start_matches('.').to_ascii_lowercase());
                }
                None if attr.eq_ignore_ascii_case("secure") => cookie.secure = true,
                None if attr.eq_ignore_ascii_case("httponly") => cookie.http_only = true,
                _ => {}
            }
        }

        if cookie.path.is_none() {
            cookie.path = Some(default_path.to_string());
        }

        Some(cookie)
    }

    /// Returns true when this cookie would be sent to `url`.
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or_default();
        let domain_ok = match &self.domain {
            Some(domain) => host == domain || host.ends_with(&format!(".{domain}")),
            None => true,
        };
        let path_ok = match &self.path {
            Some(path) => url.path().starts_with(path.as_str()),
            None => true,
        };

        domain_ok && path_ok && (!self.secure || url.scheme() == "https")
    }
}
