//! Cookie jar abstraction and a simple in-memory implementation.
//!
//! The jar plays the role of the page's cookie store: responses write `Set-Cookie`
//! headers into it and the CSRF lookup reads the script-visible cookie string back out.
//!
//! ## Notes & limitations
//! - Cookies are bucketed by the **host** (or `Domain` attribute) that set them.
//!   Host-only cookies are only visible to that exact host. A `Domain` attribute must
//!   match the host of the response that sets it, otherwise the cookie is rejected.
//! - `Path`, `Domain`, `Secure` and `HttpOnly` are honoured; `Expires`, `Max-Age`
//!   and `SameSite` are ignored.
//! - Not internally synchronized, use it through a [`CookieJarHandle`](crate::cookies::CookieJarHandle).
use crate::cookies::{Cookie, CookieJarHandle};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use url::Url;

/// A cookie jar keeps the cookies visible to one page.
pub trait CookieJar: Send + Sync {
    /// Stores all `Set-Cookie` headers found in `headers`, received from `url`.
    ///
    /// Cookies with the same name in the same bucket are replaced (last write wins).
    fn store_response_cookies(&mut self, url: &Url, headers: &HeaderMap);

    /// Returns the script-visible cookie string for `url` (`"a=1; b=2"`), if any.
    ///
    /// `HttpOnly` cookies are never part of this string.
    fn get_request_cookies(&self, url: &Url) -> Option<String>;

    /// Stores a single cookie as if it was set while on `url`.
    fn set_cookie(&mut self, url: &Url, cookie: Cookie);

    /// Removes a single cookie with `cookie_name` visible to `url`.
    fn remove_cookie(&mut self, url: &Url, cookie_name: &str);

    /// Removes all cookies from the jar.
    fn clear(&mut self);
}

/// Default in-memory cookie jar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultCookieJar {
    /// Cookies bucketed by host or cookie domain.
    pub entries: HashMap<String, Vec<Cookie>>,
}

impl DefaultCookieJar {
    /// Creates an empty in-memory cookie jar.
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket_key(url: &Url, cookie: &Cookie) -> String {
        cookie
            .domain
            .clone()
            .unwrap_or_else(|| url.host_str().unwrap_or_default().to_ascii_lowercase())
    }
}

impl From<DefaultCookieJar> for CookieJarHandle {
    fn from(jar: DefaultCookieJar) -> Self {
        Arc::new(RwLock::new(jar))
    }
}

/// True when `host` is `domain` or one of its subdomains.
fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Host-only cookies are visible to the exact host that set them, domain cookies to
/// every host under their domain.
fn visible_to(host: &str, bucket: &str, cookie: &Cookie) -> bool {
    match cookie.domain {
        Some(_) => domain_matches(host, bucket),
        None => host == bucket,
    }
}

fn default_path(url: &Url) -> &str {
    url.path()
        .rsplit_once('/')
        .map_or("/", |(dir, _)| if dir.is_empty() { "/" } else { dir })
}

impl CookieJar for DefaultCookieJar {
    fn store_response_cookies(&mut self, url: &Url, headers: &HeaderMap) {
        let path = default_path(url);
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

        for header in headers.get_all(http::header::SET_COOKIE) {
            let Ok(header) = header.to_str() else {
                continue;
            };
            match Cookie::parse(header, path) {
                Some(cookie) => {
                    if let Some(domain) = cookie.domain.as_deref() {
                        if !domain_matches(&host, domain) {
                            log::warn!(
                                "Rejecting cookie {} from {url}: domain {domain} does not match",
                                cookie.name
                            );
                            continue;
                        }
                    }
                    self.set_cookie(url, cookie)
                }
                None => log::debug!("Ignoring malformed Set-Cookie header from {url}"),
            }
        }
    }

    fn get_request_cookies(&self, url: &Url) -> Option<String> {
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let host = host.as_str();

        let header = self
            .entries
            .iter()
            .flat_map(|(key, cookies)| {
                cookies
                    .iter()
                    .filter(move |cookie| visible_to(host, key, cookie))
            })
            .filter(|cookie| !cookie.http_only && cookie.matches(url))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");

        if header.is_empty() {
            None
        } else {
            Some(header)
        }
    }

    fn set_cookie(&mut self, url: &Url, cookie: Cookie) {
        let bucket = self.entries.entry(Self::bucket_key(url, &cookie)).or_default();

        if let Some(existing) = bucket.iter_mut().find(|c| c.name == cookie.name) {
            *existing = cookie;
        } else {
            bucket.push(cookie);
        }
    }

    fn remove_cookie(&mut self, url: &Url, cookie_name: &str) {
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        for (key, cookies) in self.entries.iter_mut() {
            cookies.retain(|c| c.name != cookie_name || !visible_to(&host, key, c));
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid URL")
    }

    #[test]
    fn stores_and_returns_response_cookies() {
        let mut jar = DefaultCookieJar::new();
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1; Path=/"));
        headers.append("set-cookie", HeaderValue::from_static("b=2; Path=/"));
        headers.append("set-cookie", HeaderValue::from_static("secret=x; Path=/; HttpOnly"));

        jar.store_response_cookies(&url("https://example.com/login"), &headers);

        let cookies = jar.get_request_cookies(&url("https://example.com/")).unwrap();
        assert!(cookies.contains("a=1"));
        assert!(cookies.contains("b=2"));
        assert!(!cookies.contains("secret"));
    }

    #[test]
    fn last_write_wins_per_name() {
        let mut jar = DefaultCookieJar::new();
        let u = url("https://example.com/");
        jar.set_cookie(&u, Cookie::new("a", "1"));
        jar.set_cookie(&u, Cookie::new("a", "2"));
        assert_eq!(jar.get_request_cookies(&u).as_deref(), Some("a=2"));
    }

    #[test]
    fn domain_cookies_are_visible_to_subdomains() {
        let mut jar = DefaultCookieJar::new();
        let mut cookie = Cookie::new("shared", "yes");
        cookie.domain = Some("example.com".into());
        jar.set_cookie(&url("https://example.com/"), cookie);

        assert_eq!(
            jar.get_request_cookies(&url("https://app.example.com/")).as_deref(),
            Some("shared=yes")
        );
        assert!(jar.get_request_cookies(&url("https://example.org/")).is_none());
    }

    #[test]
    fn default_path_is_directory_of_url() {
        let mut jar = DefaultCookieJar::new();
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("scoped=1"));
        jar.store_response_cookies(&url("https://example.com/admin/login"), &headers);

        assert!(jar.get_request_cookies(&url("https://example.com/admin/users")).is_some());
        assert!(jar.get_request_cookies(&url("https://example.com/public")).is_none());
    }

    #[test]
    fn remove_and_clear() {
        let mut jar = DefaultCookieJar::new();
        let u = url("https://example.com/");
        jar.set_cookie(&u, Cookie::new("a", "1"));
        jar.set_cookie(&u, Cookie::new("b", "2"));

        jar.remove_cookie(&u, "a");
        assert_eq!(jar.get_request_cookies(&u).as_deref(), Some("b=2"));

        jar.clear();
        assert!(jar.get_request_cookies(&u).is_none());
    }

    #[test]
    fn host_only_cookies_stay_on_their_host() {
        let mut jar = DefaultCookieJar::new();
        jar.set_cookie(&url("https://example.com/"), Cookie::new("t", "parent-host-only"));

        assert_eq!(
            jar.get_request_cookies(&url("https://example.com/")).as_deref(),
            Some("t=parent-host-only")
        );
        assert!(jar.get_request_cookies(&url("https://app.example.com/")).is_none());

        jar.remove_cookie(&url("https://app.example.com/"), "t");
        assert!(jar.get_request_cookies(&url("https://example.com/")).is_some());
    }

    #[test]
    fn foreign_domain_attribute_is_rejected() {
        let mut jar = DefaultCookieJar::new();
        let page = url("https://www.example.com/");
        jar.set_cookie(&page, Cookie::new("authenticity_token", "real"));

        let mut headers = HeaderMap::new();
        headers.append(
            "set-cookie",
            HeaderValue::from_static("authenticity_token=attacker; Domain=www.example.com; Path=/"),
        );
        jar.store_response_cookies(&url("https://evil.test/x"), &headers);

        assert_eq!(
            jar.get_request_cookies(&page).as_deref(),
            Some("authenticity_token=real")
        );
    }

    #[test]
    fn parent_domain_attribute_is_accepted() {
        let mut jar = DefaultCookieJar::new();
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("shared=1; Domain=example.com; Path=/"));
        jar.store_response_cookies(&url("https://login.example.com/"), &headers);

        assert_eq!(
            jar.get_request_cookies(&url("https://app.example.com/")).as_deref(),
            Some("shared=1")
        );
    }
}
