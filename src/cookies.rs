//! Cookies visible to the page: [`CookieJar`], [`DefaultCookieJar`] and [`Cookie`].

mod cookie_jar;
mod cookies;

pub use cookie_jar::CookieJar;
pub use cookie_jar::DefaultCookieJar;

pub use cookies::Cookie;
pub use cookies::CookieJarHandle;
