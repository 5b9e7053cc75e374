use url::Url;

const DEFAULT_USER_AGENT: &str = "Gosub/1.0 (X11; Linux x86_64) GosubRequest/1.0";

/// Configuration for the reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Maximum number of redirects followed when the redirect mode is `follow`
    pub max_redirects: usize,
    /// Relative request URLs are resolved against this URL
    pub base_url: Option<Url>,
    /// Keep cookies between requests sent through the same transport
    pub cookie_store: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
            base_url: None,
            cookie_store: true,
        }
    }
}
