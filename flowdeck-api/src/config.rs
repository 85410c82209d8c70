//! HTTP client configuration

use crate::error::Result;
use std::time::Duration;
use url::Url;

/// Default API root, matching the development server
pub const DEFAULT_BASE_URL: &str = "http://localhost:5005/api/";

/// Requests are abandoned after this long
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`crate::ApiClient`]
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// API root. Always stored with a trailing slash so joined paths stay
    /// under it.
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl HttpConfig {
    /// Create a configuration for the given API root
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut raw = base_url.as_ref().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&raw)?,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("flowdeck/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL).expect("default base URL parses")
    }
}
