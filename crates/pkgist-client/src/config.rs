//! Client configuration.
//!
//! Values resolve in priority order: built-in defaults, then environment
//! variables, then whatever the caller sets through the builder methods.

use crate::error::{ClientError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

/// Default Packagist base URL.
pub const PACKAGIST_URL: &str = "https://packagist.org";

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "pkgist/",
    env!("CARGO_PKG_VERSION"),
    " (+https://packagist.org; Packagist API client)"
);

/// Environment variables read by [`ClientConfig::from_env`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEnvVar {
    /// Registry base URL.
    BaseUrl,
    /// User agent override.
    UserAgent,
    /// User agent forwarded by a hosting web server.
    HttpUserAgent,
    /// Request timeout in seconds.
    Timeout,
}

impl ConfigEnvVar {
    /// Variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "PKGIST_BASE_URL",
            Self::UserAgent => "PKGIST_USER_AGENT",
            Self::HttpUserAgent => "HTTP_USER_AGENT",
            Self::Timeout => "PKGIST_TIMEOUT",
        }
    }
}

/// Packagist client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Registry base URL.
    pub base_url: Url,
    /// User agent.
    pub user_agent: String,
    /// Headers added to every request.
    pub headers: HeaderMap,
    /// Request timeout; `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(PACKAGIST_URL).expect("valid default URL"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HeaderMap::new(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with the process environment.
    ///
    /// # Errors
    /// Returns error if a variable holds an unusable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// # Errors
    /// Returns error if a value is unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |var: ConfigEnvVar| lookup(var.as_str()).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        if let Some(url) = get(ConfigEnvVar::BaseUrl) {
            config = config.with_base_url(&url)?;
        }

        if let Some(ua) = get(ConfigEnvVar::UserAgent).or_else(|| get(ConfigEnvVar::HttpUserAgent)) {
            config = config.with_user_agent(ua)?;
        }

        if let Some(secs) = get(ConfigEnvVar::Timeout) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "{} must be a number of seconds, got '{secs}'",
                    ConfigEnvVar::Timeout.as_str()
                ))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the registry base URL.
    ///
    /// # Errors
    /// Returns error if the URL does not parse or is not http(s).
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| ClientError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: url.to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        self.base_url = parsed;
        Ok(self)
    }

    /// Set the user agent.
    ///
    /// # Errors
    /// Returns error if the value cannot be sent as a header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Result<Self> {
        let user_agent = user_agent.into();
        HeaderValue::from_str(&user_agent).map_err(|e| {
            ClientError::Config(format!("invalid user agent '{}': {e}", user_agent.escape_debug()))
        })?;
        self.user_agent = user_agent;
        Ok(self)
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every request.
    ///
    /// # Errors
    /// Returns error if the name or value is not a valid header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::Config(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::Config(format!("invalid header value for {name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}
