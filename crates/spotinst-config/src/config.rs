//! Layered SDK configuration
//!
//! A [`Config`] is a set of optional settings. Configs are combined with
//! [`Config::merge`]: layers are applied left to right and, for every field, a
//! non-empty value in a later layer replaces the current one. Unset (`None`)
//! and empty-string values never override anything, so a field is missing
//! from a merged config only if no layer ever set it.
//!
//! The usual stack is `Config::defaults()` < session-wide settings < per-call
//! overrides.

use std::time::Duration;

use url::Url;

use super::credentials::Value;
use super::error::{ConfigError, Result};
use super::resilience::RetryConfig;

/// Default Spotinst API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.spotinst.io";

/// Default content type for request bodies
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// User agent string sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("spotinst-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// SDK configuration layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// API endpoint
    pub base_url: Option<Url>,
    /// Credential material (token and account)
    pub credentials: Option<Value>,
    /// HTTP timeout applied by the transport
    pub timeout: Option<Duration>,
    /// User agent header value
    pub user_agent: Option<String>,
    /// Content type header value for request bodies
    pub content_type: Option<String>,
    /// Retry policy for callers that opt into retries
    pub retry: Option<RetryConfig>,
}

impl Config {
    /// Create an empty configuration layer (every field unset)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The SDK defaults: endpoint, user agent and content type. No credentials.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).ok(),
            credentials: None,
            timeout: None,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            content_type: Some(DEFAULT_CONTENT_TYPE.to_string()),
            retry: None,
        }
    }

    /// Build a config by merging `layers` onto an empty config
    #[must_use]
    pub fn merged<'a>(layers: impl IntoIterator<Item = &'a Config>) -> Self {
        let mut config = Self::new();
        config.merge(layers);
        config
    }

    /// Apply `others` left to right, last non-empty value wins per field
    pub fn merge<'a>(&mut self, others: impl IntoIterator<Item = &'a Config>) {
        for other in others {
            if let Some(url) = &other.base_url
                && !url.as_str().is_empty()
            {
                self.base_url = Some(url.clone());
            }

            if let Some(creds) = &other.credentials {
                match &mut self.credentials {
                    Some(current) => current.overlay(creds),
                    None if !creds.is_empty() => self.credentials = Some(creds.clone()),
                    None => {}
                }
            }

            if other.timeout.is_some() {
                self.timeout = other.timeout;
            }

            merge_string(&mut self.user_agent, &other.user_agent);
            merge_string(&mut self.content_type, &other.content_type);

            if other.retry.is_some() {
                self.retry = other.retry.clone();
            }
        }
    }

    /// Set the API endpoint from a string
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        self.base_url = Some(parsed);
        Ok(self)
    }

    /// Set credential material
    #[must_use]
    pub fn with_credentials(mut self, credentials: Value) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the HTTP timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the request content type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the caller-side retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// The configured endpoint, if any
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// The configured API token, if any
    pub fn token(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .and_then(|c| c.token.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// The configured account ID, if any
    pub fn account(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .and_then(|c| c.account.as_deref())
            .filter(|a| !a.is_empty())
    }

    /// Check the settings every request needs
    ///
    /// Merging never validates; this is called by the client right before a
    /// request is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_none() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.token().is_none() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(())
    }
}

fn merge_string(current: &mut Option<String>, other: &Option<String>) {
    if let Some(value) = other
        && !value.is_empty()
    {
        *current = Some(value.clone());
    }
}
