//! Shared, immutable connection settings
//!
//! A [`Session`] resolves configuration once and is then shared (cheaply
//! cloned) by every handler built from it. Construction:
//!
//! 1. merges `Config::defaults()` with the caller's layers
//! 2. if no token was configured, runs credential discovery once
//!    (environment, then the shared credentials file, or a custom provider)
//! 3. builds the HTTP connection pool used by all requests
//!
//! Credentials are never re-resolved; build a new session to rotate them.
//!
//! ```rust,no_run
//! use spotinst_sdk::{Config, Session, Value};
//!
//! # fn main() -> spotinst_sdk::Result<()> {
//! let session = Session::builder()
//!     .config(Config::new().with_credentials(Value::new("my-token", "act-12345678")))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use spotinst_config::{ChainProvider, Config, Provider};
use tracing::{debug, info};

use crate::error::Result;

/// Resolved configuration plus the shared HTTP transport
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    config: Config,
    http: reqwest::Client,
}

impl Session {
    /// Build a session from configuration layers, with default discovery
    pub fn new<'a>(layers: impl IntoIterator<Item = &'a Config>) -> Result<Self> {
        let mut builder = Self::builder();
        for layer in layers {
            builder = builder.config(layer.clone());
        }
        builder.build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// The fully merged configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}

/// Builder for [`Session`]
#[derive(Default)]
pub struct SessionBuilder {
    layers: Vec<Config>,
    provider: Option<Box<dyn Provider>>,
    http: Option<reqwest::Client>,
    skip_discovery: bool,
}

impl SessionBuilder {
    /// Add a configuration layer; later layers win
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.layers.push(config);
        self
    }

    /// Discover credentials with `provider` instead of the default chain
    #[must_use]
    pub fn provider(mut self, provider: impl Provider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Use a preconfigured HTTP client (proxies, custom TLS roots, ...)
    ///
    /// The config's timeout is not applied to a caller-supplied client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Only use credentials from the configuration layers
    #[must_use]
    pub fn without_discovery(mut self) -> Self {
        self.skip_discovery = true;
        self
    }

    pub fn build(self) -> Result<Session> {
        let mut config = Config::defaults();
        config.merge(&self.layers);

        if config.token().is_none() && !self.skip_discovery {
            let provider = self
                .provider
                .unwrap_or_else(|| Box::new(ChainProvider::default_chain()));
            debug!("No token configured, discovering credentials via {}", provider.name());

            match provider.retrieve() {
                Ok(discovered) => {
                    info!("Using credentials from {}", discovered.provider);
                    let mut credentials = config.credentials.take().unwrap_or_default();
                    credentials.merge(&discovered);
                    credentials.provider = discovered.provider;
                    config.credentials = Some(credentials);
                }
                // Missing credentials are reported when a request is attempted
                Err(e) => debug!("Credential discovery failed: {}", e),
            }
        }

        let http = match self.http {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = config.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        debug!(
            base_url = config.base_url().map(|u| u.as_str()),
            has_token = config.token().is_some(),
            account = config.account(),
            "Session created"
        );

        Ok(Session {
            inner: Arc::new(SessionInner { config, http }),
        })
    }
}
