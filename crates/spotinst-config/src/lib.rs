//! Configuration and credential management for the Spotinst SDK
//!
//! This crate holds everything the SDK needs to know before it can talk to
//! the Spotinst API:
//!
//! - [`Config`] with layered, last-non-empty-wins merging
//! - Credential material ([`credentials::Value`]) and the providers that
//!   discover it (static, environment, shared credentials file, chain)
//! - The shared credentials file (`~/.spotinst/credentials`) with
//!   environment variable expansion and optional OS keyring references
//! - Caller-side retry policy data ([`RetryConfig`])
//!
//! # Example
//!
//! ```rust
//! use spotinst_config::{Config, credentials::Value};
//!
//! let mut config = Config::defaults();
//! config.merge([&Config::new().with_credentials(Value::new("token", "act-123"))]);
//!
//! assert_eq!(config.base_url().unwrap().as_str(), "https://api.spotinst.io/");
//! assert_eq!(config.credentials.unwrap().account.as_deref(), Some("act-123"));
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod file;
pub mod resilience;
pub mod store;

// Re-export main types for convenience
pub use config::{Config, DEFAULT_BASE_URL, DEFAULT_CONTENT_TYPE, DEFAULT_USER_AGENT};
pub use credentials::{ChainProvider, EnvProvider, FileProvider, Provider, StaticProvider, Value};
pub use error::{ConfigError, Result};
pub use file::{CredentialsFile, FileProfile};
pub use resilience::RetryConfig;
pub use store::CredentialStore;
