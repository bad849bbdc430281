//! Error types for configuration and credential operations

use thiserror::Error;

/// Errors that can occur while building configuration or resolving credentials
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load credentials file {path}: {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save credentials file {path}: {source}")]
    SaveError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize credentials file: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("No API endpoint configured")]
    MissingEndpoint,

    #[error("No credentials configured. Set SPOTINST_TOKEN or add a profile to the credentials file.")]
    MissingCredentials,

    #[error("{provider}: credentials not found ({reason})")]
    CredentialsNotFound {
        provider: &'static str,
        reason: String,
    },

    #[error("No valid credential providers found in chain: {}", .errors.join("; "))]
    NoValidProvidersInChain { errors: Vec<String> },

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("Invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to resolve credential: {0}")]
    CredentialError(String),

    #[cfg(feature = "secure-storage")]
    #[error("Keyring error: {0}")]
    KeyringError(String),

    #[error("Failed to determine home directory")]
    HomeDirError,
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
