//! Credential material and the providers that discover it
//!
//! A [`Value`] is the pair of settings the API needs to authorize a request:
//! a bearer token and (optionally) the account the request acts on. Values
//! come from a [`Provider`]:
//!
//! - [`StaticProvider`] - a value supplied in code
//! - [`EnvProvider`] - `SPOTINST_TOKEN` / `SPOTINST_ACCOUNT`
//! - [`FileProvider`] - a profile from the shared credentials file
//! - [`ChainProvider`] - the first of several providers that yields a token
//!
//! [`ChainProvider::default_chain`] encodes the discovery order used by the
//! SDK session: environment, then the credentials file.

use std::env;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, trace};

use super::error::{ConfigError, Result};
use super::file::CredentialsFile;
use super::store::CredentialStore;

/// Environment variable holding the API token
pub const ENV_TOKEN: &str = "SPOTINST_TOKEN";

/// Environment variable holding the account ID
pub const ENV_ACCOUNT: &str = "SPOTINST_ACCOUNT";

/// Environment variable selecting the credentials file profile
pub const ENV_PROFILE: &str = "SPOTINST_PROFILE";

/// Profile used when none is selected
pub const DEFAULT_PROFILE: &str = "default";

/// Credential material
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Value {
    /// Bearer token
    pub token: Option<String>,
    /// Account ID (`act-...`)
    pub account: Option<String>,
    /// Name of the provider that produced this value
    pub provider: &'static str,
}

impl Value {
    /// A value with both token and account
    pub fn new(token: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            account: Some(account.into()),
            provider: StaticProvider::NAME,
        }
    }

    /// A value with only a token; the account is resolved elsewhere or omitted
    pub fn token_only(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            account: None,
            provider: StaticProvider::NAME,
        }
    }

    /// True when neither token nor account carries a value
    pub fn is_empty(&self) -> bool {
        !self.has_token() && !self.has_account()
    }

    /// True when a non-empty token is present
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// True when a non-empty account is present
    pub fn has_account(&self) -> bool {
        self.account.as_deref().is_some_and(|a| !a.is_empty())
    }

    /// Fill fields that are still empty from `other`
    ///
    /// Used while walking a provider chain: the first provider to supply a
    /// field keeps it.
    pub fn merge(&mut self, other: &Value) {
        if !self.has_token() && other.has_token() {
            self.token = other.token.clone();
        }
        if !self.has_account() && other.has_account() {
            self.account = other.account.clone();
        }
    }

    /// Replace fields with the non-empty fields of `other`
    ///
    /// Used by config merging, where later layers win.
    pub(crate) fn overlay(&mut self, other: &Value) {
        if other.has_token() {
            self.token = other.token.clone();
            self.provider = other.provider;
        }
        if other.has_account() {
            self.account = other.account.clone();
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .field("account", &self.account)
            .field("provider", &self.provider)
            .finish()
    }
}

/// Source of credential material
pub trait Provider: Send + Sync {
    /// Produce a credential value or explain why none is available
    fn retrieve(&self) -> Result<Value>;

    /// Short provider name used in logs and errors
    fn name(&self) -> &'static str;
}

/// Provider returning a value supplied in code
#[derive(Debug, Clone)]
pub struct StaticProvider {
    value: Value,
}

impl StaticProvider {
    pub const NAME: &'static str = "StaticProvider";

    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Provider for StaticProvider {
    fn retrieve(&self) -> Result<Value> {
        if !self.value.has_token() {
            return Err(ConfigError::CredentialsNotFound {
                provider: Self::NAME,
                reason: "static credentials are empty".to_string(),
            });
        }
        Ok(Value {
            provider: Self::NAME,
            ..self.value.clone()
        })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Provider reading `SPOTINST_TOKEN` and `SPOTINST_ACCOUNT`
#[derive(Debug, Clone, Default)]
pub struct EnvProvider;

impl EnvProvider {
    pub const NAME: &'static str = "EnvProvider";

    pub fn new() -> Self {
        Self
    }
}

impl Provider for EnvProvider {
    fn retrieve(&self) -> Result<Value> {
        let token = env::var(ENV_TOKEN).ok().filter(|t| !t.is_empty());
        let account = env::var(ENV_ACCOUNT).ok().filter(|a| !a.is_empty());

        if token.is_none() {
            return Err(ConfigError::CredentialsNotFound {
                provider: Self::NAME,
                reason: format!("{} is not set", ENV_TOKEN),
            });
        }

        debug!(has_account = account.is_some(), "Found {} in environment", ENV_TOKEN);
        Ok(Value {
            token,
            account,
            provider: Self::NAME,
        })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Provider reading a profile from the shared credentials file
#[derive(Debug, Clone, Default)]
pub struct FileProvider {
    path: Option<PathBuf>,
    profile: Option<String>,
}

impl FileProvider {
    pub const NAME: &'static str = "FileProvider";

    /// Read from the default path and the profile selected by `SPOTINST_PROFILE`
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from an explicit file
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Read an explicit profile
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// The profile this provider reads
    ///
    /// Resolution order: explicit profile, `SPOTINST_PROFILE`, `default`.
    pub fn profile_name(&self) -> String {
        if let Some(profile) = &self.profile {
            return profile.clone();
        }
        env::var(ENV_PROFILE)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    fn path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => CredentialsFile::default_path(),
        }
    }
}

impl Provider for FileProvider {
    fn retrieve(&self) -> Result<Value> {
        let path = self.path()?;
        let profile_name = self.profile_name();
        trace!("Reading profile '{}' from {}", profile_name, path.display());

        if !path.exists() {
            return Err(ConfigError::CredentialsNotFound {
                provider: Self::NAME,
                reason: format!("{} does not exist", path.display()),
            });
        }

        let file = CredentialsFile::load_from_path(&path)?;
        let profile = file
            .profile(&profile_name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: profile_name.clone(),
            })?;

        let store = CredentialStore::new();
        let token = profile
            .token
            .as_deref()
            .map(|t| store.resolve(t))
            .transpose()?
            .filter(|t| !t.is_empty());
        let account = profile
            .account
            .as_deref()
            .map(|a| store.resolve(a))
            .transpose()?
            .filter(|a| !a.is_empty());

        if token.is_none() {
            return Err(ConfigError::CredentialsNotFound {
                provider: Self::NAME,
                reason: format!("profile '{}' has no token", profile_name),
            });
        }

        debug!("Loaded credentials from profile '{}'", profile_name);
        Ok(Value {
            token,
            account,
            provider: Self::NAME,
        })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Provider trying a list of providers in order
pub struct ChainProvider {
    providers: Vec<Box<dyn Provider>>,
}

impl ChainProvider {
    pub const NAME: &'static str = "ChainProvider";

    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Environment first, then the shared credentials file
    pub fn default_chain() -> Self {
        Self::new(vec![
            Box::new(EnvProvider::new()),
            Box::new(FileProvider::new()),
        ])
    }
}

impl fmt::Debug for ChainProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ChainProvider")
            .field("providers", &names)
            .finish()
    }
}

impl Provider for ChainProvider {
    /// The first provider with a token wins; a missing account is filled from
    /// later providers. Values without a token before that are skipped.
    fn retrieve(&self) -> Result<Value> {
        let mut resolved: Option<Value> = None;
        let mut errors = Vec::new();

        for provider in &self.providers {
            match provider.retrieve() {
                Ok(value) => match &mut resolved {
                    Some(current) => current.merge(&value),
                    None if value.has_token() => {
                        debug!("Credentials resolved by {}", provider.name());
                        resolved = Some(value);
                    }
                    None => {
                        trace!("{} yielded no token", provider.name());
                        errors.push(format!("{}: no token", provider.name()));
                    }
                },
                Err(e) => {
                    trace!("{} yielded no credentials: {}", provider.name(), e);
                    errors.push(e.to_string());
                }
            }

            if resolved.as_ref().is_some_and(|v| v.has_account()) {
                break;
            }
        }

        resolved.ok_or(ConfigError::NoValidProvidersInChain { errors })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
