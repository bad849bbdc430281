//! Shared credentials file
//!
//! The file lives at `~/.spotinst/credentials` (or wherever
//! `SPOTINST_SHARED_CREDENTIALS_FILE` points) and holds one TOML table per
//! profile:
//!
//! ```toml
//! [default]
//! token = "${SPOTINST_PROD_TOKEN}"
//! account = "act-12345678"
//!
//! [staging]
//! token = "keyring:spotinst-staging"
//! ```
//!
//! `${VAR}` and `${VAR:-fallback}` references are expanded when the file is
//! loaded. Unknown keys are ignored.

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use super::store::CredentialStore;

/// Environment variable overriding the credentials file location
pub const ENV_CREDENTIALS_FILE: &str = "SPOTINST_SHARED_CREDENTIALS_FILE";

/// Contents of the shared credentials file
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct CredentialsFile {
    /// Map of profile name -> profile
    pub profiles: BTreeMap<String, FileProfile>,
}

/// A single profile in the credentials file
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct FileProfile {
    /// API token, plaintext or a `keyring:` reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Account ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl CredentialsFile {
    /// Load the credentials file from its default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from_path(&path)
    }

    /// Load the credentials file from a specific path
    ///
    /// A missing or empty file yields an empty set of profiles.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let expanded = Self::expand_env_vars(&content);
        let file: CredentialsFile = toml::from_str(&expanded)?;
        Ok(file)
    }

    /// Save the credentials file to its default location
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to_path(&path)
    }

    /// Save the credentials file to a specific path, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(path, content).map_err(|e| ConfigError::SaveError {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Option<&FileProfile> {
        self.profiles.get(name)
    }

    /// Set or replace a profile
    pub fn set_profile(&mut self, name: impl Into<String>, profile: FileProfile) {
        self.profiles.insert(name.into(), profile);
    }

    /// Set a profile, passing the token through the credential store
    ///
    /// With the keyring backend only a `keyring:` reference lands in the file.
    pub fn store_profile(
        &mut self,
        store: &CredentialStore,
        name: &str,
        token: &str,
        account: Option<&str>,
    ) -> Result<()> {
        let stored = store.put(&format!("{}-token", name), token)?;
        self.set_profile(
            name,
            FileProfile {
                token: Some(stored),
                account: account.map(str::to_string),
            },
        );
        Ok(())
    }

    /// Remove a profile, deleting its keyring entry if it has one
    pub fn remove_profile(
        &mut self,
        store: &CredentialStore,
        name: &str,
    ) -> Result<Option<FileProfile>> {
        let removed = self.profiles.remove(name);
        if let Some(token) = removed.as_ref().and_then(|p| p.token.as_deref()) {
            store.remove(token)?;
        }
        Ok(removed)
    }

    /// Profile names in sorted order
    pub fn list_profiles(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Path of the shared credentials file
    ///
    /// `SPOTINST_SHARED_CREDENTIALS_FILE` wins; otherwise
    /// `~/.spotinst/credentials`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(ENV_CREDENTIALS_FILE)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(shellexpand::tilde(&path).as_ref()));
        }

        let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirError)?;
        Ok(base_dirs.home_dir().join(".spotinst").join("credentials"))
    }

    /// Expand `${VAR}` and `${VAR:-default}` references
    ///
    /// Unset variables without a default are left as-is so that profiles that
    /// are never used do not fail to load.
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| env::var(var).ok()).to_string()
    }
}
