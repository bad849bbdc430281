//! Secret references in the shared credentials file
//!
//! A file value is either the secret itself or, with the `secure-storage`
//! feature, a `keyring:<entry>` reference into the OS keyring under the
//! `spotinst` service. [`CredentialStore`] turns file values into secrets and
//! decides what gets written back when a profile is saved.

use crate::error::{ConfigError, Result};

/// File values starting with this are keyring references
pub const KEYRING_PREFIX: &str = "keyring:";

#[cfg(feature = "secure-storage")]
const KEYRING_SERVICE: &str = "spotinst";

/// Where [`CredentialStore::put`] keeps secrets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// OS keyring; the file only holds a reference
    #[cfg(feature = "secure-storage")]
    Keyring,
    /// The secret is written to the file as-is
    Inline,
}

/// Resolves and stores file secrets
#[derive(Debug, Clone)]
pub struct CredentialStore {
    backend: Backend,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Use the keyring when the feature is on and a keyring is reachable
    pub fn new() -> Self {
        #[cfg(feature = "secure-storage")]
        {
            if keyring_reachable() {
                return Self {
                    backend: Backend::Keyring,
                };
            }
        }

        Self::inline()
    }

    /// Never touch the keyring when saving
    pub fn inline() -> Self {
        Self {
            backend: Backend::Inline,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The keyring entry name if `value` is a reference
    pub fn keyring_entry(value: &str) -> Option<&str> {
        value.strip_prefix(KEYRING_PREFIX)
    }

    /// Turn a file value into the secret it stands for
    ///
    /// References are looked up in the keyring regardless of the backend, so
    /// a file written with the keyring can still be read by an inline store.
    pub fn resolve(&self, value: &str) -> Result<String> {
        let Some(name) = Self::keyring_entry(value) else {
            return Ok(value.to_string());
        };

        #[cfg(feature = "secure-storage")]
        {
            entry(name)?.get_password().map_err(|e| {
                ConfigError::KeyringError(format!("cannot read keyring entry '{}': {}", name, e))
            })
        }

        #[cfg(not(feature = "secure-storage"))]
        {
            Err(ConfigError::CredentialError(format!(
                "'{}' is a keyring reference; rebuild with the secure-storage feature to read it",
                name
            )))
        }
    }

    /// Keep `secret` under `name`, returning the value to write to the file
    pub fn put(&self, name: &str, secret: &str) -> Result<String> {
        match self.backend {
            #[cfg(feature = "secure-storage")]
            Backend::Keyring => {
                entry(name)?.set_password(secret).map_err(|e| {
                    ConfigError::KeyringError(format!(
                        "cannot write keyring entry '{}': {}",
                        name, e
                    ))
                })?;
                Ok(format!("{}{}", KEYRING_PREFIX, name))
            }
            Backend::Inline => Ok(secret.to_string()),
        }
    }

    /// Forget the secret behind a file value
    ///
    /// Inline values need no cleanup. A missing keyring entry is not an error.
    pub fn remove(&self, value: &str) -> Result<()> {
        let Some(name) = Self::keyring_entry(value) else {
            return Ok(());
        };

        #[cfg(feature = "secure-storage")]
        {
            match entry(name)?.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(ConfigError::KeyringError(format!(
                    "cannot delete keyring entry '{}': {}",
                    name, e
                ))),
            }
        }

        #[cfg(not(feature = "secure-storage"))]
        {
            tracing::debug!(
                "Leaving keyring entry '{}' in place, keyring support is off",
                name
            );
            Ok(())
        }
    }
}

#[cfg(feature = "secure-storage")]
fn entry(name: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, name)
        .map_err(|e| ConfigError::KeyringError(e.to_string()))
}

#[cfg(feature = "secure-storage")]
fn keyring_reachable() -> bool {
    entry("__spotinst_probe__").is_ok_and(|probe| {
        matches!(probe.get_password(), Ok(_) | Err(keyring::Error::NoEntry))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_values_pass_through() {
        let store = CredentialStore::inline();
        assert_eq!(store.resolve("my-token").unwrap(), "my-token");
        assert_eq!(store.resolve("").unwrap(), "");
    }

    #[test]
    fn test_keyring_entry_parsing() {
        assert_eq!(
            CredentialStore::keyring_entry("keyring:prod-token"),
            Some("prod-token")
        );
        assert_eq!(CredentialStore::keyring_entry("prod-token"), None);
        assert_eq!(CredentialStore::keyring_entry("Keyring:prod"), None);
    }

    #[test]
    fn test_inline_put_and_remove() {
        let store = CredentialStore::inline();
        assert_eq!(store.backend(), Backend::Inline);
        assert_eq!(store.put("dev-token", "secret").unwrap(), "secret");
        assert!(store.remove("secret").is_ok());
    }

    #[cfg(not(feature = "secure-storage"))]
    #[test]
    fn test_reference_without_keyring_support() {
        let err = CredentialStore::new().resolve("keyring:prod-token").unwrap_err();
        assert!(matches!(err, ConfigError::CredentialError(_)));
        assert!(err.to_string().contains("secure-storage"));
    }

    #[cfg(feature = "secure-storage")]
    #[test]
    #[ignore = "needs a reachable OS keyring"]
    fn test_keyring_put_resolve_remove() {
        let store = CredentialStore::new();
        let reference = store.put("spotinst-sdk-test", "secret").unwrap();
        assert_eq!(reference, "keyring:spotinst-sdk-test");
        assert_eq!(store.resolve(&reference).unwrap(), "secret");
        store.remove(&reference).unwrap();
    }
}
