//! Retry policy configuration
//!
//! The SDK client never retries on its own. A [`RetryConfig`] travels with
//! the merged configuration so that callers who want retries (for example on
//! 5xx responses) can apply one consistently.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Backoff policy for callers that opt into retries
///
/// Missing keys in a TOML table fall back to [`RetryConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Attempts including the first call
    pub max_attempts: u32,
    /// Delay before the first retry; doubles after each one
    pub backoff_ms: u64,
    /// Upper bound on any single delay
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            backoff_ms: 100,
            max_backoff_ms: 5_000,
        }
    }
}

impl RetryConfig {
    /// Exactly one attempt
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let millis = match 1u64.checked_shl(exponent) {
            Some(factor) => self.backoff_ms.saturating_mul(factor),
            None => u64::MAX,
        };
        Duration::from_millis(millis.min(self.max_backoff_ms))
    }
}
