//! Opt-in retry for callers
//!
//! The request pipeline never retries on its own. Callers that want to ride
//! out throttling or transient server errors wrap a call with [`with_retry`]:
//!
//! ```rust,no_run
//! use spotinst_sdk::{Context, RetryConfig, Session, Spotinst};
//! use spotinst_sdk::retry::with_retry;
//!
//! # async fn run(session: Session) -> spotinst_sdk::Result<()> {
//! let spotinst = Spotinst::new(&session);
//! let ctx = Context::background();
//! let _clusters = with_retry(&RetryConfig::default(), || {
//!     spotinst.ocean.aws.list_clusters(&ctx)
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use spotinst_config::RetryConfig;
use tracing::debug;

use crate::error::Result;

/// Run `operation`, retrying retryable failures according to `config`
///
/// Only errors for which [`Error::is_retryable`](crate::Error::is_retryable)
/// holds are retried: 5xx, 429 and transport timeouts or connect failures.
/// Validation, configuration, context and other API errors are returned
/// immediately. `max_attempts` counts the first call.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = if config.enabled {
        config.max_attempts.max(1)
    } else {
        1
    };

    let mut attempt = 1;
    loop {
        match operation().await {
            Err(e) if attempt < max_attempts && e.is_retryable() => {
                let delay = config.backoff_for(attempt);
                debug!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after error: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
