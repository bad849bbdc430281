//! Per-call cancellation and deadlines
//!
//! A [`Context`] bounds a single API call. It carries an optional deadline
//! and one or more [`CancellationToken`]s; if any of them fires before the
//! response has been read, the call fails with [`ContextError`] and the
//! in-flight request is dropped.
//!
//! ```rust
//! use std::time::Duration;
//! use spotinst_sdk::Context;
//!
//! let ctx = Context::background().with_timeout(Duration::from_secs(30));
//! assert!(ctx.err().is_none());
//!
//! ctx.cancel();
//! assert!(ctx.err().is_some());
//! ```

use std::future::Future;
use std::time::Duration;

use futures::future;
use tokio::time::Instant;
pub use tokio_util::sync::CancellationToken;

use crate::error::ContextError;

/// Cancellation and deadline scope for API calls
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    token: CancellationToken,
    linked: Vec<CancellationToken>,
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that also expires after `timeout`
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    /// Derive a context that also expires at `deadline`; the earliest deadline wins
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derive a context that is also cancelled by `token`
    ///
    /// The derived context keeps following the context it came from.
    /// Cancelling the derived context cancels neither `token` nor the
    /// context it was derived from.
    #[must_use]
    pub fn with_cancellation(mut self, token: &CancellationToken) -> Self {
        self.token = self.token.child_token();
        self.linked.push(token.clone());
        self
    }

    /// Cancel this context and every clone of it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The token cancelled by [`Context::cancel`]
    ///
    /// Tokens linked with [`Context::with_cancellation`] are not reflected here.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline, if one is set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` if it is still live
    pub fn err(&self) -> Option<ContextError> {
        if self.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` to completion unless the context finishes first
    ///
    /// `fut` is dropped as soon as the context is cancelled or expires.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        let cancelled = future::select_all(
            std::iter::once(&self.token)
                .chain(&self.linked)
                .map(|token| Box::pin(token.cancelled())),
        );

        tokio::select! {
            biased;
            _ = cancelled => Err(ContextError::Cancelled),
            _ = expired => Err(ContextError::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.linked.iter().any(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_future() {
        let ctx = Context::background();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_cancelled_context_never_polls_future() {
        let ctx = Context::background();
        ctx.cancel();

        let mut polled = false;
        let result = ctx
            .run(async {
                polled = true;
            })
            .await;

        assert_eq!(result, Err(ContextError::Cancelled));
        assert!(!polled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_interrupts_slow_future() {
        let ctx = Context::background().with_timeout(Duration::from_millis(50));
        let result = ctx
            .run(tokio::time::sleep(Duration::from_secs(60)))
            .await;
        assert_eq!(result, Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_earliest_deadline_wins() {
        let now = Instant::now();
        let ctx = Context::background()
            .with_deadline(now + Duration::from_secs(10))
            .with_deadline(now + Duration::from_secs(1))
            .with_deadline(now + Duration::from_secs(5));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_parent_token_cancels_context() {
        let parent = CancellationToken::new();
        let ctx = Context::background().with_cancellation(&parent);
        assert!(ctx.err().is_none());

        parent.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Cancelled));
    }

    #[tokio::test]
    async fn test_derived_context_follows_both_parents() {
        let external = CancellationToken::new();
        let parent = Context::background();
        let derived = parent.clone().with_cancellation(&external);

        parent.cancel();
        assert_eq!(derived.err(), Some(ContextError::Cancelled));
        assert!(!external.is_cancelled());

        let derived = Context::background().with_cancellation(&external);
        external.cancel();
        assert_eq!(derived.err(), Some(ContextError::Cancelled));
    }

    #[tokio::test]
    async fn test_parent_cancel_interrupts_running_call() {
        let external = CancellationToken::new();
        let parent = Context::background();
        let derived = parent.clone().with_cancellation(&external);

        let canceller = async {
            tokio::task::yield_now().await;
            parent.cancel();
        };
        let (result, ()) = tokio::join!(derived.run(future::pending::<()>()), canceller);
        assert_eq!(result, Err(ContextError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancelling_derived_context_leaves_origin_alone() {
        let parent = Context::background();
        let derived = parent.clone().with_cancellation(&CancellationToken::new());
        derived.cancel();
        assert!(parent.err().is_none());
    }

    #[tokio::test]
    async fn test_cancelling_context_leaves_parent_alone() {
        let parent = CancellationToken::new();
        let ctx = Context::background().with_cancellation(&parent);
        ctx.cancel();
        assert!(!parent.is_cancelled());
    }
}
