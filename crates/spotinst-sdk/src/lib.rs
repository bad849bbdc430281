//! Async client for the Spotinst API
//!
//! The crate is layered leaf to root:
//!
//! - [`Config`] layers are merged into a [`Session`], which resolves
//!   credentials once and owns the shared HTTP connection pool
//! - [`Client::execute`] runs one [`Request`] under a caller [`Context`] and
//!   decodes the response envelope
//! - service handlers ([`service::account`], [`service::ocean`],
//!   [`service::insights`]) map typed inputs to requests
//! - [`Spotinst`] bundles every handler behind one value
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use spotinst_sdk::{Config, Context, Session, Spotinst};
//!
//! # async fn run() -> spotinst_sdk::Result<()> {
//! // Credentials come from SPOTINST_TOKEN / SPOTINST_ACCOUNT or
//! // ~/.spotinst/credentials when none are configured in code.
//! let session = Session::new([&Config::new().with_timeout(Duration::from_secs(30))])?;
//! let spotinst = Spotinst::new(&session);
//!
//! let ctx = Context::background().with_timeout(Duration::from_secs(10));
//! for cluster in spotinst.ocean.aws.list_clusters(&ctx).await? {
//!     println!("{:?} {:?}", cluster.id, cluster.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and one span per API call. Install a
//! subscriber in the application to see them; the request itself is logged
//! as a redacted `curl` command at trace level.

pub mod client;
pub mod context;
pub mod error;
pub mod field;
pub mod retry;
pub mod service;
pub mod session;

pub use client::{Client, Request, Response};
pub use context::{CancellationToken, Context};
pub use error::{ApiError, ContextError, Error, ErrorDetail, Result, ValidationError};
pub use field::Nullable;
pub use session::{Session, SessionBuilder};
pub use spotinst_config::{Config, Provider, RetryConfig, Value};

use service::account::AccountHandler;
use service::insights::InsightsHandler;
use service::ocean::OceanHandler;

/// Every service handler, sharing one [`Session`]
///
/// Handlers can also be built on their own from a [`Client`].
#[derive(Debug, Clone)]
pub struct Spotinst {
    pub account: AccountHandler,
    pub ocean: OceanHandler,
    pub insights: InsightsHandler,
}

impl Spotinst {
    pub fn new(session: &Session) -> Self {
        let client = Client::new(session);
        Self {
            account: AccountHandler::new(client.clone()),
            ocean: OceanHandler::new(client.clone()),
            insights: InsightsHandler::new(client),
        }
    }
}
