#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Batch Dispatch
//!
//! Sequential batch dispatcher for rate-limited downstream services.
//!
//! ## Overview
//!
//! A fixed collection of items is cut into fixed-size batches and submitted,
//! strictly in order, to a [`Service`]. Each submission gets its own
//! deadline. The service enforces its own capacity limit and may refuse a
//! batch as *blocked*; the dispatcher reports the refusal and moves on. It
//! does not retry, resize batches, run batches concurrently, or persist
//! progress.
//!
//! ## Module Organization
//!
//! - [`dispatch`] - batch arithmetic, deadline scopes and the driver loop
//! - [`service`] - the service capability contract and the stand-in service
//! - [`events`] - observability side channel
//! - [`config`] - layered configuration
//! - [`logging`] - structured logging setup
//! - [`error`] - error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batch_dispatch::{Dispatcher, EventPublisher, ServiceParameters, StandInService};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let params = ServiceParameters::new(25, Duration::from_secs(2), 69)?;
//! let publisher = EventPublisher::default();
//! let service = StandInService::new(25, Duration::from_secs(2), publisher.clone());
//!
//! let summary = Dispatcher::new(params, service, publisher).run_all().await?;
//! assert_eq!(summary.batch_sizes(), vec![25, 25, 19]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod logging;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{ConfigManager, DispatcherConfig, ServiceParameters};
pub use dispatch::{BatchOutcome, DeadlineScope, DispatchSummary, Dispatcher};
pub use error::{DispatchError, Result};
pub use events::{DispatchEvent, EventPublisher};
pub use service::{Batch, Item, Limits, Service, ServiceError, StandInService};
