//! # Service Capability Contract
//!
//! The dispatcher talks to its downstream through the [`Service`] trait: a
//! limits query and a deadline-scoped batch submission. The service owns its
//! admission control; whatever batch size the caller was configured with, a
//! batch longer than [`Limits::max_batch_size`] is rejected with
//! [`ServiceError::Blocked`] before any of the deadline is spent.
//!
//! ## Submission lifecycle
//!
//! ```text
//! Admitted ──► Rejected
//!     │
//!     └──────► RunningUntilDeadline ──► Completed
//! ```
//!
//! A batch is atomic: it is either rejected wholesale or admitted and run to
//! completion. There is no partial progress inside a batch.

pub mod recording;
pub mod stand_in;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::dispatch::DeadlineScope;

pub use recording::{RecordingService, SubmissionRecord};
pub use stand_in::StandInService;

/// Opaque unit of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Item;

/// Contiguous, borrowed view over the item collection.
pub type Batch<'a> = &'a [Item];

/// Admission limits advertised by a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Longest batch the service will admit
    pub max_batch_size: u64,
    /// Rate window the service associates with `max_batch_size`
    pub period: Duration,
}

impl Limits {
    pub fn new(max_batch_size: u64, period: Duration) -> Self {
        Self {
            max_batch_size,
            period,
        }
    }

    /// Whether a batch of `len` items fits. Empty batches always fit.
    pub fn admits(&self, len: usize) -> bool {
        len as u64 <= self.max_batch_size
    }
}

/// Errors a service may return from [`Service::process`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The batch exceeds the service's declared capacity
    #[error("Service is blocked: batch of {batch_len} items exceeds limit of {limit}")]
    Blocked { batch_len: usize, limit: u64 },

    /// The service failed for a reason other than admission control
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    pub fn blocked(batch_len: usize, limit: u64) -> Self {
        Self::Blocked { batch_len, limit }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// A capability-limited sink for batches.
///
/// Implementations must honour the scope cooperatively: `process` should
/// return once [`DeadlineScope::done`] resolves. Reaching the deadline is a
/// normal way for a submission to finish, not an error.
#[async_trait]
pub trait Service: Send + Sync {
    /// Current admission limits. Must be side-effect free.
    fn limits(&self) -> Limits;

    /// Submit one batch under the given deadline scope.
    async fn process(&self, scope: &DeadlineScope, batch: Batch<'_>) -> Result<(), ServiceError>;
}
