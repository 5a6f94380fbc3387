//! Per-submission deadline scopes.
//!
//! Every submission runs inside its own [`DeadlineScope`]. The scope pairs a
//! deadline with a cancellation token derived from the dispatcher's shutdown
//! token, so an external cancel reaches the in-flight submission without
//! touching any other scope's deadline. Dropping the scope cancels its token.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Bounded-time window attached to one submission attempt
#[derive(Debug)]
pub struct DeadlineScope {
    token: CancellationToken,
    deadline: Instant,
    period: Duration,
    _guard: DropGuard,
}

impl DeadlineScope {
    /// Open a scope that expires `period` from now.
    ///
    /// The deadline is fresh: it does not depend on any earlier scope.
    pub fn new(parent: &CancellationToken, period: Duration) -> Self {
        let token = parent.child_token();
        let guard = token.clone().drop_guard();

        Self {
            token,
            deadline: Instant::now() + period,
            period,
            _guard: guard,
        }
    }

    /// Resolves once the deadline passes or the scope is cancelled.
    pub async fn done(&self) {
        tokio::select! {
            _ = self.token.cancelled() => {}
            _ = tokio::time::sleep_until(self.deadline) => {}
        }
    }

    /// Deadline passed or scope cancelled
    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled() || self.deadline_passed()
    }

    pub fn deadline_passed(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// The period this scope was opened with
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Token that is cancelled when this scope is released or its parent is cancelled
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
