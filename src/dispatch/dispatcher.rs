//! # Dispatcher
//!
//! Drives the item collection through a [`Service`] one batch at a time.
//!
//! For every batch the dispatcher opens a fresh [`DeadlineScope`] of exactly
//! `period`, submits the batch, records the outcome and releases the scope
//! before moving on. Outcomes never feed back into slicing: a blocked batch
//! is reported and skipped, and the cursor advances by `batch_size` either
//! way.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use super::batches::Batches;
use super::deadline::DeadlineScope;
use crate::config::ServiceParameters;
use crate::error::{DispatchError, Result};
use crate::events::{DispatchEvent, EventPublisher};
use crate::logging::log_batch_outcome;
use crate::service::{Batch, Item, Service, ServiceError};

/// What happened to one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Admitted and run until the service finished or the deadline passed
    Processed { items: usize, deadline_reached: bool },
    /// Refused for exceeding the service's capacity
    Blocked { items: usize, limit: u64 },
    /// The service failed for some other reason
    Failed { items: usize, reason: String },
}

impl BatchOutcome {
    pub fn items(&self) -> usize {
        match self {
            Self::Processed { items, .. }
            | Self::Blocked { items, .. }
            | Self::Failed { items, .. } => *items,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Per-run counters plus the ordered list of outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub run_id: Uuid,
    pub batches_attempted: usize,
    pub batches_admitted: usize,
    pub batches_blocked: usize,
    pub batches_failed: usize,
    pub items_processed: usize,
    pub items_rejected: usize,
    pub deadlines_reached: usize,
    /// Set when the shutdown token stopped the run before the last batch
    pub interrupted: bool,
    pub outcomes: Vec<BatchOutcome>,
}

impl DispatchSummary {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: BatchOutcome) {
        self.batches_attempted += 1;
        match &outcome {
            BatchOutcome::Processed {
                items,
                deadline_reached,
            } => {
                self.batches_admitted += 1;
                self.items_processed += items;
                if *deadline_reached {
                    self.deadlines_reached += 1;
                }
            }
            BatchOutcome::Blocked { items, .. } => {
                self.batches_blocked += 1;
                self.items_rejected += items;
            }
            BatchOutcome::Failed { items, .. } => {
                self.batches_failed += 1;
                self.items_rejected += items;
            }
        }
        self.outcomes.push(outcome);
    }

    /// Sizes of every submitted batch, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.outcomes.iter().map(BatchOutcome::items).collect()
    }
}

/// Clears the running flag when a run ends, however it ends
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sequential batch driver over a single service
#[derive(Debug)]
pub struct Dispatcher<S> {
    params: ServiceParameters,
    service: S,
    publisher: EventPublisher,
    shutdown: CancellationToken,
    running: AtomicBool,
}

impl<S: Service> Dispatcher<S> {
    pub fn new(params: ServiceParameters, service: S, publisher: EventPublisher) -> Self {
        Self {
            params,
            service,
            publisher,
            shutdown: CancellationToken::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Use `token` as the parent of every deadline scope.
    ///
    /// Cancelling it ends the in-flight submission early and stops the run
    /// before the next batch.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn params(&self) -> &ServiceParameters {
        &self.params
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Build the full item collection and dispatch it
    pub async fn run_all(&self) -> Result<DispatchSummary> {
        let items = vec![Item; self.params.number_of_items()];
        self.run(&items).await
    }

    /// Dispatch `items` from the beginning, one batch at a time.
    ///
    /// Blocked or failed batches are reported and skipped. The only errors
    /// are precondition violations: a collection whose length disagrees with
    /// the configured `number_of_items`, or a run already in progress.
    pub async fn run(&self, items: &[Item]) -> Result<DispatchSummary> {
        if items.len() != self.params.number_of_items() {
            return Err(DispatchError::configuration(format!(
                "item collection has {} items, expected {}",
                items.len(),
                self.params.number_of_items()
            )));
        }

        if self.running.swap(true, Ordering::AcqRel) {
            return Err(DispatchError::InvalidState(
                "Dispatcher is already running".to_string(),
            ));
        }
        let _guard = RunGuard(&self.running);

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch_run", run_id = %run_id);
        Ok(self.run_batches(run_id, items).instrument(span).await)
    }

    async fn run_batches(&self, run_id: Uuid, items: &[Item]) -> DispatchSummary {
        let batch_size = self.params.batch_size();
        let batches = Batches::new(items.len(), batch_size);
        let limits = self.service.limits();

        info!(
            batch_size = batch_size,
            batch_count = batches.len(),
            number_of_items = items.len(),
            period_ms = self.params.period().as_millis() as u64,
            max_batch_size = limits.max_batch_size,
            limit_period_ms = limits.period.as_millis() as u64,
            "Starting dispatch run"
        );

        if !limits.admits(batch_size) {
            warn!(
                batch_size = batch_size,
                max_batch_size = limits.max_batch_size,
                "Configured batch size exceeds service capacity; full batches will be blocked"
            );
        }

        self.publisher.publish(DispatchEvent::RunStarted {
            run_id,
            batch_count: batches.len(),
            number_of_items: items.len(),
        });

        let mut summary = DispatchSummary::new(run_id);

        for (batch_index, bounds) in batches {
            if self.shutdown.is_cancelled() {
                warn!(batch_index = batch_index, "Shutdown requested, stopping dispatch");
                summary.interrupted = true;
                break;
            }

            debug!(
                batch_index = batch_index,
                lower = bounds.start,
                upper = bounds.end,
                "Submitting batch"
            );
            let outcome = self.submit(&items[bounds]).await;
            log_batch_outcome(run_id, batch_index, &outcome);

            if let BatchOutcome::Blocked { items, limit } = outcome {
                self.publisher.publish(DispatchEvent::Blocked {
                    batch_index,
                    items,
                    limit,
                });
            }

            summary.record(outcome);
        }

        info!(
            batches_attempted = summary.batches_attempted,
            batches_blocked = summary.batches_blocked,
            items_processed = summary.items_processed,
            interrupted = summary.interrupted,
            "Dispatch run finished"
        );

        self.publisher.publish(DispatchEvent::RunFinished {
            summary: summary.clone(),
        });

        summary
    }

    /// One bounded-time submission. The scope is released before returning.
    async fn submit(&self, batch: Batch<'_>) -> BatchOutcome {
        let scope = DeadlineScope::new(&self.shutdown, self.params.period());
        let result = self.service.process(&scope, batch).await;
        let deadline_reached = scope.deadline_passed();
        drop(scope);

        match result {
            Ok(()) => BatchOutcome::Processed {
                items: batch.len(),
                deadline_reached,
            },
            Err(ServiceError::Blocked { batch_len, limit }) => BatchOutcome::Blocked {
                items: batch_len,
                limit,
            },
            Err(ServiceError::Unavailable(reason)) => BatchOutcome::Failed {
                items: batch.len(),
                reason,
            },
        }
    }
}
