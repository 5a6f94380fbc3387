//! Stand-in service used by the binary and tests.
//!
//! Admits any batch within its capacity, reports the batch size, and then
//! holds the call open until the caller's deadline. An optional work time
//! lets it finish earlier than the deadline.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use super::{Batch, Limits, Service, ServiceError};
use crate::dispatch::DeadlineScope;
use crate::events::{DispatchEvent, EventPublisher};

#[derive(Debug, Clone)]
pub struct StandInService {
    limits: Limits,
    work_time: Option<Duration>,
    publisher: EventPublisher,
}

impl StandInService {
    /// Stand-in with capacity `max_batch_size` per `period`
    pub fn new(max_batch_size: u64, period: Duration, publisher: EventPublisher) -> Self {
        Self {
            limits: Limits::new(max_batch_size, period),
            work_time: None,
            publisher,
        }
    }

    /// Finish each admitted batch after `work_time` unless the deadline comes first
    pub fn with_work_time(mut self, work_time: Duration) -> Self {
        self.work_time = Some(work_time);
        self
    }
}

#[async_trait]
impl Service for StandInService {
    fn limits(&self) -> Limits {
        self.limits
    }

    async fn process(&self, scope: &DeadlineScope, batch: Batch<'_>) -> Result<(), ServiceError> {
        if !self.limits.admits(batch.len()) {
            return Err(ServiceError::blocked(
                batch.len(),
                self.limits.max_batch_size,
            ));
        }

        info!(items = batch.len(), "Processed {}", batch.len());
        self.publisher
            .publish(DispatchEvent::Processed { items: batch.len() });

        match self.work_time {
            Some(work_time) => {
                tokio::select! {
                    _ = scope.done() => {
                        debug!(items = batch.len(), "Deadline reached before work finished");
                    }
                    _ = tokio::time::sleep(work_time) => {
                        debug!(items = batch.len(), "Work finished before deadline");
                    }
                }
            }
            None => scope.done().await,
        }

        Ok(())
    }
}
