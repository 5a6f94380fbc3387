//! Decorator that remembers every submission made to an inner service.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{Batch, Limits, Service, ServiceError};
use crate::dispatch::DeadlineScope;

/// One submission as seen by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub items: usize,
    /// Deadline granted to the submission when it arrived
    pub granted: Duration,
    pub blocked: bool,
}

/// Wraps a service and records each call to [`Service::process`].
#[derive(Debug, Clone)]
pub struct RecordingService<S> {
    inner: S,
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl<S: Service> RecordingService<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of all submissions so far, in arrival order
    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.records.lock().iter().map(|r| r.items).collect()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: Service> Service for RecordingService<S> {
    fn limits(&self) -> Limits {
        self.inner.limits()
    }

    async fn process(&self, scope: &DeadlineScope, batch: Batch<'_>) -> Result<(), ServiceError> {
        let granted = scope.remaining();
        let result = self.inner.process(scope, batch).await;

        self.records.lock().push(SubmissionRecord {
            items: batch.len(),
            granted,
            blocked: matches!(result, Err(ServiceError::Blocked { .. })),
        });

        result
    }
}
