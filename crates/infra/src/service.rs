//! Job status service: the read interface exposed to hosting layers.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use jobstatus_core::{JobId, JobOutcome, StatusError, StatusReport};

use crate::config::StoreConfig;
use crate::resolver::StatusResolver;
use crate::store::{QueueStore, TimeoutQueueStore};

/// Read-only job status queries over a shared store.
#[derive(Debug, Clone)]
pub struct JobStatusService<S> {
    resolver: StatusResolver<TimeoutQueueStore<S>>,
}

impl<S: QueueStore> JobStatusService<S> {
    /// Wrap `store`, bounding every store call by `call_timeout`.
    pub fn new(store: S, call_timeout: Duration) -> Self {
        Self {
            resolver: StatusResolver::new(TimeoutQueueStore::new(store, call_timeout)),
        }
    }

    pub fn from_config(store: S, config: &StoreConfig) -> Self {
        Self::new(store, config.timeout)
    }

    /// Current status of a job; `queue_position` is set only when queued.
    pub async fn get_status(&self, job_id: &JobId) -> Result<StatusReport, StatusError> {
        self.resolver.resolve(job_id).await
    }

    pub async fn get_status_with_cancel(
        &self,
        job_id: &JobId,
        cancel: &CancellationToken,
    ) -> Result<StatusReport, StatusError> {
        self.resolver.resolve_with_cancel(job_id, cancel).await
    }

    /// Number of messages in the pending list.
    #[instrument(skip(self), err)]
    pub async fn queue_length(&self) -> Result<u64, StatusError> {
        self.resolver.pending_len().await
    }

    /// Ids of queued jobs, front of the pending list first.
    #[instrument(skip(self), err)]
    pub async fn queued_ids(&self) -> Result<Vec<JobId>, StatusError> {
        self.resolver.pending_ids().await
    }

    /// Stored result of a job, or `None` if no result has been written.
    #[instrument(skip(self), err)]
    pub async fn get_result(&self, job_id: &JobId) -> Result<Option<JobOutcome>, StatusError> {
        self.resolver.result(job_id).await
    }

    pub async fn is_queued(&self, job_id: &JobId) -> Result<bool, StatusError> {
        Ok(self.resolver.pending_ids().await?.contains(job_id))
    }

    pub async fn is_starting(&self, job_id: &JobId) -> Result<bool, StatusError> {
        self.resolver.is_unacknowledged(job_id).await
    }
}
