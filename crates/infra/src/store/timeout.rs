use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use jobstatus_core::JobId;

use super::r#trait::{QueueStore, RawRecord, StoreError};

/// Adapter that bounds every call of the wrapped store by a deadline.
///
/// A call that exceeds the deadline is dropped and reported as
/// `StoreError::Timeout`.
#[derive(Debug, Clone)]
pub struct TimeoutQueueStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S> TimeoutQueueStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, op: &'static str, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout {
                op,
                timeout_ms: self.timeout.as_millis() as u64,
            })?
    }
}

#[async_trait::async_trait]
impl<S: QueueStore> QueueStore for TimeoutQueueStore<S> {
    async fn list_pending(&self) -> Result<Vec<RawRecord>, StoreError> {
        self.bounded("list_pending", self.inner.list_pending()).await
    }

    async fn pending_len(&self) -> Result<u64, StoreError> {
        self.bounded("pending_len", self.inner.pending_len()).await
    }

    async fn get_result(&self, job_id: &JobId) -> Result<Option<RawRecord>, StoreError> {
        self.bounded("get_result", self.inner.get_result(job_id)).await
    }

    async fn list_unacknowledged(&self) -> Result<HashMap<String, RawRecord>, StoreError> {
        self.bounded("list_unacknowledged", self.inner.list_unacknowledged())
            .await
    }
}
