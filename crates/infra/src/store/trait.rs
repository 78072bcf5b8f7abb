use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use jobstatus_core::{JobId, StatusError};

/// Raw bytes of a single stored record, exactly as the store returned them.
pub type RawRecord = Vec<u8>;

/// Store adapter error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Connection refused, dropped, or a command failed at the transport level.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A round trip exceeded its deadline.
    #[error("store call `{op}` timed out after {timeout_ms}ms")]
    Timeout { op: &'static str, timeout_ms: u64 },
}

impl From<StoreError> for StatusError {
    fn from(err: StoreError) -> Self {
        StatusError::StoreUnavailable(err.to_string())
    }
}

/// Read-only capability over the shared job store.
///
/// The store holds three independent views of job state:
///
/// - the **pending list**: ordered serialized messages, front (index 0) first
/// - the **result store**: one record per job at `"<namespace>-<job id>"`
/// - the **unacknowledged hash**: delivery tag -> serialized message claimed by a worker
///
/// ## Call Semantics
///
/// Every method is a single read-only round trip and an independent snapshot.
/// No lock is held across calls, so two calls may observe different states of
/// the store. Implementations must be safe to share across tasks.
///
/// Only bounded primitives are exposed. Implementations must never fall back
/// to key scans.
#[async_trait::async_trait]
pub trait QueueStore: Send + Sync {
    /// Read the whole pending list, front first.
    async fn list_pending(&self) -> Result<Vec<RawRecord>, StoreError>;

    /// Length of the pending list.
    async fn pending_len(&self) -> Result<u64, StoreError>;

    /// Read the result record for a job, if one has been written.
    async fn get_result(&self, job_id: &JobId) -> Result<Option<RawRecord>, StoreError>;

    /// Read every entry of the unacknowledged hash.
    async fn list_unacknowledged(&self) -> Result<HashMap<String, RawRecord>, StoreError>;
}

#[async_trait::async_trait]
impl<S> QueueStore for Arc<S>
where
    S: QueueStore + ?Sized,
{
    async fn list_pending(&self) -> Result<Vec<RawRecord>, StoreError> {
        (**self).list_pending().await
    }

    async fn pending_len(&self) -> Result<u64, StoreError> {
        (**self).pending_len().await
    }

    async fn get_result(&self, job_id: &JobId) -> Result<Option<RawRecord>, StoreError> {
        (**self).get_result(job_id).await
    }

    async fn list_unacknowledged(&self) -> Result<HashMap<String, RawRecord>, StoreError> {
        (**self).list_unacknowledged().await
    }
}

/// Build the result-store key for a job.
pub fn result_key(namespace: &str, job_id: &JobId) -> String {
    format!("{namespace}-{job_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_key_joins_namespace_and_id() {
        assert_eq!(
            result_key("celery-task-meta", &JobId::from("abc-123")),
            "celery-task-meta-abc-123"
        );
    }

    #[test]
    fn store_errors_become_store_unavailable() {
        let err: StatusError = StoreError::Timeout {
            op: "get_result",
            timeout_ms: 50,
        }
        .into();
        assert!(matches!(err, StatusError::StoreUnavailable(_)));
        assert!(err.is_transient());
    }
}
