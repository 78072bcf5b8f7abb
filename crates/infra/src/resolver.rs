//! Job status resolution over the three views of the shared store.
//!
//! ## Resolution Order
//!
//! ```text
//! job id
//!   ↓
//! 1. Pending list      → present?  queued (+ position)
//!   ↓
//! 2. Result record     → present?  mapped store status
//!   ↓
//! 3. Unacknowledged    → root id?  starting
//!   ↓
//! 4. invalid token
//! ```
//!
//! The first view that knows the job wins. A job mid-transition can be visible
//! in two views at once (e.g. claimed by a worker but not yet removed from the
//! pending list); checking the pending list first keeps such a job `queued`
//! instead of reporting it as `starting` or unknown. A written result record is
//! authoritative over a stale unacknowledged entry.
//!
//! ## Consistency
//!
//! Resolution is a **best-effort read sequence**, not a snapshot. Each step is
//! an independent round trip and nothing is locked between them, so:
//!
//! - a job dequeued between steps 1 and 2 whose result is not yet written
//!   and whose unacknowledged entry was already removed resolves to
//!   `invalid token` for that one query
//! - a job can be reported `queued` at a position the list no longer has
//!
//! Each individual read was accurate when it was made. A consistent global
//! view would need store support (MULTI/WATCH or a server-side script); the
//! resolver does not try to fake one.
//!
//! ## Failure Handling
//!
//! - store failures abort with `StoreUnavailable` (never read as absence)
//! - unknown store status codes abort with `UnknownStatusCode`
//! - malformed records are logged and treated as absent for their step
//! - cancellation is checked before each store call; an in-flight call is
//!   never interrupted

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use jobstatus_core::{JobId, JobOutcome, StatusError, StatusReport, queue_position};

use crate::codec;
use crate::store::QueueStore;

/// Resolves job ids to a public status.
///
/// Holds no mutable state; share one resolver across tasks.
#[derive(Debug, Clone)]
pub struct StatusResolver<S> {
    store: S,
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), StatusError> {
    if cancel.is_cancelled() {
        return Err(StatusError::Cancelled);
    }
    Ok(())
}

impl<S: QueueStore> StatusResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolve the status of `job_id`.
    pub async fn resolve(&self, job_id: &JobId) -> Result<StatusReport, StatusError> {
        self.resolve_with_cancel(job_id, &CancellationToken::new())
            .await
    }

    /// Resolve the status of `job_id`, stopping before the next store call
    /// once `cancel` fires.
    #[instrument(skip_all, fields(job_id = %job_id), err)]
    pub async fn resolve_with_cancel(
        &self,
        job_id: &JobId,
        cancel: &CancellationToken,
    ) -> Result<StatusReport, StatusError> {
        ensure_live(cancel)?;
        let pending = self.pending_ids().await?;
        match queue_position(&pending, job_id) {
            Ok(position) => {
                debug!(%position, "job is queued");
                return Ok(StatusReport::queued(position));
            }
            Err(StatusError::PositionRace(_)) => {}
            Err(other) => return Err(other),
        }

        ensure_live(cancel)?;
        if let Some(outcome) = self.result_if_decodable(job_id).await? {
            let status = outcome
                .status
                .ok_or_else(|| StatusError::unknown_code(outcome.store_code.as_str()))?;
            debug!(%status, "job has a result record");
            return Ok(StatusReport::of(status));
        }

        ensure_live(cancel)?;
        if self.is_unacknowledged(job_id).await? {
            debug!("job is claimed but not yet started");
            return Ok(StatusReport::starting());
        }

        debug!("job is unknown to every view");
        Ok(StatusReport::invalid_token())
    }

    /// Ids in the pending list, front first.
    ///
    /// Entries that fail to decode are skipped and do not count towards
    /// positions.
    pub async fn pending_ids(&self) -> Result<Vec<JobId>, StatusError> {
        let raw = self.store.list_pending().await?;

        let mut ids = Vec::with_capacity(raw.len());
        for (index, record) in raw.iter().enumerate() {
            match codec::decode_pending_id(record) {
                Ok(id) => ids.push(id),
                Err(e) => warn!(index, error = %e, "skipping malformed pending entry"),
            }
        }
        Ok(ids)
    }

    /// Length of the pending list as reported by the store.
    pub async fn pending_len(&self) -> Result<u64, StatusError> {
        Ok(self.store.pending_len().await?)
    }

    /// Read and decode the result record of `job_id`.
    ///
    /// Unlike resolution, a malformed record is surfaced here.
    pub async fn result(&self, job_id: &JobId) -> Result<Option<JobOutcome>, StatusError> {
        match self.store.get_result(job_id).await? {
            Some(raw) => codec::decode_result(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Whether any unacknowledged entry carries `job_id` as its root id.
    pub async fn is_unacknowledged(&self, job_id: &JobId) -> Result<bool, StatusError> {
        let entries = self.store.list_unacknowledged().await?;

        let found = entries.iter().any(|(tag, raw)| match codec::decode_unacked_root_id(raw) {
            Ok(root_id) => &root_id == job_id,
            Err(e) => {
                warn!(%tag, error = %e, "skipping malformed unacknowledged entry");
                false
            }
        });
        Ok(found)
    }

    async fn result_if_decodable(&self, job_id: &JobId) -> Result<Option<JobOutcome>, StatusError> {
        match self.result(job_id).await {
            Err(StatusError::MalformedRecord(reason)) => {
                warn!(%reason, "ignoring malformed result record");
                Ok(None)
            }
            other => other,
        }
    }
}
