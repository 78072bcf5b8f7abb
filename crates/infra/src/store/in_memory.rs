use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value as JsonValue;

use jobstatus_core::{JobId, StoreStatusCode};

use super::r#trait::{QueueStore, RawRecord, StoreError};
use crate::codec;

#[derive(Debug, Default)]
struct Views {
    pending: Vec<RawRecord>,
    results: HashMap<JobId, RawRecord>,
    unacked: HashMap<String, RawRecord>,
}

/// In-memory job store.
///
/// Intended for tests/dev. Mirrors the three views of the shared store and
/// lets tests inject outages and latency.
#[derive(Debug, Default)]
pub struct InMemoryQueueStore {
    views: RwLock<Views>,
    unavailable: AtomicBool,
    latency_ms: AtomicU64,
    calls: AtomicUsize,
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Append a message for `job_id` at the tail of the pending list.
    pub fn push_pending(&self, job_id: &JobId) {
        self.push_pending_raw(codec::encode_pending(job_id, "jobs.run"));
    }

    pub fn push_pending_raw(&self, raw: RawRecord) {
        self.write().pending.push(raw);
    }

    /// Remove and return the id at the front of the pending list.
    pub fn pop_front_pending(&self) -> Option<JobId> {
        let mut views = self.write();
        if views.pending.is_empty() {
            return None;
        }
        let raw = views.pending.remove(0);
        codec::decode_pending_id(&raw).ok()
    }

    /// Remove every pending message carrying `job_id`.
    pub fn remove_pending(&self, job_id: &JobId) {
        self.write()
            .pending
            .retain(|raw| codec::decode_pending_id(raw).ok().as_ref() != Some(job_id));
    }

    pub fn set_result(&self, job_id: &JobId, code: StoreStatusCode, result: JsonValue) {
        self.set_result_raw(job_id, codec::encode_result(job_id, code, result));
    }

    pub fn set_result_raw(&self, job_id: &JobId, raw: RawRecord) {
        self.write().results.insert(job_id.clone(), raw);
    }

    /// Record `job_id` as claimed under delivery tag `tag`.
    pub fn insert_unacked(&self, tag: impl Into<String>, job_id: &JobId) {
        self.insert_unacked_raw(tag, codec::encode_unacked(job_id));
    }

    pub fn insert_unacked_raw(&self, tag: impl Into<String>, raw: RawRecord) {
        self.write().unacked.insert(tag.into(), raw);
    }

    pub fn remove_unacked(&self, tag: &str) {
        self.write().unacked.remove(tag);
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of store calls issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Views> {
        self.views.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Views> {
        self.views.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn round_trip(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn list_pending(&self) -> Result<Vec<RawRecord>, StoreError> {
        self.round_trip().await?;
        Ok(self.read().pending.clone())
    }

    async fn pending_len(&self) -> Result<u64, StoreError> {
        self.round_trip().await?;
        Ok(self.read().pending.len() as u64)
    }

    async fn get_result(&self, job_id: &JobId) -> Result<Option<RawRecord>, StoreError> {
        self.round_trip().await?;
        Ok(self.read().results.get(job_id).cloned())
    }

    async fn list_unacknowledged(&self) -> Result<HashMap<String, RawRecord>, StoreError> {
        self.round_trip().await?;
        Ok(self.read().unacked.clone())
    }
}
