//! Redis-backed job store adapter.
//!
//! Reads the broker's pending list (LRANGE / LLEN), the per-job result keys
//! (GET) and the unacknowledged hash (HGETALL). Never issues KEYS or SCAN.
//!
//! Uses a `ConnectionManager`: one multiplexed connection that reconnects on
//! failure and is cheap to clone, so concurrent resolutions share it safely.

use std::collections::HashMap;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, instrument};

use jobstatus_core::JobId;

use super::r#trait::{QueueStore, RawRecord, StoreError, result_key};
use crate::config::StoreConfig;

/// Store adapter over a Redis broker + result backend.
#[derive(Clone)]
pub struct RedisQueueStore {
    conn: ConnectionManager,
    queue_key: String,
    result_namespace: String,
    unacked_key: String,
}

impl std::fmt::Debug for RedisQueueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisQueueStore")
            .field("queue_key", &self.queue_key)
            .field("result_namespace", &self.result_namespace)
            .field("unacked_key", &self.unacked_key)
            .finish_non_exhaustive()
    }
}

fn map_redis_error(op: &str, err: redis::RedisError) -> StoreError {
    StoreError::Unavailable(format!("{op} failed: {err}"))
}

impl RedisQueueStore {
    /// Connect to Redis using the given configuration.
    ///
    /// The initial connection attempt is bounded by `config.timeout`.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.redis_url.as_str())
            .map_err(|e| map_redis_error("open client", e))?;

        let conn = tokio::time::timeout(config.timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Timeout {
                op: "connect",
                timeout_ms: config.timeout.as_millis() as u64,
            })?
            .map_err(|e| map_redis_error("connect", e))?;

        debug!(queue = %config.queue_name, "connected to redis job store");

        Ok(Self::with_connection(conn, config))
    }

    /// Build an adapter over an existing connection.
    pub fn with_connection(conn: ConnectionManager, config: &StoreConfig) -> Self {
        Self {
            conn,
            queue_key: config.queue_name.clone(),
            result_namespace: config.result_namespace.clone(),
            unacked_key: config.unacked_key.clone(),
        }
    }
}

#[async_trait::async_trait]
impl QueueStore for RedisQueueStore {
    #[instrument(skip(self), fields(queue = %self.queue_key), err)]
    async fn list_pending(&self) -> Result<Vec<RawRecord>, StoreError> {
        let mut conn = self.conn.clone();
        conn.lrange(&self.queue_key, 0, -1)
            .await
            .map_err(|e| map_redis_error("LRANGE", e))
    }

    #[instrument(skip(self), fields(queue = %self.queue_key), err)]
    async fn pending_len(&self) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        conn.llen(&self.queue_key)
            .await
            .map_err(|e| map_redis_error("LLEN", e))
    }

    #[instrument(skip(self), err)]
    async fn get_result(&self, job_id: &JobId) -> Result<Option<RawRecord>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get(result_key(&self.result_namespace, job_id))
            .await
            .map_err(|e| map_redis_error("GET", e))
    }

    #[instrument(skip(self), fields(key = %self.unacked_key), err)]
    async fn list_unacknowledged(&self) -> Result<HashMap<String, RawRecord>, StoreError> {
        let mut conn = self.conn.clone();
        conn.hgetall(&self.unacked_key)
            .await
            .map_err(|e| map_redis_error("HGETALL", e))
    }
}
