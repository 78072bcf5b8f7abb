use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use jobstatus_infra::{
    InMemoryQueueStore, JobStatusService, QueueStore, StoreConfig, StoreError,
};

use crate::config::ApiConfig;

/// Status service over a type-erased store.
pub type DynStatusService = JobStatusService<Arc<dyn QueueStore>>;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppServices {
    status: DynStatusService,
    backend: &'static str,
    shutdown: CancellationToken,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn QueueStore>,
        backend: &'static str,
        store_config: &StoreConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            status: JobStatusService::from_config(store, store_config),
            backend,
            shutdown,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory(store: Arc<InMemoryQueueStore>, store_config: &StoreConfig) -> Self {
        Self::new(store, "memory", store_config, CancellationToken::new())
    }

    pub fn status(&self) -> &DynStatusService {
        &self.status
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Fires when the server starts shutting down.
    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }
}

pub async fn build_services(
    api_config: &ApiConfig,
    store_config: &StoreConfig,
    shutdown: CancellationToken,
) -> Result<AppServices, StoreError> {
    if api_config.use_persistent_stores {
        #[cfg(feature = "redis")]
        {
            return build_persistent_services(store_config, shutdown).await;
        }
        #[cfg(not(feature = "redis"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but redis feature not enabled, falling back to in-memory"
            );
        }
    }

    tracing::info!("using in-memory job store");
    Ok(AppServices::new(
        InMemoryQueueStore::arc(),
        "memory",
        store_config,
        shutdown,
    ))
}

#[cfg(feature = "redis")]
async fn build_persistent_services(
    store_config: &StoreConfig,
    shutdown: CancellationToken,
) -> Result<AppServices, StoreError> {
    let store = jobstatus_infra::RedisQueueStore::connect(store_config).await?;

    tracing::info!(
        queue = %store_config.queue_name,
        result_namespace = %store_config.result_namespace,
        "using redis job store"
    );

    Ok(AppServices::new(
        Arc::new(store),
        "redis",
        store_config,
        shutdown,
    ))
}
