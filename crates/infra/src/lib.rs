//! Infrastructure layer: store adapters, record decoding, status resolution.

pub mod codec;
pub mod config;
pub mod resolver;
pub mod service;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use resolver::StatusResolver;
pub use service::JobStatusService;
pub use store::{InMemoryQueueStore, QueueStore, StoreError, TimeoutQueueStore};
#[cfg(feature = "redis")]
pub use store::RedisQueueStore;
