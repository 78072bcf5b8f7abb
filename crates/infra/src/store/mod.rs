//! Job store boundary.
//!
//! `QueueStore` is the read-only capability the resolver needs; adapters live
//! alongside it.

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis_broker;
pub mod timeout;
pub mod r#trait;

pub use in_memory::InMemoryQueueStore;
#[cfg(feature = "redis")]
pub use redis_broker::RedisQueueStore;
pub use timeout::TimeoutQueueStore;
pub use r#trait::{QueueStore, RawRecord, StoreError, result_key};
