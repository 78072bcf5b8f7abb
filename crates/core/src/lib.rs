//! `jobstatus-core`: job status vocabulary and pure resolution primitives.
//!
//! This crate contains no store access; see `jobstatus-infra` for adapters
//! and the resolver.

pub mod error;
pub mod id;
pub mod position;
pub mod status;

pub use error::{StatusError, StatusResult};
pub use id::JobId;
pub use position::{queue_position, QueuePosition};
pub use status::{map_store_code, JobOutcome, JobStatus, StatusReport, StoreStatusCode};
