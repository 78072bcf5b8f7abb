use serde::Serialize;

use jobstatus_core::{JobId, JobOutcome};

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct QueueLengthResponse {
    pub length: u64,
}

#[derive(Debug, Serialize)]
pub struct QueuedIdsResponse {
    pub ids: Vec<JobId>,
}

#[derive(Debug, Serialize)]
pub struct JobResultResponse {
    pub job_id: JobId,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub store: &'static str,
    pub ready: bool,
}
