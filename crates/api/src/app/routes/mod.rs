use axum::{routing::get, Router};

pub mod jobs;
pub mod queue;
pub mod system;

/// Router for every endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/ready", get(system::ready))
        .route("/jobs/:job_id", get(jobs::get_status))
        .route("/jobs/:job_id/result", get(jobs::get_result))
        .route("/queue", get(queue::list_queued_ids))
        .route("/queue/length", get(queue::queue_length))
}
