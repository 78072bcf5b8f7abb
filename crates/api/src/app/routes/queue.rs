use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto::{QueueLengthResponse, QueuedIdsResponse};
use crate::app::errors;
use crate::app::services::AppServices;

/// `GET /queue/length`
pub async fn queue_length(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.status().queue_length().await {
        Ok(length) => (StatusCode::OK, Json(QueueLengthResponse { length })).into_response(),
        Err(e) => errors::status_error_to_response(e),
    }
}

/// `GET /queue`: queued job ids, front of the pending list first.
pub async fn list_queued_ids(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.status().queued_ids().await {
        Ok(ids) => (StatusCode::OK, Json(QueuedIdsResponse { ids })).into_response(),
        Err(e) => errors::status_error_to_response(e),
    }
}
