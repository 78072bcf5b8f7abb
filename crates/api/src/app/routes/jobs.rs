use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use jobstatus_core::JobId;

use crate::app::dto::JobResultResponse;
use crate::app::errors;
use crate::app::services::AppServices;

fn parse_job_id(raw: &str) -> Result<JobId, axum::response::Response> {
    raw.parse::<JobId>()
        .map_err(errors::status_error_to_response)
}

/// `GET /jobs/:job_id`: current status, with `queue_position` when queued.
pub async fn get_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services
        .status()
        .get_status_with_cancel(&job_id, services.shutdown())
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::status_error_to_response(e),
    }
}

/// `GET /jobs/:job_id/result`: stored result payload.
pub async fn get_result(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.status().get_result(&job_id).await {
        Ok(Some(outcome)) => (
            StatusCode::OK,
            Json(JobResultResponse { job_id, outcome }),
        )
            .into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no result recorded for job {job_id}"),
        ),
        Err(e) => errors::status_error_to_response(e),
    }
}
