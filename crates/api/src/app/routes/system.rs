use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto::ReadinessResponse;
use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Ready once the store answers a bounded query.
pub async fn ready(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let ready = match services.status().queue_length().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "store not ready");
            false
        }
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            store: services.backend(),
            ready,
        }),
    )
        .into_response()
}
