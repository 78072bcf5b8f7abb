use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use jobstatus_core::StatusError;

pub fn status_error_to_response(err: StatusError) -> axum::response::Response {
    let status = match &err {
        StatusError::StoreUnavailable(_) | StatusError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        StatusError::PositionRace(_) => StatusCode::SERVICE_UNAVAILABLE,
        StatusError::InvalidJobId(_) => StatusCode::BAD_REQUEST,
        StatusError::MalformedRecord(_) | StatusError::UnknownStatusCode(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    // Already recorded at ERROR by the failing operation's span.
    tracing::debug!(code = err.code(), %status, "status error mapped to response");

    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
