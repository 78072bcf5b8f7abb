//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the shared status service
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::{BoxError, Extension, Router};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Requests that run past `request_timeout` are answered with 408.
pub fn build_app(services: AppServices, request_timeout: Duration) -> Router {
    routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
}

async fn handle_middleware_error(err: BoxError) -> axum::response::Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        return errors::json_error(
            StatusCode::REQUEST_TIMEOUT,
            "request_timeout",
            "request took too long",
        );
    }

    tracing::error!(error = %err, "unhandled middleware error");
    errors::json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "internal server error",
    )
}
