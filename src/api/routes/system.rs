//! System handlers: health, OpenAPI, fallbacks.

use crate::error::ApiError;
use axum::{Json, response::IntoResponse};
use serde_json::json;

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI 3.1 specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Fallback for unsupported methods on known paths
pub async fn method_not_allowed() -> ApiError {
    tracing::warn!("Rejected request with unsupported method");
    ApiError::method_not_allowed()
}
