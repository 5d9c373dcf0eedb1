//! Gateway error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use bazaar_core::CoreError;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GatewayError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            GatewayError::Core(e) => match e {
                // Network failed and nothing cached could stand in for it
                CoreError::Fetch(inner) => {
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_UNREACHABLE", inner.to_string())
                }
                CoreError::NotInstalled => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NOT_INSTALLED",
                    "Cache worker has not completed install".to_string(),
                ),
                CoreError::NotActive => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NOT_ACTIVE",
                    "Cache worker is not active".to_string(),
                ),
                CoreError::OfflineFallbackMissing => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "OFFLINE_PAGE_MISSING",
                    "Offline fallback page missing from cache".to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    e.to_string(),
                ),
            },
        };

        let body = axum::Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
