//! The wire envelope applied to every response body.
//!
//! Success: `{"status": "success", "data": <payload>}` with HTTP 200.
//! Failure: `{"status": "fail", "data": "<message>"}` with HTTP 400,
//! regardless of whether validation or storage failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use jsonvault_core::VaultError;

#[derive(Debug, Serialize)]
struct Envelope<T> {
    status: &'static str,
    data: T,
}

/// Wrap a payload in the success envelope.
pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            status: "success",
            data,
        }),
    )
        .into_response()
}

/// Any error a handler surfaces. Only the message is kept; the router never
/// branches on error internals.
#[derive(Debug)]
pub struct ApiError(pub String);

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        Self(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(Envelope {
                status: "fail",
                data: self.0,
            }),
        )
            .into_response()
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
