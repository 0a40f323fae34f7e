//! Error responses for the HTTP transport.
//!
//! [`ApiError`] converts into a JSON body `{"error": ..., "status": ...}`
//! via its [`IntoResponse`] implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use colloquy_core::SimulationError;

/// Errors a route can answer with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body or its values were rejected.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Something failed on the server side.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SimulationError> for ApiError {
    fn from(error: SimulationError) -> Self {
        match error {
            SimulationError::InvalidInput(msg) => Self::BadRequest(msg),
            SimulationError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
