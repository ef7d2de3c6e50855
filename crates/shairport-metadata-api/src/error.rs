//! Error types for the query API.
//!
//! [`ApiError`] is scoped to one request. It is converted into an Axum
//! HTTP response via its [`IntoResponse`](axum::response::IntoResponse)
//! implementation and never touches the state store.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while answering a query.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No route matches the request path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(path) => (StatusCode::NOT_FOUND, format!("no route for {path}")),
            Self::Serialization(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
