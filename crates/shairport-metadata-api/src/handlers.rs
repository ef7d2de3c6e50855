//! REST API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/metadata` | Current now-playing snapshot |
//! | `GET` | `/health` | Liveness probe |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::Uri;
use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::response::{HealthResponse, MetadataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /metadata -- current now-playing snapshot
// ---------------------------------------------------------------------------

/// Return the current playback metadata.
///
/// Artwork is base64-encoded after the store lock is released.
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.store.snapshot().await;
    let body = MetadataResponse::from(&snapshot);
    Ok(Json(serde_json::to_value(body)?))
}

// ---------------------------------------------------------------------------
// GET /health -- liveness probe
// ---------------------------------------------------------------------------

/// Constant liveness payload. Does not touch the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// JSON 404 for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_owned())
}
