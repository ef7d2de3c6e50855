//! Query API server for the Shairport metadata bridge.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`GET /metadata`** -- the current now-playing snapshot as JSON
//! - **`GET /health`** -- a constant liveness payload
//!
//! # Architecture
//!
//! Handlers take a fresh snapshot from the shared
//! [`StateStore`](shairport_metadata_core::StateStore) on every request.
//! Nothing is cached, so each response reflects the state at the moment
//! of the call. The store lock is held only for the copy; serialization
//! and base64 encoding happen outside it.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use response::{HealthResponse, MetadataResponse};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
