//! Shared application state for the query API server.

use std::sync::Arc;

use shairport_metadata_core::StateStore;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. Holds
/// the same [`StateStore`] the ingest loop writes to; handlers only
/// ever read from it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The now-playing store.
    pub store: Arc<StateStore>,
}

impl AppState {
    /// Create application state around an existing store.
    pub const fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(StateStore::new()))
    }
}
