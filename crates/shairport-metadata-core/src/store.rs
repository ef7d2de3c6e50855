//! The single source of truth for "now playing".
//!
//! [`StateStore`] owns exactly one [`PlaybackState`] behind one mutex.
//! Writers and readers take the same lock for the whole operation, so
//! a multi-field transition (for example stop + clear metadata) is
//! observed either entirely or not at all. Critical sections are a
//! handful of field assignments or a clone, so a plain mutex is enough.

use tokio::sync::Mutex;

use crate::action::Action;
use crate::state::PlaybackState;

/// Mutex-guarded holder of the current [`PlaybackState`].
///
/// Wrap in [`Arc`](std::sync::Arc) and share between the ingest task
/// and the HTTP handlers.
#[derive(Debug, Default)]
pub struct StateStore {
    state: Mutex<PlaybackState>,
}

impl StateStore {
    /// Create a store holding the default (stopped, empty) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action atomically.
    pub async fn apply(&self, action: Action) {
        let mut state = self.state.lock().await;
        action.apply_to(&mut state);
    }

    /// Copy the current state.
    ///
    /// The copy is taken under the lock and is never mid-transition.
    pub async fn snapshot(&self) -> PlaybackState {
        self.state.lock().await.clone()
    }
}
