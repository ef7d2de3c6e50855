//! The now-playing record.
//!
//! [`PlaybackState`] is an accumulator: each event touches only the
//! fields it names and leaves the rest alone. Fields are private and
//! only [`Action::apply_to`](crate::Action::apply_to) can change them,
//! which keeps two rules true at all times:
//!
//! - `is_playing()` is `true` exactly when the player state is
//!   [`PlayerState::Playing`] (it is derived, not stored).
//! - Entering [`PlayerState::Stopped`] clears title, artist, album and
//!   artwork in the same step.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Transport state of the `AirPlay` receiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Nothing is playing. Track metadata is empty in this state.
    #[default]
    Stopped,
    /// Audio is playing.
    Playing,
    /// Playback is paused. Track metadata is kept.
    Paused,
}

/// Current playback metadata.
///
/// Created once with [`Default`] values and then mutated exclusively
/// through [`Action`](crate::Action)s. Cloning is cheap: the artwork is
/// an immutable shared buffer that is replaced wholesale, never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) album: String,
    pub(crate) genre: String,
    pub(crate) artwork: Option<Arc<[u8]>>,
    pub(crate) player_state: PlayerState,
    pub(crate) volume: f64,
    pub(crate) client_name: String,
}

impl PlaybackState {
    /// Track title, empty when unknown or stopped.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Track artist, empty when unknown or stopped.
    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Album name, empty when unknown or stopped.
    pub fn album(&self) -> &str {
        &self.album
    }

    /// Genre. Not cleared on stop.
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Raw cover art bytes as published by the receiver, if any.
    pub fn artwork(&self) -> Option<&[u8]> {
        self.artwork.as_deref()
    }

    /// Whether audio is currently playing.
    pub fn is_playing(&self) -> bool {
        self.player_state == PlayerState::Playing
    }

    /// Transport state.
    pub const fn player_state(&self) -> PlayerState {
        self.player_state
    }

    /// Last volume reported by the receiver.
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    /// Name of the `AirPlay` client device that is streaming.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Transition to [`PlayerState::Stopped`] and drop track metadata.
    pub(crate) fn stop(&mut self) {
        self.player_state = PlayerState::Stopped;
        self.title.clear();
        self.artist.clear();
        self.album.clear();
        self.artwork = None;
    }
}
