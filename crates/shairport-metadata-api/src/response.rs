//! JSON response contract consumed by display clients.
//!
//! Field names are part of the public contract. Both types export
//! `TypeScript` definitions via `ts-rs` so display plugins can type
//! their fetch calls.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use shairport_metadata_core::{PlaybackState, PlayerState};
use ts_rs::TS;

/// Body of `GET /metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MetadataResponse {
    /// Track title, empty when nothing is loaded.
    pub title: String,
    /// Track artist.
    pub artist: String,
    /// Album name.
    pub album: String,
    /// Genre.
    pub genre: String,
    /// Cover art as standard base64, or `null` when absent.
    pub artwork_base64: Option<String>,
    /// `true` exactly when `player_state` is `"playing"`.
    pub is_playing: bool,
    /// Transport state.
    #[ts(type = "\"stopped\" | \"playing\" | \"paused\"")]
    pub player_state: PlayerState,
    /// Last reported volume.
    pub volume: f64,
    /// Name of the streaming client device.
    pub client_name: String,
}

impl From<&PlaybackState> for MetadataResponse {
    fn from(state: &PlaybackState) -> Self {
        Self {
            title: state.title().to_owned(),
            artist: state.artist().to_owned(),
            album: state.album().to_owned(),
            genre: state.genre().to_owned(),
            artwork_base64: state.artwork().map(|bytes| STANDARD.encode(bytes)),
            is_playing: state.is_playing(),
            player_state: state.player_state(),
            volume: state.volume(),
            client_name: state.client_name().to_owned(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthResponse {
    /// Always `"ok"` while the server is answering.
    pub status: String,
}

impl HealthResponse {
    /// The liveness payload.
    pub fn ok() -> Self {
        Self {
            status: String::from("ok"),
        }
    }
}
