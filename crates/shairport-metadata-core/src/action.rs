//! The closed set of state mutations and the topic table that produces them.
//!
//! | relative topic | action |
//! |---|---|
//! | `title` / `artist` / `album` / `genre` | set the text field |
//! | `cover`, `artwork` | replace artwork (empty payload clears it) |
//! | `play_start`, `play_resume` | [`Action::PlaybackStart`] |
//! | `play_end`, `play_flush` | [`Action::PlaybackEnd`] |
//! | `pause` | [`Action::Pause`] |
//! | `volume` | [`Action::Volume`] |
//! | `client_name` | [`Action::ClientName`] |
//! | `active_start` | [`Action::SessionStart`] |
//! | `active_end` | [`Action::SessionEnd`] |
//!
//! Any other topic is not an error; [`Action::classify`] returns `None`.

use std::sync::Arc;

use crate::error::IngestError;
use crate::state::{PlaybackState, PlayerState};

/// A single mutation of [`PlaybackState`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Set the track title.
    Title(String),
    /// Set the track artist.
    Artist(String),
    /// Set the album name.
    Album(String),
    /// Set the genre.
    Genre(String),
    /// Replace the cover art, or clear it with `None`.
    Artwork(Option<Arc<[u8]>>),
    /// Playback started or resumed.
    PlaybackStart,
    /// Playback ended or the buffer was flushed. Clears track metadata.
    PlaybackEnd,
    /// Playback paused. Track metadata is kept.
    Pause,
    /// New volume level.
    Volume(f64),
    /// Name of the streaming client.
    ClientName(String),
    /// An `AirPlay` session began. Informational only.
    SessionStart,
    /// The `AirPlay` session ended. Clears track metadata.
    SessionEnd,
}

impl Action {
    /// Map a relative topic and its payload to an action.
    ///
    /// Returns `Ok(None)` for topics outside the table. Returns an error
    /// when the payload cannot be decoded for a recognized topic.
    pub fn classify(topic: &str, payload: &[u8]) -> Result<Option<Self>, IngestError> {
        let action = match topic {
            "title" => Self::Title(decode_text(topic, payload)?),
            "artist" => Self::Artist(decode_text(topic, payload)?),
            "album" => Self::Album(decode_text(topic, payload)?),
            "genre" => Self::Genre(decode_text(topic, payload)?),
            "cover" | "artwork" => {
                Self::Artwork((!payload.is_empty()).then(|| Arc::from(payload)))
            }
            "play_start" | "play_resume" => Self::PlaybackStart,
            "play_end" | "play_flush" => Self::PlaybackEnd,
            "pause" => Self::Pause,
            "volume" => Self::Volume(parse_volume(&decode_text(topic, payload)?)?),
            "client_name" => Self::ClientName(decode_text(topic, payload)?),
            "active_start" => Self::SessionStart,
            "active_end" => Self::SessionEnd,
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    /// Short label used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Artist(_) => "artist",
            Self::Album(_) => "album",
            Self::Genre(_) => "genre",
            Self::Artwork(_) => "artwork",
            Self::PlaybackStart => "playback_start",
            Self::PlaybackEnd => "playback_end",
            Self::Pause => "pause",
            Self::Volume(_) => "volume",
            Self::ClientName(_) => "client_name",
            Self::SessionStart => "session_start",
            Self::SessionEnd => "session_end",
        }
    }

    /// Whether this action changes the transport state.
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::PlaybackStart
                | Self::PlaybackEnd
                | Self::Pause
                | Self::SessionStart
                | Self::SessionEnd
        )
    }

    /// Fold this action into `state`.
    pub fn apply_to(self, state: &mut PlaybackState) {
        match self {
            Self::Title(title) => state.title = title,
            Self::Artist(artist) => state.artist = artist,
            Self::Album(album) => state.album = album,
            Self::Genre(genre) => state.genre = genre,
            Self::Artwork(artwork) => state.artwork = artwork,
            Self::PlaybackStart => state.player_state = PlayerState::Playing,
            Self::Pause => state.player_state = PlayerState::Paused,
            Self::PlaybackEnd | Self::SessionEnd => state.stop(),
            Self::Volume(volume) => state.volume = volume,
            Self::ClientName(name) => state.client_name = name,
            Self::SessionStart => {}
        }
    }
}

fn decode_text(topic: &str, payload: &[u8]) -> Result<String, IngestError> {
    std::str::from_utf8(payload)
        .map(str::to_owned)
        .map_err(|source| IngestError::InvalidUtf8 {
            topic: topic.to_owned(),
            source,
        })
}

fn parse_volume(text: &str) -> Result<f64, IngestError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| IngestError::InvalidVolume {
            value: text.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(topic: &str, payload: &[u8]) -> Option<Action> {
        Action::classify(topic, payload).ok().flatten()
    }

    fn playing_state() -> PlaybackState {
        let mut state = PlaybackState::default();
        for action in [
            Action::Title(String::from("Song A")),
            Action::Artist(String::from("Band B")),
            Action::Album(String::from("Album C")),
            Action::Genre(String::from("Rock")),
            Action::Artwork(Some(Arc::from(vec![0xFF_u8, 0xD8]))),
            Action::Volume(-20.0),
            Action::ClientName(String::from("iPhone")),
            Action::PlaybackStart,
        ] {
            action.apply_to(&mut state);
        }
        state
    }

    #[test]
    fn text_topics_classify_to_fields() {
        assert_eq!(classify("title", b"Song"), Some(Action::Title(String::from("Song"))));
        assert_eq!(classify("artist", b"Band"), Some(Action::Artist(String::from("Band"))));
        assert_eq!(classify("album", b"LP"), Some(Action::Album(String::from("LP"))));
        assert_eq!(classify("genre", b"Pop"), Some(Action::Genre(String::from("Pop"))));
        assert_eq!(
            classify("client_name", b"Kitchen iPad"),
            Some(Action::ClientName(String::from("Kitchen iPad")))
        );
    }

    #[test]
    fn transport_topics_share_actions() {
        assert_eq!(classify("play_start", b""), Some(Action::PlaybackStart));
        assert_eq!(classify("play_resume", b"--"), Some(Action::PlaybackStart));
        assert_eq!(classify("play_end", b""), Some(Action::PlaybackEnd));
        assert_eq!(classify("play_flush", b""), Some(Action::PlaybackEnd));
        assert_eq!(classify("pause", b""), Some(Action::Pause));
        assert_eq!(classify("active_start", b""), Some(Action::SessionStart));
        assert_eq!(classify("active_end", b""), Some(Action::SessionEnd));
    }

    #[test]
    fn cover_and_artwork_are_aliases() {
        let cover = classify("cover", &[1, 2, 3]);
        let artwork = classify("artwork", &[1, 2, 3]);
        assert_eq!(cover, artwork);
        assert_eq!(cover, Some(Action::Artwork(Some(Arc::from(vec![1_u8, 2, 3])))));
    }

    #[test]
    fn empty_cover_clears_artwork() {
        assert_eq!(classify("cover", b""), Some(Action::Artwork(None)));
    }

    #[test]
    fn artwork_is_not_utf8_decoded() {
        assert!(classify("cover", &[0xFF, 0xFE, 0x00]).is_some());
    }

    #[test]
    fn unknown_topic_is_ignored() {
        assert!(matches!(Action::classify("track_id", b"abc"), Ok(None)));
        assert!(matches!(Action::classify("", b""), Ok(None)));
        assert!(matches!(Action::classify("Title", b"x"), Ok(None)));
    }

    #[test]
    fn invalid_utf8_text_is_an_error() {
        let result = Action::classify("title", &[0xC3, 0x28]);
        assert!(matches!(result, Err(IngestError::InvalidUtf8 { ref topic, .. }) if topic == "title"));
    }

    #[test]
    fn volume_parses_floats() {
        assert_eq!(classify("volume", b"50"), Some(Action::Volume(50.0)));
        assert_eq!(classify("volume", b"-24.5"), Some(Action::Volume(-24.5)));
        assert_eq!(classify("volume", b" 12.25\n"), Some(Action::Volume(12.25)));
    }

    #[test]
    fn malformed_volume_is_an_error() {
        for payload in [&b"loud"[..], b"", b"-24.06,0.00,0.00,0.00", b"nan", b"inf"] {
            assert!(
                matches!(
                    Action::classify("volume", payload),
                    Err(IngestError::InvalidVolume { .. })
                ),
                "payload {payload:?} should be rejected"
            );
        }
    }

    #[test]
    fn playback_start_sets_playing() {
        let mut state = PlaybackState::default();
        Action::PlaybackStart.apply_to(&mut state);
        assert!(state.is_playing());
        assert_eq!(state.player_state(), PlayerState::Playing);
    }

    #[test]
    fn stop_actions_clear_track_metadata() {
        for stop in [Action::PlaybackEnd, Action::SessionEnd] {
            let mut state = playing_state();
            stop.apply_to(&mut state);
            assert_eq!(state.title(), "");
            assert_eq!(state.artist(), "");
            assert_eq!(state.album(), "");
            assert!(state.artwork().is_none());
            assert!(!state.is_playing());
            assert_eq!(state.player_state(), PlayerState::Stopped);
            assert_eq!(state.genre(), "Rock");
            assert_eq!(state.client_name(), "iPhone");
        }
    }

    #[test]
    fn pause_keeps_track_metadata() {
        let mut state = playing_state();
        Action::Pause.apply_to(&mut state);
        assert_eq!(state.player_state(), PlayerState::Paused);
        assert!(!state.is_playing());
        assert_eq!(state.title(), "Song A");
        assert!(state.artwork().is_some());
    }

    #[test]
    fn pause_is_idempotent() {
        let mut once = playing_state();
        Action::Pause.apply_to(&mut once);
        let mut twice = once.clone();
        Action::Pause.apply_to(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn session_start_changes_nothing() {
        let before = playing_state();
        let mut after = before.clone();
        Action::SessionStart.apply_to(&mut after);
        assert_eq!(before, after);
    }

    #[test]
    fn untargeted_fields_are_preserved() {
        let mut state = PlaybackState::default();
        Action::Title(String::from("X")).apply_to(&mut state);
        Action::Volume(50.0).apply_to(&mut state);
        assert_eq!(state.title(), "X");
        assert!((state.volume() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn transport_flag_matches_variants() {
        assert!(Action::Pause.is_transport());
        assert!(Action::SessionEnd.is_transport());
        assert!(!Action::Volume(1.0).is_transport());
        assert!(!Action::Artwork(None).is_transport());
        assert_eq!(Action::PlaybackEnd.name(), "playback_end");
    }
}
