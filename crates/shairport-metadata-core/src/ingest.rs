//! Event ingestion: raw topic/payload pairs in, state transitions out.
//!
//! [`Ingestor::ingest`] handles one event and reports what happened.
//! [`Ingestor::run`] drains an event stream for as long as the source
//! keeps it open. A failure on one event is logged and contained; the
//! loop always moves on to the next event.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tracing::{debug, info, trace, warn};

use crate::action::Action;
use crate::error::IngestError;
use crate::store::StateStore;
use crate::topic::{normalize_prefix, relative_topic};

/// One message as delivered by the event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Full topic, including the namespace prefix.
    pub topic: String,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
}

impl RawEvent {
    /// Build an event from a topic and payload.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// What [`Ingestor::ingest`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// The event mapped to an action, which was applied. Holds the action name.
    Applied(&'static str),
    /// The topic is not one we track.
    Ignored,
}

/// Counters reported when an event stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Events applied to the store.
    pub applied: u64,
    /// Events on unrecognized topics.
    pub ignored: u64,
    /// Events dropped because their payload could not be decoded.
    pub failed: u64,
}

/// Classifies events and applies them to a shared [`StateStore`].
#[derive(Debug, Clone)]
pub struct Ingestor {
    prefix: String,
    store: Arc<StateStore>,
}

impl Ingestor {
    /// Create an ingestor for topics under `prefix`.
    ///
    /// Trailing slashes on the prefix are ignored.
    pub fn new(prefix: &str, store: Arc<StateStore>) -> Self {
        Self {
            prefix: normalize_prefix(prefix).to_owned(),
            store,
        }
    }

    /// The normalized topic prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The store this ingestor writes to.
    pub const fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Classify and apply a single event.
    ///
    /// On error the store is left untouched.
    pub async fn ingest(&self, event: &RawEvent) -> Result<Ingested, IngestError> {
        let topic = relative_topic(&self.prefix, &event.topic);

        let Some(action) = Action::classify(topic, &event.payload)? else {
            trace!(topic = %event.topic, "ignoring unrecognized topic");
            return Ok(Ingested::Ignored);
        };

        log_action(&action);
        let name = action.name();
        self.store.apply(action).await;
        Ok(Ingested::Applied(name))
    }

    /// Drain `events` until the source closes it.
    ///
    /// Each failure is logged once and counted; it never stops the loop.
    pub async fn run<S>(&self, events: S) -> IngestStats
    where
        S: Stream<Item = RawEvent>,
    {
        let mut events = std::pin::pin!(events);
        let mut stats = IngestStats::default();

        info!(prefix = %self.prefix, "ingest loop started");

        while let Some(event) = events.next().await {
            match self.ingest(&event).await {
                Ok(Ingested::Applied(_)) => stats.applied = stats.applied.saturating_add(1),
                Ok(Ingested::Ignored) => stats.ignored = stats.ignored.saturating_add(1),
                Err(e) => {
                    stats.failed = stats.failed.saturating_add(1);
                    match &e {
                        IngestError::InvalidVolume { .. } => {
                            debug!(topic = %event.topic, error = %e, "volume left unchanged");
                        }
                        IngestError::InvalidUtf8 { .. } => {
                            warn!(topic = %event.topic, error = %e, "dropping malformed event");
                        }
                    }
                }
            }
        }

        info!(
            applied = stats.applied,
            ignored = stats.ignored,
            failed = stats.failed,
            "event stream closed"
        );
        stats
    }
}

/// Transport changes log at `info`; field updates at `debug`.
fn log_action(action: &Action) {
    if action.is_transport() {
        info!(transition = action.name(), "transport changed");
        return;
    }

    match action {
        Action::Title(value)
        | Action::Artist(value)
        | Action::Album(value)
        | Action::Genre(value)
        | Action::ClientName(value) => {
            debug!(field = action.name(), value = %value, "metadata updated");
        }
        Action::Artwork(Some(bytes)) => debug!(bytes = bytes.len(), "artwork received"),
        Action::Artwork(None) => debug!("artwork cleared"),
        Action::Volume(volume) => debug!(volume, "volume updated"),
        _ => debug!(field = action.name(), "metadata updated"),
    }
}
