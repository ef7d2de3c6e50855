//! Now-playing state engine for the Shairport metadata server.
//!
//! Shairport Sync publishes track metadata and transport events as
//! individual topic/payload messages. This crate folds that unordered
//! stream into a single [`PlaybackState`] record that readers can
//! snapshot at any time.
//!
//! # Modules
//!
//! - [`state`] -- The [`PlaybackState`] record and [`PlayerState`] enum
//! - [`action`] -- The closed set of [`Action`]s and topic classification
//! - [`topic`] -- Topic prefix handling
//! - [`store`] -- [`StateStore`], the mutex-guarded single source of truth
//! - [`ingest`] -- [`Ingestor`], which drives events into the store
//! - [`error`] -- Per-event failure type
//!
//! # Architecture
//!
//! ```text
//! event source --> Ingestor (classify + apply) --> StateStore <-- readers (snapshot)
//! ```
//!
//! Every write and every read holds the same lock for the full operation,
//! so a reader never sees a half-applied transition.

pub mod action;
pub mod error;
pub mod ingest;
pub mod state;
pub mod store;
pub mod topic;

// Re-export primary types for convenience.
pub use action::Action;
pub use error::IngestError;
pub use ingest::{IngestStats, Ingested, Ingestor, RawEvent};
pub use state::{PlaybackState, PlayerState};
pub use store::StateStore;
pub use topic::{DEFAULT_TOPIC_PREFIX, relative_topic};
