//! Error types for event ingestion.
//!
//! An [`IngestError`] describes why one event was dropped. It never
//! escapes the ingest loop: [`Ingestor::run`](crate::Ingestor::run)
//! logs it and moves on to the next event.

/// Errors that can occur while decoding a single event.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// A text payload was not valid UTF-8.
    #[error("payload on `{topic}` is not valid UTF-8: {source}")]
    InvalidUtf8 {
        /// Relative topic the payload arrived on.
        topic: String,
        /// The underlying decode error.
        source: std::str::Utf8Error,
    },

    /// A volume payload was not a finite floating-point number.
    #[error("invalid volume payload `{value}`")]
    InvalidVolume {
        /// The decoded payload text.
        value: String,
    },
}
