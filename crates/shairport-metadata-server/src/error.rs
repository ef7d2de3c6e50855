//! Error types for the bridge binary.
//!
//! Uses `thiserror` for typed startup errors. Runtime failures (bad
//! events, broker disconnects) are logged where they happen and never
//! reach `main`.

/// Invalid configuration detected before anything connects.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required text option was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The topic prefix contains an MQTT wildcard.
    #[error("topic prefix `{0}` must not contain `#` or `+`")]
    WildcardPrefix(String),

    /// The MQTT keep-alive interval was zero.
    #[error("MQTT keep-alive must be at least one second")]
    ZeroKeepAlive,
}
