//! Topic prefix handling.
//!
//! Shairport Sync publishes under a configurable namespace such as
//! `shairport-sync/title`. Classification works on the part after the
//! namespace.

/// Topic namespace Shairport Sync uses unless configured otherwise.
pub const DEFAULT_TOPIC_PREFIX: &str = "shairport-sync";

/// Strip `prefix/` from `topic`.
///
/// Topics outside the namespace are returned unchanged so that an
/// unexpected publisher layout still gets classified instead of dropped.
pub fn relative_topic<'a>(prefix: &str, topic: &'a str) -> &'a str {
    topic
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(topic)
}

/// Normalize a configured prefix by dropping trailing slashes.
pub fn normalize_prefix(prefix: &str) -> &str {
    prefix.trim_end_matches('/')
}
