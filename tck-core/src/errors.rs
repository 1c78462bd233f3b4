//! Error types for tck-core.
//!
//! Protocol violations are not errors: they are verdicts written by the
//! monitor. `TckError` covers the cases where an input cannot be interpreted
//! at all (undecodable payload, malformed topic) or where a registry
//! operation would break a structural invariant.

/// Unified error type for tck-core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TckError {
    /// Payload bytes did not decode as the claimed schema.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Topic is not a well-formed Sparkplug or STATE topic.
    #[error("Topic error: {0}")]
    Topic(String),

    /// Session registry operation rejected (e.g. device without a live
    /// parent edge node).
    #[error("Session error: {0}")]
    Session(String),
}

impl From<prost::DecodeError> for TckError {
    fn from(err: prost::DecodeError) -> Self {
        TckError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for TckError {
    fn from(err: serde_json::Error) -> Self {
        TckError::Decode(err.to_string())
    }
}
