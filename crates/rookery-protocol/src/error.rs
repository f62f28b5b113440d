//! Error types for the protocol layer.

/// Errors that can occur while decoding stream records.
///
/// A malformed line is never fatal to the agent — the dispatcher logs
/// it and moves on to the next line — but it is still surfaced as a
/// real error so callers decide, rather than the decoder guessing.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A non-blank line was not valid JSON, or did not match the
    /// expected record shape (missing fields, wrong types).
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
