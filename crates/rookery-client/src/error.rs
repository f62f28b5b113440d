//! Error types for the session client.

/// Errors that can occur talking to the remote platform.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be completed at all (connect failure,
    /// TLS error, mid-stream disconnect, ...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-2xx status. `op` names the
    /// logical operation so log lines stay readable.
    #[error("{op} returned status {status}")]
    Status { op: &'static str, status: u16 },
}
