//! Error types for the move provider.

/// Errors from invoking the external engine.
///
/// A slow engine is NOT an error — running out of time maps to
/// `Ok(None)` from [`MoveProvider::compute`](crate::MoveProvider::compute),
/// which the session treats as a failed turn.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine process could not be spawned or its output read.
    #[error("engine process failed: {0}")]
    Process(#[from] std::io::Error),

    /// The engine exited with a non-zero status.
    #[error("engine exited with {0}")]
    Exited(std::process::ExitStatus),
}
