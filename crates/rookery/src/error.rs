//! Error types for the orchestration core.
//!
//! Very little is fatal here: malformed events are skipped, failed
//! writes resign or abort the affected game, and a dropped event stream
//! is reopened. What remains fatal is exactly what the agent cannot run
//! without — its identity and an event source.

use rookery_client::ClientError;

/// Errors that end the agent process.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The startup identity fetch failed; without it the agent cannot
    /// tell which side it plays.
    #[error("could not fetch account identity: {0}")]
    Identity(#[source] ClientError),

    /// The account event stream could not be opened even after the
    /// bounded retries. No event source is unrecoverable.
    #[error("event stream unavailable: {0}")]
    EventStreamUnavailable(#[source] ClientError),

    /// Startup configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors while reading startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}
