//! # Rookery
//!
//! An autonomous agent that plays turn-based games over a Lichess-style
//! bot API. It subscribes to the account event stream, admits or queues
//! incoming challenges, and drives exactly one game at a time, asking an
//! external engine for each move.
//!
//! ## How the pieces fit
//!
//! ```text
//! account event stream ──→ Agent (dispatcher)
//!                            ├─ challenge / challengeCanceled → Admission
//!                            ├─ gameStart → GameSession (blocks until the
//!                            │              game's own stream ends)
//!                            └─ gameFinish → Admission (drain backlog)
//! ```
//!
//! Everything runs on a single logical task: at most one game session
//! exists at any time, so there are no cross-session races to lock
//! against. The activity flag and challenge backlog live in
//! [`Admission`] and are touched only from the dispatcher's control
//! flow.

mod admission;
mod config;
mod dispatcher;
mod error;
mod game;

#[cfg(test)]
pub(crate) mod testutil;

pub use admission::{Admission, AdmissionRules};
pub use config::AgentConfig;
pub use dispatcher::Agent;
pub use error::{AgentError, ConfigError};
pub use game::{GameSession, SessionState};
