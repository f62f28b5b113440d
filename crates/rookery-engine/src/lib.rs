//! Move provider for the Rookery bot agent.
//!
//! The agent does not know the rules of the game. When it is its turn
//! it hands the full move history to a [`MoveProvider`] and plays
//! whatever comes back. The production implementation,
//! [`ProcessProvider`], shells out to an external engine binary the
//! way the platform's reference bots do: history as argv, one move on
//! stdout.
//!
//! A provider is invoked at most once at a time — the orchestrator
//! only ever runs a single game, and within it a single turn.

#![allow(async_fn_in_trait)]

mod error;

pub use error::EngineError;

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use rookery_protocol::Move;
use tokio::process::Command;
use tracing::{debug, warn};

/// Produces the next move for a position described by its history.
pub trait MoveProvider: Send + Sync {
    /// Computes the next move.
    ///
    /// `Ok(None)` means no move could be produced in time. The caller
    /// treats that as a failed turn, not a crash.
    async fn compute(
        &self,
        history: &[Move],
    ) -> Result<Option<Move>, EngineError>;
}

/// A [`MoveProvider`] that runs an external engine binary.
///
/// The engine is spawned fresh for every turn with the move history as
/// command-line arguments and is expected to print exactly one move to
/// stdout. The wait is bounded: if the engine has not finished within
/// `timeout`, the turn is given up (`Ok(None)`) and the process is
/// killed.
pub struct ProcessProvider {
    program: PathBuf,
    timeout: Duration,
}

impl ProcessProvider {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl MoveProvider for ProcessProvider {
    async fn compute(
        &self,
        history: &[Move],
    ) -> Result<Option<Move>, EngineError> {
        debug!(plies = history.len(), engine = %self.program.display(), "invoking engine");

        let mut cmd = Command::new(&self.program);
        cmd.args(history.iter().map(Move::as_str))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output =
            match tokio::time::timeout(self.timeout, cmd.output()).await {
                Ok(output) => output?,
                Err(_) => {
                    warn!(
                        timeout_s = self.timeout.as_secs_f64(),
                        "engine ran out of time"
                    );
                    return Ok(None);
                }
            };

        if !output.status.success() {
            return Err(EngineError::Exited(output.status));
        }

        Ok(normalize(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Cleans up raw engine output into a move.
///
/// The engine appends a `*` marker to four-character moves; it is
/// stripped here so the platform only ever sees plain notation. Empty
/// output means the engine had nothing to play.
fn normalize(raw: &str) -> Option<Move> {
    let mut mv = raw.trim();
    if mv.len() == 5 && mv.ends_with('*') {
        mv = &mv[..4];
    }
    if mv.is_empty() {
        None
    } else {
        Some(Move(mv.to_string()))
    }
}
