//! Session client for the remote bot API.
//!
//! Everything the agent knows about the platform's HTTP surface lives
//! behind the [`BotApi`] trait: accepting and declining challenges,
//! posting moves, resigning, aborting, and opening the two NDJSON
//! streams. The orchestration core only ever talks to this trait, so
//! tests drive it with scripted in-memory implementations and the
//! binary plugs in [`HttpApi`].
//!
//! Retry behavior is deliberately *not* baked into the trait. The
//! [`retry`] module provides the two bounded policies the platform
//! contract specifies (stream opens: 5 attempts a second apart; move
//! posts: 5 immediate attempts) and the caller wraps exactly the
//! operations that warrant them. Everything else is issued once, and a
//! non-2xx response is an error for the caller to interpret.

#![allow(async_fn_in_trait)]

mod error;
mod http;
pub mod retry;

pub use error::ClientError;
pub use http::{HttpApi, HttpFeed};

use rookery_protocol::{BotId, ChallengeId, GameId, Move};

/// A long-lived stream of newline-delimited records.
///
/// Both the account event stream and per-game streams come through
/// this trait. `Ok(None)` means the server closed the stream cleanly;
/// blank keep-alive lines are passed through for the decoder to skip.
pub trait Feed: Send {
    /// Waits for and returns the next line.
    async fn next_line(&mut self) -> Result<Option<String>, ClientError>;
}

/// The reason sent along with a challenge decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// The challenge's time control is not in the supported set.
    TimeControl,
    /// The challenge's variant is not in the supported set.
    Variant,
    /// No specific reason (e.g. the accept call itself failed).
    Generic,
}

impl DeclineReason {
    /// The platform's wire value for this reason.
    pub fn as_str(self) -> &'static str {
        match self {
            DeclineReason::TimeControl => "timeControl",
            DeclineReason::Variant => "variant",
            DeclineReason::Generic => "generic",
        }
    }
}

/// The remote platform operations the agent depends on.
///
/// Each method maps to one HTTP call; any non-2xx response surfaces as
/// [`ClientError::Status`]. None of these retry internally — see the
/// crate docs and the [`retry`] module.
pub trait BotApi: Send + Sync {
    /// The stream type produced by the two `open_*` operations.
    type Feed: Feed;

    /// Fetches the agent's own account identifier. Called once at
    /// startup; the result is held for the process lifetime.
    async fn account_identity(&self) -> Result<BotId, ClientError>;

    /// Opens the account-wide event stream.
    async fn open_event_stream(&self) -> Result<Self::Feed, ClientError>;

    /// Opens the dedicated stream for one game.
    async fn open_game_stream(
        &self,
        game: &GameId,
    ) -> Result<Self::Feed, ClientError>;

    /// Submits a move in the given game.
    async fn post_move(
        &self,
        game: &GameId,
        mv: &Move,
    ) -> Result<(), ClientError>;

    /// Resigns the given game.
    async fn resign(&self, game: &GameId) -> Result<(), ClientError>;

    /// Aborts the given game (only valid before both sides have moved).
    async fn abort(&self, game: &GameId) -> Result<(), ClientError>;

    /// Accepts a challenge.
    async fn accept_challenge(
        &self,
        id: &ChallengeId,
    ) -> Result<(), ClientError>;

    /// Declines a challenge with the given reason.
    async fn decline_challenge(
        &self,
        id: &ChallengeId,
        reason: DeclineReason,
    ) -> Result<(), ClientError>;
}
