//! Wire types for the Rookery bot agent.
//!
//! The remote platform pushes two newline-delimited JSON streams:
//!
//! 1. **The account event stream** — lifecycle events for the whole
//!    account: challenges arriving or being withdrawn, games starting
//!    and finishing. Decoded into [`StreamEvent`].
//! 2. **A per-game stream** — opened for each game the agent plays,
//!    carrying one full snapshot ([`GameEvent::Full`]) followed by
//!    incremental state updates ([`GameEvent::State`]). Each update
//!    carries the *complete* move list so far; the platform is the
//!    single source of truth for sequencing.
//!
//! Blank lines on either stream are keep-alives; [`decode_line`] maps
//! them to `None` so consumers can skip them uniformly.

mod codec;
mod error;
mod types;

pub use codec::decode_line;
pub use error::ProtocolError;
pub use types::{
    BotId, Challenge, ChallengeId, Challenger, Color, GameEvent, GameId,
    GameRef, GameState, GameStatus, Move, PlayerInfo, StreamEvent,
    TimeControl, Variant,
};
