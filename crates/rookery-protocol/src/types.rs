//! Record types for the account event stream and the per-game stream.
//!
//! These mirror the platform's JSON exactly. Nothing here validates
//! game rules — a [`Move`] is an opaque notation string that only the
//! platform and the engine understand.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The agent's own account identifier.
///
/// Fetched once at startup and compared against the white player's id
/// of each game to resolve which side the agent plays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub String);

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for a challenge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(pub String);

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One move in the platform's notation (e.g. `"e2e4"`).
///
/// Treated as a value type end to end: the agent never parses or
/// validates it, it only relays it between the platform and the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move(pub String);

impl Move {
    /// The raw notation string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Move {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Color and turn detection
// ---------------------------------------------------------------------------

/// The side the agent plays in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The side to move given the number of plies played so far.
    ///
    /// White moves on even counts, black on odd. The count must come
    /// from the authoritative move list carried by each state event —
    /// never from a locally accumulated counter — so that a replayed
    /// or duplicated event cannot skew turn detection.
    pub fn to_move(plies: usize) -> Color {
        if plies % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// Challenge records
// ---------------------------------------------------------------------------

/// The account that issued a challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenger {
    pub name: String,
}

/// The time control of a challenge, as the platform displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeControl {
    /// Display form, e.g. `"15+10"`. This is what admission matches
    /// against the configured supported set.
    pub show: String,
}

/// The variant of a challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Short name, e.g. `"Std"`.
    pub short: String,
}

/// An incoming challenge, as carried by a `challenge` event.
///
/// Ephemeral: created on receipt, consumed when accepted, declined, or
/// re-evaluated from the backlog. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub challenger: Challenger,
    #[serde(rename = "timeControl")]
    pub time_control: TimeControl,
    pub variant: Variant,
}

// ---------------------------------------------------------------------------
// Account event stream
// ---------------------------------------------------------------------------

/// Reference to a game inside a `gameStart`/`gameFinish` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRef {
    pub id: GameId,
}

/// One record on the account event stream.
///
/// A closed tagged variant over the four known event kinds. Anything
/// the platform adds later lands in `Unknown` and is ignored, rather
/// than failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    /// A game the agent is part of has started.
    #[serde(rename = "gameStart")]
    GameStart { game: GameRef },

    /// A game the agent was part of has finished.
    #[serde(rename = "gameFinish")]
    GameFinish { game: GameRef },

    /// Another account has challenged the agent.
    #[serde(rename = "challenge")]
    Challenge { challenge: Challenge },

    /// A previously received challenge was withdrawn.
    #[serde(rename = "challengeCanceled")]
    ChallengeCanceled { challenge: Challenge },

    /// An event kind this agent does not know about.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Per-game stream
// ---------------------------------------------------------------------------

/// One player slot in a full game snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: BotId,
}

/// Whether a game is still running.
///
/// The agent only distinguishes "started" from everything else: any
/// other status (mate, resignation, abort, timeout, ...) is terminal
/// for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Started,
    #[serde(other)]
    Ended,
}

impl GameStatus {
    /// `true` while the game is in progress.
    pub fn is_running(self) -> bool {
        matches!(self, GameStatus::Started)
    }
}

/// The authoritative game state carried by each per-game event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// All moves played so far, space-separated, in order.
    pub moves: String,
    pub status: GameStatus,
}

impl GameState {
    /// The full move history as an ordered list.
    pub fn move_list(&self) -> Vec<Move> {
        self.moves
            .split_whitespace()
            .map(|m| Move(m.to_string()))
            .collect()
    }
}

/// One record on a per-game stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// The full snapshot sent when the stream opens. This is the only
    /// record that identifies the players, so it is what resolves
    /// which color the agent plays.
    #[serde(rename = "gameFull")]
    Full {
        white: PlayerInfo,
        black: PlayerInfo,
        state: GameState,
    },

    /// An incremental update: current status plus the complete move
    /// list observed so far.
    #[serde(rename = "gameState")]
    State(GameState),

    /// A record kind this agent does not know about (chat lines etc.).
    #[serde(other)]
    Unknown,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Color::to_move
    // =====================================================================

    #[test]
    fn test_to_move_even_counts_are_white() {
        for plies in [0usize, 2, 4, 100] {
            assert_eq!(Color::to_move(plies), Color::White, "plies = {plies}");
        }
    }

    #[test]
    fn test_to_move_odd_counts_are_black() {
        for plies in [1usize, 3, 5, 99] {
            assert_eq!(Color::to_move(plies), Color::Black, "plies = {plies}");
        }
    }

    // =====================================================================
    // StreamEvent decoding
    // =====================================================================

    #[test]
    fn test_stream_event_challenge_decodes_nested_fields() {
        let json = r#"{
            "type": "challenge",
            "challenge": {
                "id": "c1",
                "challenger": {"name": "opponent"},
                "timeControl": {"show": "15+10"},
                "variant": {"short": "Std"}
            }
        }"#;

        let event: StreamEvent = serde_json::from_str(json).unwrap();
        match event {
            StreamEvent::Challenge { challenge } => {
                assert_eq!(challenge.id, ChallengeId("c1".into()));
                assert_eq!(challenge.challenger.name, "opponent");
                assert_eq!(challenge.time_control.show, "15+10");
                assert_eq!(challenge.variant.short, "Std");
            }
            other => panic!("expected Challenge, got {other:?}"),
        }
    }

    #[test]
    fn test_stream_event_game_start_carries_game_id() {
        let json = r#"{"type": "gameStart", "game": {"id": "g42"}}"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            StreamEvent::GameStart {
                game: GameRef {
                    id: GameId("g42".into())
                }
            }
        );
    }

    #[test]
    fn test_stream_event_unknown_type_maps_to_unknown() {
        // The platform may add new event kinds at any time; they must
        // decode (to Unknown) instead of erroring out the stream.
        let json = r#"{"type": "somethingNew", "payload": 1}"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, StreamEvent::Unknown);
    }

    // =====================================================================
    // GameEvent decoding
    // =====================================================================

    #[test]
    fn test_game_event_full_resolves_players_and_state() {
        let json = r#"{
            "type": "gameFull",
            "white": {"id": "me"},
            "black": {"id": "them"},
            "state": {"moves": "", "status": "started"}
        }"#;

        let event: GameEvent = serde_json::from_str(json).unwrap();
        match event {
            GameEvent::Full {
                white,
                black,
                state,
            } => {
                assert_eq!(white.id, BotId("me".into()));
                assert_eq!(black.id, BotId("them".into()));
                assert!(state.status.is_running());
                assert!(state.move_list().is_empty());
            }
            other => panic!("expected Full, got {other:?}"),
        }
    }

    #[test]
    fn test_game_event_state_splits_move_list_in_order() {
        let json = r#"{"type": "gameState", "moves": "e2e4 e7e5 g1f3", "status": "started"}"#;
        let event: GameEvent = serde_json::from_str(json).unwrap();
        match event {
            GameEvent::State(state) => {
                assert_eq!(
                    state.move_list(),
                    vec![
                        Move("e2e4".into()),
                        Move("e7e5".into()),
                        Move("g1f3".into())
                    ]
                );
            }
            other => panic!("expected State, got {other:?}"),
        }
    }

    #[test]
    fn test_game_status_non_started_is_not_running() {
        for status in ["mate", "resign", "aborted", "outoftime", "draw"] {
            let json = format!(r#"{{"moves": "", "status": "{status}"}}"#);
            let state: GameState = serde_json::from_str(&json).unwrap();
            assert!(!state.status.is_running(), "status = {status}");
        }
    }

    #[test]
    fn test_game_event_unknown_type_maps_to_unknown() {
        let json = r#"{"type": "chatLine", "text": "gl hf"}"#;
        let event: GameEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, GameEvent::Unknown);
    }
}
