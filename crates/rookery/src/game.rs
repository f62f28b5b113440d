//! The per-game session state machine.
//!
//! One `GameSession` exists per running game — and at most one exists
//! system-wide. It consumes the game's dedicated stream until a
//! terminal state is reached:
//!
//! ```text
//! AwaitingColor ──(gameFull)──→ Active ──┬──→ Finished  (status left
//!                                        │               "started", or
//!                                        │               stream ended)
//!                                        ├──→ Resigned  (move rejected
//!                                        │               5×, or engine
//!                                        │               failed a turn)
//!                                        └──→ Aborted   (first move not
//!                                                        completed in time)
//! ```
//!
//! Turn detection is pure parity: white moves on even ply counts, and
//! the count always comes from the move list the platform just sent.
//! A guard on the last acted-on ply makes a re-delivered snapshot a
//! no-op, so the agent acts at most once per ply.

use std::fmt;
use std::time::Duration;

use rookery_client::{retry, BotApi, Feed};
use rookery_engine::MoveProvider;
use rookery_protocol::{
    decode_line, BotId, Color, GameEvent, GameId, GameState,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle state of a game session. The last three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the full snapshot that tells us which side we play.
    AwaitingColor,
    /// Color resolved; reacting to state updates.
    Active,
    /// The game is over (normally, or the stream ended).
    Finished,
    /// We aborted: the first scheduled move was not completed in time.
    Aborted,
    /// We resigned: a move could not be delivered or produced.
    Resigned,
}

impl SessionState {
    /// `true` once the session can make no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Finished
                | SessionState::Aborted
                | SessionState::Resigned
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingColor => write!(f, "awaiting-color"),
            SessionState::Active => write!(f, "active"),
            SessionState::Finished => write!(f, "finished"),
            SessionState::Aborted => write!(f, "aborted"),
            SessionState::Resigned => write!(f, "resigned"),
        }
    }
}

/// Drives a single game from start to a terminal state.
pub struct GameSession {
    game_id: GameId,
    bot_id: BotId,
    state: SessionState,
    color: Option<Color>,
    /// Ply count from the most recent authoritative move list.
    plies_seen: usize,
    /// The ply count we last produced a move for.
    last_acted_ply: Option<usize>,
    /// Set once a move of ours was accepted by the platform.
    first_move_done: bool,
    /// When the first-move abandonment window closes.
    abort_deadline: Instant,
}

impl GameSession {
    pub fn new(
        game_id: GameId,
        bot_id: BotId,
        first_move_timeout: Duration,
    ) -> Self {
        Self {
            game_id,
            bot_id,
            state: SessionState::AwaitingColor,
            color: None,
            plies_seen: 0,
            last_acted_ply: None,
            first_move_done: false,
            abort_deadline: Instant::now() + first_move_timeout,
        }
    }

    /// Consumes the per-game feed until the session is terminal, and
    /// returns the terminal state.
    pub async fn run<A, P, F>(
        mut self,
        api: &A,
        provider: &P,
        feed: &mut F,
    ) -> SessionState
    where
        A: BotApi,
        P: MoveProvider,
        F: Feed,
    {
        while !self.state.is_terminal() {
            tokio::select! {
                line = feed.next_line() => match line {
                    Ok(Some(line)) => self.handle_line(api, provider, &line).await,
                    Ok(None) => {
                        info!(game_id = %self.game_id, "game stream ended");
                        self.state = SessionState::Finished;
                    }
                    Err(e) => {
                        warn!(game_id = %self.game_id, error = %e, "game stream failed");
                        self.state = SessionState::Finished;
                    }
                },
                _ = tokio::time::sleep_until(self.abort_deadline),
                    if self.first_move_pending() =>
                {
                    warn!(game_id = %self.game_id, "first move not completed in time, aborting");
                    if let Err(e) = api.abort(&self.game_id).await {
                        debug!(game_id = %self.game_id, error = %e, "abort failed");
                    }
                    self.state = SessionState::Aborted;
                }
            }
        }
        self.state
    }

    /// Whether the abandonment window still applies: the agent's first
    /// scheduled move (ply 1 as white, ply 2 as black) has not been
    /// accepted yet. Unresolved color counts as pending — no move can
    /// have been made.
    fn first_move_pending(&self) -> bool {
        if self.first_move_done {
            return false;
        }
        match self.color {
            None => true,
            Some(Color::White) => self.plies_seen == 0,
            Some(Color::Black) => self.plies_seen < 2,
        }
    }

    async fn handle_line<A: BotApi, P: MoveProvider>(
        &mut self,
        api: &A,
        provider: &P,
        line: &str,
    ) {
        let event = match decode_line::<GameEvent>(line) {
            Ok(Some(event)) => event,
            Ok(None) => return, // keep-alive
            Err(e) => {
                warn!(game_id = %self.game_id, error = %e, "undecodable game record, skipping");
                return;
            }
        };

        match event {
            GameEvent::Full {
                white,
                black,
                state,
            } => {
                let color = if white.id == self.bot_id {
                    Color::White
                } else {
                    Color::Black
                };
                info!(
                    game_id = %self.game_id,
                    %color,
                    white = %white.id,
                    black = %black.id,
                    "color resolved"
                );
                self.color = Some(color);
                self.state = SessionState::Active;
                self.apply_state(api, provider, state).await;
            }
            GameEvent::State(state) => {
                if self.state == SessionState::Active {
                    self.apply_state(api, provider, state).await;
                } else {
                    debug!(game_id = %self.game_id, "state update before color resolution, ignoring");
                }
            }
            GameEvent::Unknown => {}
        }
    }

    /// Processes one authoritative game state: detect game over, detect
    /// our turn, and play.
    async fn apply_state<A: BotApi, P: MoveProvider>(
        &mut self,
        api: &A,
        provider: &P,
        state: GameState,
    ) {
        if !state.status.is_running() {
            info!(game_id = %self.game_id, "game over");
            self.state = SessionState::Finished;
            return;
        }

        let history = state.move_list();
        self.plies_seen = history.len();

        let Some(color) = self.color else {
            return;
        };
        if Color::to_move(history.len()) != color {
            return;
        }
        if self.last_acted_ply == Some(history.len()) {
            debug!(
                game_id = %self.game_id,
                ply = history.len(),
                "already acted for this ply, ignoring duplicate"
            );
            return;
        }
        self.last_acted_ply = Some(history.len());

        if let Some(last) = history.last() {
            info!(game_id = %self.game_id, r#move = %last, "opponent moved");
        }

        let mv = match provider.compute(&history).await {
            Ok(Some(mv)) => mv,
            Ok(None) => {
                warn!(game_id = %self.game_id, "engine produced no move, resigning");
                self.resign(api).await;
                return;
            }
            Err(e) => {
                warn!(game_id = %self.game_id, error = %e, "engine failed, resigning");
                self.resign(api).await;
                return;
            }
        };

        info!(game_id = %self.game_id, r#move = %mv, "submitting move");
        let game_id = self.game_id.clone();
        match retry::with_policy(retry::MOVE_POST, || {
            api.post_move(&game_id, &mv)
        })
        .await
        {
            Ok(()) => {
                self.first_move_done = true;
            }
            Err(e) => {
                warn!(game_id = %self.game_id, error = %e, "move rejected after retries, resigning");
                self.resign(api).await;
            }
        }
    }

    /// Best-effort resignation; the session is Resigned either way.
    async fn resign<A: BotApi>(&mut self, api: &A) {
        if let Err(e) = api.resign(&self.game_id).await {
            debug!(game_id = %self.game_id, error = %e, "resign failed");
        }
        self.state = SessionState::Resigned;
    }
}

// =========================================================================
// Tests
// =========================================================================
