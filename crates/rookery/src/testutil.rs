//! In-memory doubles for the trait seams, shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use rookery_client::{BotApi, ClientError, DeclineReason, Feed};
use rookery_engine::{EngineError, MoveProvider};
use rookery_protocol::{BotId, Challenge, ChallengeId, GameId, Move};

/// One recorded API call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    OpenGame(GameId),
    PostMove(GameId, Move),
    Resign(GameId),
    Abort(GameId),
    Accept(ChallengeId),
    Decline(ChallengeId, &'static str),
}

/// A scripted [`Feed`]: hands out its lines, then either reports a
/// clean close or pends forever (for deadline tests).
pub struct ScriptFeed {
    lines: VecDeque<String>,
    hang_at_end: bool,
}

impl ScriptFeed {
    pub fn of(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            hang_at_end: false,
        }
    }

    /// Like [`of`](Self::of), but the feed never closes — it just goes
    /// quiet once the script runs out.
    pub fn hanging(lines: &[&str]) -> Self {
        Self {
            hang_at_end: true,
            ..Self::of(lines)
        }
    }
}

impl Feed for ScriptFeed {
    async fn next_line(&mut self) -> Result<Option<String>, ClientError> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.hang_at_end => std::future::pending().await,
            None => Ok(None),
        }
    }
}

/// A recording [`BotApi`] with per-operation failure switches and
/// scripted streams.
#[derive(Default)]
pub struct MockApi {
    pub calls: Mutex<Vec<Call>>,
    pub fail_accept: bool,
    pub fail_post_move: bool,
    pub fail_open_game: bool,
    pub event_scripts: Mutex<VecDeque<ScriptFeed>>,
    pub game_scripts: Mutex<VecDeque<ScriptFeed>>,
}

impl MockApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn refused(op: &'static str) -> ClientError {
        ClientError::Status { op, status: 500 }
    }
}

impl BotApi for MockApi {
    type Feed = ScriptFeed;

    async fn account_identity(&self) -> Result<BotId, ClientError> {
        Ok(BotId("me".into()))
    }

    async fn open_event_stream(&self) -> Result<ScriptFeed, ClientError> {
        self.event_scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(Self::refused("event stream"))
    }

    async fn open_game_stream(
        &self,
        game: &GameId,
    ) -> Result<ScriptFeed, ClientError> {
        self.record(Call::OpenGame(game.clone()));
        if self.fail_open_game {
            return Err(Self::refused("game stream"));
        }
        self.game_scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(Self::refused("game stream"))
    }

    async fn post_move(
        &self,
        game: &GameId,
        mv: &Move,
    ) -> Result<(), ClientError> {
        self.record(Call::PostMove(game.clone(), mv.clone()));
        if self.fail_post_move {
            Err(Self::refused("move"))
        } else {
            Ok(())
        }
    }

    async fn resign(&self, game: &GameId) -> Result<(), ClientError> {
        self.record(Call::Resign(game.clone()));
        Ok(())
    }

    async fn abort(&self, game: &GameId) -> Result<(), ClientError> {
        self.record(Call::Abort(game.clone()));
        Ok(())
    }

    async fn accept_challenge(
        &self,
        id: &ChallengeId,
    ) -> Result<(), ClientError> {
        self.record(Call::Accept(id.clone()));
        if self.fail_accept {
            Err(Self::refused("accept"))
        } else {
            Ok(())
        }
    }

    async fn decline_challenge(
        &self,
        id: &ChallengeId,
        reason: DeclineReason,
    ) -> Result<(), ClientError> {
        self.record(Call::Decline(id.clone(), reason.as_str()));
        Ok(())
    }
}

/// A [`MoveProvider`] that always answers the same thing and records
/// the histories it was asked about.
#[derive(Default)]
pub struct CannedProvider {
    pub mv: Option<Move>,
    pub histories: Mutex<Vec<Vec<Move>>>,
}

impl CannedProvider {
    pub fn playing(mv: &str) -> Self {
        Self {
            mv: Some(Move(mv.into())),
            histories: Mutex::new(Vec::new()),
        }
    }

    /// A provider that never produces a move (engine timeout).
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> usize {
        self.histories.lock().unwrap().len()
    }
}

impl MoveProvider for CannedProvider {
    async fn compute(
        &self,
        history: &[Move],
    ) -> Result<Option<Move>, EngineError> {
        self.histories.lock().unwrap().push(history.to_vec());
        Ok(self.mv.clone())
    }
}

/// A challenge with the given id and supported-by-default fields.
pub fn challenge(id: &str, time_control: &str, variant: &str) -> Challenge {
    serde_json::from_str(&format!(
        r#"{{
            "id": "{id}",
            "challenger": {{"name": "rival"}},
            "timeControl": {{"show": "{time_control}"}},
            "variant": {{"short": "{variant}"}}
        }}"#
    ))
    .unwrap()
}
