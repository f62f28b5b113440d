//! The top-level event dispatcher.
//!
//! `Agent::run` is the whole control loop of the process: open the
//! account event stream, decode each record, and route it — challenges
//! to [`Admission`], game starts to a [`GameSession`]. The loop is
//! deliberately sequential: a started game is played to completion
//! before the next event stream record is read, which is what makes the
//! single-active-game invariant hold without any locking.
//!
//! A dropped event stream is reopened under the stream-open retry
//! policy; only exhausting that policy ends the process.

use rookery_client::{retry, BotApi, Feed};
use rookery_engine::MoveProvider;
use rookery_protocol::{decode_line, BotId, GameId, StreamEvent};
use tracing::{info, warn};

use crate::admission::{Admission, AdmissionRules};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::game::GameSession;

/// The autonomous agent: one per process.
pub struct Agent<A, P> {
    api: A,
    provider: P,
    config: AgentConfig,
    admission: Admission,
}

impl<A: BotApi, P: MoveProvider> Agent<A, P> {
    pub fn new(api: A, provider: P, config: AgentConfig) -> Self {
        let admission = Admission::new(AdmissionRules {
            time_controls: config.supported_time_controls.clone(),
            variants: config.supported_variants.clone(),
        });
        Self {
            api,
            provider,
            config,
            admission,
        }
    }

    /// Runs the agent until the event stream becomes unavailable.
    ///
    /// Returns only on fatal errors; in normal operation this future
    /// never resolves.
    pub async fn run(&mut self) -> Result<(), AgentError> {
        let bot_id = self
            .api
            .account_identity()
            .await
            .map_err(AgentError::Identity)?;
        info!(account = %bot_id, "agent online");

        loop {
            let api = &self.api;
            let mut feed =
                retry::with_policy(retry::STREAM_OPEN, || api.open_event_stream())
                    .await
                    .map_err(AgentError::EventStreamUnavailable)?;
            info!("event stream open");

            loop {
                match feed.next_line().await {
                    Ok(Some(line)) => self.handle_line(&bot_id, &line).await,
                    Ok(None) => {
                        warn!("event stream closed, reconnecting");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "event stream failed, reconnecting");
                        break;
                    }
                }
            }
        }
    }

    async fn handle_line(&mut self, bot_id: &BotId, line: &str) {
        let event = match decode_line::<StreamEvent>(line) {
            Ok(Some(event)) => event,
            Ok(None) => return, // keep-alive
            Err(e) => {
                warn!(error = %e, "undecodable event record, skipping");
                return;
            }
        };

        match event {
            StreamEvent::Challenge { challenge } => {
                info!(
                    challenge = %challenge.id,
                    challenger = %challenge.challenger.name,
                    "challenge received"
                );
                self.admission.evaluate(&self.api, challenge).await;
            }
            StreamEvent::ChallengeCanceled { challenge } => {
                self.admission.cancel(&challenge.id);
            }
            StreamEvent::GameStart { game } => {
                self.play(bot_id, game.id).await;
            }
            StreamEvent::GameFinish { game } => {
                info!(game_id = %game.id, "game finished");
                self.admission.finish(&self.api).await;
            }
            StreamEvent::Unknown => {}
        }
    }

    /// Plays one game to completion.
    ///
    /// If the game's stream cannot be opened even with retries the game
    /// is skipped — the activity flag stays set, because the game still
    /// exists on the platform and its `gameFinish` will arrive on the
    /// event stream like any other.
    async fn play(&mut self, bot_id: &BotId, game_id: GameId) {
        self.admission.begin_game();
        info!(game_id = %game_id, "game started");

        let api = &self.api;
        let mut feed = match retry::with_policy(retry::STREAM_OPEN, || {
            api.open_game_stream(&game_id)
        })
        .await
        {
            Ok(feed) => feed,
            Err(e) => {
                warn!(game_id = %game_id, error = %e, "could not open game stream, skipping game");
                return;
            }
        };

        let session = GameSession::new(
            game_id.clone(),
            bot_id.clone(),
            self.config.first_move_timeout,
        );
        let outcome = session.run(&self.api, &self.provider, &mut feed).await;
        info!(game_id = %game_id, %outcome, "game session over");
    }
}

// =========================================================================
// Tests
// =========================================================================
