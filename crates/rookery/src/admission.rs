//! Challenge admission: accept, decline, or queue.
//!
//! `Admission` owns the two pieces of process-wide mutable state the
//! whole agent revolves around: the **activity flag** (is a game
//! running?) and the **challenge backlog** (FIFO, never reordered).
//!
//! # Concurrency note
//!
//! `Admission` is NOT thread-safe and does not need to be: it is owned
//! by the dispatcher and only ever touched from the single control
//! task. A game session blocks the dispatcher while it runs, so no
//! challenge can be evaluated mid-game — it is read off the stream
//! afterwards and lands in the backlog because the flag is still set.

use std::collections::VecDeque;

use rookery_client::{BotApi, DeclineReason};
use rookery_protocol::{Challenge, ChallengeId};
use tracing::{debug, info, warn};

/// What the agent is willing to play.
#[derive(Debug, Clone)]
pub struct AdmissionRules {
    pub time_controls: Vec<String>,
    pub variants: Vec<String>,
}

impl AdmissionRules {
    /// Checks a challenge against the supported sets. On failure the
    /// returned reason names the first rule that was violated.
    fn check(&self, challenge: &Challenge) -> Result<(), DeclineReason> {
        if !self
            .time_controls
            .contains(&challenge.time_control.show)
        {
            return Err(DeclineReason::TimeControl);
        }
        if !self.variants.contains(&challenge.variant.short) {
            return Err(DeclineReason::Variant);
        }
        Ok(())
    }
}

/// The admission controller: activity flag, backlog, and rules.
pub struct Admission {
    active: bool,
    backlog: VecDeque<Challenge>,
    rules: AdmissionRules,
}

impl Admission {
    pub fn new(rules: AdmissionRules) -> Self {
        Self {
            active: false,
            backlog: VecDeque::new(),
            rules,
        }
    }

    /// `true` while a game session exists.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of challenges waiting in the backlog.
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Marks a game as running. Called by the dispatcher on `gameStart`
    /// so the invariant holds even for games that were not accepted
    /// through [`evaluate`](Self::evaluate) (e.g. started out of band).
    pub fn begin_game(&mut self) {
        self.active = true;
    }

    /// Evaluates an incoming challenge.
    ///
    /// While a game is active the challenge goes to the backlog tail —
    /// no network call is made. Otherwise the challenge (and, after
    /// each decline, the next backlog entry) is evaluated until one is
    /// accepted or the backlog is empty.
    pub async fn evaluate<A: BotApi>(&mut self, api: &A, challenge: Challenge) {
        if self.active {
            info!(
                challenge = %challenge.id,
                queued = self.backlog.len() + 1,
                "game in progress, challenge queued"
            );
            self.backlog.push_back(challenge);
            return;
        }
        self.drain(api, challenge).await;
    }

    /// Resets the activity flag after a game ends and, if any challenge
    /// is waiting, re-runs admission on the backlog head.
    pub async fn finish<A: BotApi>(&mut self, api: &A) {
        self.active = false;
        if let Some(challenge) = self.backlog.pop_front() {
            info!(challenge = %challenge.id, "re-evaluating queued challenge");
            self.drain(api, challenge).await;
        } else {
            info!("no queued challenges, waiting");
        }
    }

    /// Drops a withdrawn challenge from the backlog, if it is queued.
    pub fn cancel(&mut self, id: &ChallengeId) {
        let before = self.backlog.len();
        self.backlog.retain(|c| &c.id != id);
        if self.backlog.len() != before {
            debug!(challenge = %id, "cancelled challenge removed from backlog");
        }
    }

    /// The flush loop: evaluate `challenge`, then keep popping the
    /// backlog head until something is accepted or nothing is left.
    ///
    /// Iterative on purpose — a burst of unsupported challenges must
    /// not grow the call stack.
    async fn drain<A: BotApi>(&mut self, api: &A, challenge: Challenge) {
        let mut next = Some(challenge);
        while let Some(challenge) = next {
            let reason = match self.rules.check(&challenge) {
                Ok(()) => match api.accept_challenge(&challenge.id).await {
                    Ok(()) => {
                        info!(
                            challenge = %challenge.id,
                            challenger = %challenge.challenger.name,
                            "challenge accepted"
                        );
                        self.active = true;
                        return;
                    }
                    Err(e) => {
                        warn!(challenge = %challenge.id, error = %e, "accept failed");
                        DeclineReason::Generic
                    }
                },
                Err(reason) => {
                    info!(
                        challenge = %challenge.id,
                        reason = reason.as_str(),
                        "challenge not supported"
                    );
                    reason
                }
            };

            // Best-effort: a failed decline is logged, never retried.
            if let Err(e) = api.decline_challenge(&challenge.id, reason).await {
                debug!(challenge = %challenge.id, error = %e, "decline failed");
            }

            next = self.backlog.pop_front();
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{challenge, Call, MockApi};
    use rookery_protocol::ChallengeId;

    fn rules() -> AdmissionRules {
        AdmissionRules {
            time_controls: vec!["15+10".into()],
            variants: vec!["Std".into()],
        }
    }

    fn cid(id: &str) -> ChallengeId {
        ChallengeId(id.into())
    }

    #[tokio::test]
    async fn test_evaluate_supported_challenge_accepts_and_sets_active() {
        let api = MockApi::default();
        let mut admission = Admission::new(rules());

        admission.evaluate(&api, challenge("c1", "15+10", "Std")).await;

        assert!(admission.is_active());
        assert_eq!(api.calls(), vec![Call::Accept(cid("c1"))]);
    }

    #[tokio::test]
    async fn test_evaluate_unsupported_time_control_declines_never_accepts() {
        let api = MockApi::default();
        let mut admission = Admission::new(rules());

        admission.evaluate(&api, challenge("c1", "1+0", "Std")).await;

        assert!(!admission.is_active());
        assert_eq!(
            api.calls(),
            vec![Call::Decline(cid("c1"), "timeControl")]
        );
    }

    #[tokio::test]
    async fn test_evaluate_unsupported_variant_declines_with_variant_reason() {
        let api = MockApi::default();
        let mut admission = Admission::new(rules());

        admission
            .evaluate(&api, challenge("c1", "15+10", "Chess960"))
            .await;

        assert_eq!(api.calls(), vec![Call::Decline(cid("c1"), "variant")]);
    }

    #[tokio::test]
    async fn test_evaluate_while_active_queues_without_network() {
        let api = MockApi::default();
        let mut admission = Admission::new(rules());
        admission.begin_game();

        admission.evaluate(&api, challenge("c1", "15+10", "Std")).await;

        assert_eq!(admission.backlog_len(), 1);
        assert!(api.calls().is_empty(), "no accept or decline while active");
    }

    #[tokio::test]
    async fn test_evaluate_accept_failure_declines_with_generic_reason() {
        let api = MockApi {
            fail_accept: true,
            ..MockApi::default()
        };
        let mut admission = Admission::new(rules());

        admission.evaluate(&api, challenge("c1", "15+10", "Std")).await;

        assert!(!admission.is_active());
        assert_eq!(
            api.calls(),
            vec![
                Call::Accept(cid("c1")),
                Call::Decline(cid("c1"), "generic")
            ]
        );
    }

    #[tokio::test]
    async fn test_finish_drains_backlog_head_and_reapplies_rules() {
        // Two queued challenges: an unsupported one ahead of a good
        // one. Finishing the game must flush the first (decline) and
        // accept the second, in order.
        let api = MockApi::default();
        let mut admission = Admission::new(rules());
        admission.begin_game();
        admission.evaluate(&api, challenge("bad", "1+0", "Std")).await;
        admission.evaluate(&api, challenge("good", "15+10", "Std")).await;
        assert_eq!(admission.backlog_len(), 2);

        admission.finish(&api).await;

        assert!(admission.is_active());
        assert_eq!(admission.backlog_len(), 0);
        assert_eq!(
            api.calls(),
            vec![
                Call::Decline(cid("bad"), "timeControl"),
                Call::Accept(cid("good"))
            ]
        );
    }

    #[tokio::test]
    async fn test_finish_with_empty_backlog_idles() {
        let api = MockApi::default();
        let mut admission = Admission::new(rules());
        admission.begin_game();

        admission.finish(&api).await;

        assert!(!admission.is_active());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_finish_stops_draining_at_first_accept() {
        // FIFO: the head is accepted; the one behind it stays queued
        // untouched.
        let api = MockApi::default();
        let mut admission = Admission::new(rules());
        admission.begin_game();
        admission.evaluate(&api, challenge("c1", "15+10", "Std")).await;
        admission.evaluate(&api, challenge("c2", "15+10", "Std")).await;

        admission.finish(&api).await;

        assert!(admission.is_active());
        assert_eq!(admission.backlog_len(), 1);
        assert_eq!(api.calls(), vec![Call::Accept(cid("c1"))]);
    }

    #[tokio::test]
    async fn test_cancel_removes_only_the_matching_entry() {
        let api = MockApi::default();
        let mut admission = Admission::new(rules());
        admission.begin_game();
        admission.evaluate(&api, challenge("c1", "15+10", "Std")).await;
        admission.evaluate(&api, challenge("c2", "15+10", "Std")).await;

        admission.cancel(&cid("c1"));

        assert_eq!(admission.backlog_len(), 1);

        // The surviving entry is still evaluated on finish.
        admission.finish(&api).await;
        assert_eq!(api.calls(), vec![Call::Accept(cid("c2"))]);
    }

    #[tokio::test]
    async fn test_cancel_unknown_id_is_a_no_op() {
        let mut admission = Admission::new(rules());
        admission.cancel(&cid("ghost"));
        assert_eq!(admission.backlog_len(), 0);
    }
}
