//! Bounded retry policies for the platform operations that allow them.
//!
//! Exactly two operations are retried, with different shapes:
//!
//! - **Stream opens** ([`STREAM_OPEN`]): 5 attempts, 1 second apart.
//!   Exhaustion on the account stream is fatal to the process;
//!   exhaustion on a per-game stream skips that game.
//! - **Move posts** ([`MOVE_POST`]): 5 attempts back to back. After
//!   exhaustion the session resigns.
//!
//! Every other write (accept, decline, resign, abort) is issued at
//! most once per logical call site.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// A bounded retry policy: how many attempts, how long between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay between consecutive attempts.
    pub delay: Duration,
}

/// Policy for opening either NDJSON stream.
pub const STREAM_OPEN: RetryPolicy = RetryPolicy {
    attempts: 5,
    delay: Duration::from_secs(1),
};

/// Policy for submitting a move. No inter-attempt delay.
pub const MOVE_POST: RetryPolicy = RetryPolicy {
    attempts: 5,
    delay: Duration::ZERO,
};

/// Runs `op` under `policy`, stopping on the first success.
///
/// After the final failed attempt the last error is returned; the
/// caller decides what exhaustion means (fatal, resign, skip).
pub async fn with_policy<T, E, F, Fut>(
    policy: RetryPolicy,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.attempts => {
                warn!(attempt, error = %e, "giving up after final attempt");
                return Err(e);
            }
            Err(e) => {
                warn!(attempt, error = %e, "attempt failed, retrying");
                attempt += 1;
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
}
