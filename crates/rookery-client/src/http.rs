//! HTTP implementation of [`BotApi`] using `reqwest`.
//!
//! Endpoints match the platform's bot API: `/account`,
//! `/stream/event`, `/bot/game/stream/{id}`, and the various POST
//! operations. Authentication is a bearer token on every request.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use rookery_protocol::{BotId, ChallengeId, GameId, Move};
use serde::Deserialize;

use crate::{BotApi, ClientError, DeclineReason, Feed};

/// A [`BotApi`] backed by the platform's HTTP bot API.
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct Account {
    id: BotId,
}

impl HttpApi {
    /// Creates a client for the given API root (no trailing slash)
    /// and bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(
        &self,
        op: &'static str,
        path: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        check(op, resp)
    }

    async fn post(&self, op: &'static str, path: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        check(op, resp).map(|_| ())
    }
}

/// Maps a non-2xx response to [`ClientError::Status`].
fn check(
    op: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Status {
            op,
            status: status.as_u16(),
        })
    }
}

impl BotApi for HttpApi {
    type Feed = HttpFeed;

    async fn account_identity(&self) -> Result<BotId, ClientError> {
        let account: Account =
            self.get("account", "/account").await?.json().await?;
        Ok(account.id)
    }

    async fn open_event_stream(&self) -> Result<Self::Feed, ClientError> {
        let resp = self.get("event stream", "/stream/event").await?;
        Ok(HttpFeed::from_response(resp))
    }

    async fn open_game_stream(
        &self,
        game: &GameId,
    ) -> Result<Self::Feed, ClientError> {
        // The success check is on THIS response; the state of the
        // account stream plays no part in it.
        let resp = self
            .get("game stream", &format!("/bot/game/stream/{game}"))
            .await?;
        Ok(HttpFeed::from_response(resp))
    }

    async fn post_move(
        &self,
        game: &GameId,
        mv: &Move,
    ) -> Result<(), ClientError> {
        self.post("move", &format!("/bot/game/{game}/move/{mv}"))
            .await
    }

    async fn resign(&self, game: &GameId) -> Result<(), ClientError> {
        self.post("resign", &format!("/bot/game/{game}/resign"))
            .await
    }

    async fn abort(&self, game: &GameId) -> Result<(), ClientError> {
        self.post("abort", &format!("/bot/game/{game}/abort")).await
    }

    async fn accept_challenge(
        &self,
        id: &ChallengeId,
    ) -> Result<(), ClientError> {
        self.post("accept", &format!("/challenge/{id}/accept"))
            .await
    }

    async fn decline_challenge(
        &self,
        id: &ChallengeId,
        reason: DeclineReason,
    ) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url(&format!("/challenge/{id}/decline")))
            .bearer_auth(&self.token)
            .form(&[("reason", reason.as_str())])
            .send()
            .await?;
        check("decline", resp).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// HttpFeed
// ---------------------------------------------------------------------------

type ChunkStream =
    Pin<Box<dyn Stream<Item = Result<Vec<u8>, ClientError>> + Send>>;

/// A [`Feed`] over a streaming HTTP response body.
///
/// Chunk boundaries are arbitrary, so incoming bytes are buffered and
/// split on `\n`. A final unterminated line is still delivered when
/// the body ends.
pub struct HttpFeed {
    chunks: ChunkStream,
    buf: Vec<u8>,
}

impl HttpFeed {
    fn from_response(resp: reqwest::Response) -> Self {
        Self::new(
            resp.bytes_stream()
                .map(|chunk| chunk.map(|b| b.to_vec()).map_err(ClientError::Http)),
        )
    }

    /// Builds a feed over any chunk stream. Exposed for tests.
    pub fn new(
        chunks: impl Stream<Item = Result<Vec<u8>, ClientError>> + Send + 'static,
    ) -> Self {
        Self {
            chunks: Box::pin(chunks),
            buf: Vec::new(),
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

impl Feed for HttpFeed {
    async fn next_line(&mut self) -> Result<Option<String>, ClientError> {
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }
            match self.chunks.next().await {
                Some(Ok(chunk)) => self.buf.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(e),
                None => {
                    if self.buf.is_empty() {
                        return Ok(None);
                    }
                    let line =
                        String::from_utf8_lossy(&self.buf).into_owned();
                    self.buf.clear();
                    return Ok(Some(line));
                }
            }
        }
    }
}
