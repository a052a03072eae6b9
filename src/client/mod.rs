//! Game backend client
//!
//! The playback controller only depends on the [`GameClient`] trait. The HTTP
//! implementation talks to a running backend; the scripted implementation
//! replays canned results for tests and offline demos.

pub mod http;
pub mod scripted;
pub mod wire;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{GameSnapshot, PhaseResult};

pub use http::HttpGameClient;
pub use scripted::ScriptedGameClient;

/// Stateless wrapper around the backend's three operations
#[async_trait]
pub trait GameClient: Send + Sync {
    /// Current game, or `None` when there is none or the request failed
    async fn get_state(&self) -> Option<GameSnapshot>;

    /// Start a new game, replacing any game in progress
    async fn new_game(
        &self,
        players: u32,
        wolves: u32,
        seed: i64,
    ) -> Result<GameSnapshot, ClientError>;

    /// Advance the simulation by exactly one phase.
    ///
    /// Must not be called concurrently with itself for the same game.
    async fn advance(&self) -> Result<PhaseResult, ClientError>;
}

/// Reject parameter combinations no backend accepts
pub fn validate_new_game(players: u32, wolves: u32) -> Result<(), ClientError> {
    if wolves > players {
        return Err(ClientError::validation(format!(
            "wolf count {wolves} exceeds player count {players}"
        )));
    }
    Ok(())
}
