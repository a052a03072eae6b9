//! JSON bodies exchanged with the game backend
//!
//! Decoding is kept free of I/O so response handling can be tested without a server.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::types::{GameSnapshot, Phase, PhaseEvent, PhaseResult, Team};

/// Body of `POST /api/new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub n_players: u32,
    pub n_wolves: u32,
    pub seed: i64,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    #[serde(default)]
    game: Option<GameSnapshot>,
}

#[derive(Debug, Deserialize)]
struct NewGameResponse {
    #[serde(default)]
    game: Option<GameSnapshot>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdvanceResponse {
    #[serde(default)]
    game: Option<GameSnapshot>,
    #[serde(default)]
    result: Option<AdvanceOutcome>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdvanceOutcome {
    done: bool,
    #[serde(default)]
    winner: Option<Team>,
    #[serde(default)]
    phase: Option<Phase>,
    // omitted when the game was already over
    #[serde(default)]
    phase_events: Vec<PhaseEvent>,
}

fn parse<'a, T: Deserialize<'a>>(body: &'a str, what: &str) -> Result<T, ClientError> {
    serde_json::from_str(body)
        .map_err(|e| ClientError::network(format!("Malformed {what} response: {e}")))
}

/// Decode a `GET /api/state` body; `None` when no game exists
pub fn decode_state(body: &str) -> Result<Option<GameSnapshot>, ClientError> {
    let response: StateResponse = parse(body, "state")?;
    Ok(response.game)
}

/// Decode a `POST /api/new` body
pub fn decode_new_game(body: &str) -> Result<GameSnapshot, ClientError> {
    let response: NewGameResponse = parse(body, "new game")?;
    if let Some(error) = response.error {
        return Err(ClientError::validation(error));
    }
    response
        .game
        .ok_or_else(|| ClientError::network("New game response has neither game nor error"))
}

/// Decode a `POST /api/advance` body
pub fn decode_advance(body: &str) -> Result<PhaseResult, ClientError> {
    let response: AdvanceResponse = parse(body, "advance")?;
    if let Some(error) = response.error {
        return Err(ClientError::application(error));
    }
    match (response.game, response.result) {
        (Some(snapshot), Some(outcome)) => Ok(PhaseResult {
            done: outcome.done,
            winner: outcome.winner,
            phase: outcome.phase,
            phase_events: outcome.phase_events,
            snapshot,
        }),
        _ => Err(ClientError::network(
            "Advance response is missing game or result",
        )),
    }
}
