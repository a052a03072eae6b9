//! In-memory game client replaying scripted phase results

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{GameClient, validate_new_game};
use crate::error::ClientError;
use crate::types::{GameSnapshot, Phase, PhaseResult, Player, Role};

#[derive(Default)]
struct Script {
    current: Option<GameSnapshot>,
    results: VecDeque<Result<PhaseResult, ClientError>>,
}

/// Game client that answers `advance` from a queue of canned results
///
/// Advance calls are counted when they start, so a request that is still
/// waiting out its latency is already visible in [`advance_calls`](Self::advance_calls).
#[derive(Default)]
pub struct ScriptedGameClient {
    script: Mutex<Script>,
    latency: Option<Duration>,
    advance_calls: AtomicUsize,
    new_game_calls: AtomicUsize,
}

impl ScriptedGameClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing game, as if the backend already had one
    pub fn with_game(self, snapshot: GameSnapshot) -> Self {
        self.lock().current = Some(snapshot);
        self
    }

    /// Delay every advance by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue the response for a future advance call
    pub fn push_result(&self, result: Result<PhaseResult, ClientError>) {
        self.lock().results.push_back(result);
    }

    pub fn advance_calls(&self) -> usize {
        self.advance_calls.load(Ordering::SeqCst)
    }

    pub fn new_game_calls(&self) -> usize {
        self.new_game_calls.load(Ordering::SeqCst)
    }

    pub fn pending_results(&self) -> usize {
        self.lock().results.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fresh game with deterministic seats: werewolves first, then one seer
pub fn initial_snapshot(players: u32, wolves: u32, seed: i64) -> GameSnapshot {
    let roster: Vec<Player> = (0..players)
        .map(|id| {
            let role = if id < wolves {
                Role::Werewolf
            } else if id == wolves {
                Role::Seer
            } else {
                Role::Villager
            };
            Player::new(id, role)
        })
        .collect();

    GameSnapshot {
        game_id: format!("scripted_{seed}"),
        round: 0,
        phase: Phase::Setup,
        alive_wolves: wolves,
        alive_villagers: players - wolves,
        players: roster,
        winner: None,
        events: Vec::new(),
    }
}

#[async_trait]
impl GameClient for ScriptedGameClient {
    async fn get_state(&self) -> Option<GameSnapshot> {
        self.lock().current.clone()
    }

    async fn new_game(
        &self,
        players: u32,
        wolves: u32,
        seed: i64,
    ) -> Result<GameSnapshot, ClientError> {
        self.new_game_calls.fetch_add(1, Ordering::SeqCst);
        validate_new_game(players, wolves)?;

        let snapshot = initial_snapshot(players, wolves, seed);
        self.lock().current = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn advance(&self) -> Result<PhaseResult, ClientError> {
        self.advance_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut script = self.lock();
        let result = script
            .results
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::application("No scripted result left")));
        if let Ok(phase) = &result {
            script.current = Some(phase.snapshot.clone());
        }
        result
    }
}
