//! Outcome of a single phase advance

use serde::{Deserialize, Serialize};

use super::event::PhaseEvent;
use super::snapshot::{GameSnapshot, Phase, Team};

/// Result of advancing the simulation by one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub snapshot: GameSnapshot,
    pub done: bool,
    pub winner: Option<Team>,
    /// Phase that was just played, absent once the game had already ended
    pub phase: Option<Phase>,
    pub phase_events: Vec<PhaseEvent>,
}

impl PhaseResult {
    pub fn new(snapshot: GameSnapshot, phase_events: Vec<PhaseEvent>) -> Self {
        Self {
            done: snapshot.winner.is_some(),
            winner: snapshot.winner,
            phase: Some(snapshot.phase),
            snapshot,
            phase_events,
        }
    }

    /// Winner from the result, or from the snapshot when the result omits it
    pub fn winner(&self) -> Option<Team> {
        self.winner.or(self.snapshot.winner)
    }
}
