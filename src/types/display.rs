//! What the rendering layer should currently show
//!
//! A `DisplayState` is a read-only projection of the playback controller,
//! rebuilt after every operation.

use serde::{Deserialize, Serialize};

use super::event::PhaseEvent;
use super::snapshot::Team;

/// Observable playback mode; exactly one is active at any instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// No game loaded
    Idle,
    /// Presenting the events of the current phase one at a time
    SteppingEvents,
    /// Waiting for the next phase to be requested
    AwaitingManualAdvance,
    /// Timer-driven progression is running
    AutoPlaying,
    /// A winner has been decided
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub mode: Mode,
    /// Event currently presented, if stepping
    pub event: Option<PhaseEvent>,
    /// Events left after the presented one
    pub remaining: Option<usize>,
    pub winner: Option<Team>,
    /// No phase has been played yet in this game
    pub fresh_game: bool,
}

impl DisplayState {
    pub fn idle() -> Self {
        Self {
            mode: Mode::Idle,
            event: None,
            remaining: None,
            winner: None,
            fresh_game: false,
        }
    }

    /// Label for the advance control
    pub fn action_label(&self) -> String {
        match self.mode {
            Mode::Idle => "New Game".to_string(),
            Mode::Terminal => "Game Over".to_string(),
            Mode::AutoPlaying => "Auto Playing".to_string(),
            Mode::AwaitingManualAdvance if self.fresh_game => "Start Game".to_string(),
            Mode::AwaitingManualAdvance => "Next Phase".to_string(),
            Mode::SteppingEvents => match self.remaining {
                Some(n) if n > 0 => format!("Next ({} more)", n),
                _ => "End Phase".to_string(),
            },
        }
    }

    /// Whether manual advance input is currently accepted
    pub fn accepts_input(&self) -> bool {
        matches!(
            self.mode,
            Mode::SteppingEvents | Mode::AwaitingManualAdvance
        )
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepping(remaining: usize) -> DisplayState {
        DisplayState {
            mode: Mode::SteppingEvents,
            event: None,
            remaining: Some(remaining),
            winner: None,
            fresh_game: false,
        }
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(stepping(2).action_label(), "Next (2 more)");
        assert_eq!(stepping(0).action_label(), "End Phase");

        let mut state = DisplayState::idle();
        state.mode = Mode::AwaitingManualAdvance;
        state.fresh_game = true;
        assert_eq!(state.action_label(), "Start Game");

        state.fresh_game = false;
        assert_eq!(state.action_label(), "Next Phase");

        state.mode = Mode::Terminal;
        assert_eq!(state.action_label(), "Game Over");
        assert!(!state.accepts_input());
    }
}
