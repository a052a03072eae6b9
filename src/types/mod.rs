//! Core types shared by the client, the playback controller and the CLI
//!
//! - Snapshot: the backend's view of the game (players, round, phase, log)
//! - Event: one occurrence within a phase, as a closed tagged variant
//! - Result: what one phase advance returns
//! - Display: what the rendering layer should currently show

pub mod display;
pub mod event;
pub mod result;
pub mod snapshot;

pub use display::{DisplayState, Mode};
pub use event::{Channel, DeathCause, EventKind, PhaseEvent};
pub use result::PhaseResult;
pub use snapshot::{GameSnapshot, Phase, Player, PlayerId, Role, Team};
