//! Playback orchestration
//!
//! - queue: the current phase's displayable events and a cursor
//! - prefetch: single-slot cache for the next phase result
//! - autoplay: timer state for unattended progression
//! - controller: the state machine tying them together
//! - runner: command loop feeding the controller

pub mod autoplay;
pub mod controller;
pub mod prefetch;
pub mod queue;
pub mod runner;

pub use autoplay::AutoplayScheduler;
pub use controller::{PlaybackController, PlaybackObserver, PlaybackState, Wakeup};
pub use prefetch::{PrefetchSlot, PrefetchStatus};
pub use queue::{EventQueue, StepResult, filter_displayable_events};
pub use runner::{Command, autoplay_to_end, dispatch, run_commands};
