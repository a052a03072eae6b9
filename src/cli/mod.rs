//! Terminal front end

pub mod play;
pub mod view;

pub use play::{PlayOptions, run_play, run_state, run_watch};
