//! # werewolf-playback
//!
//! Spectator-side playback for a multi-agent werewolf simulation. The backend
//! advances the game one whole phase per request; this crate turns those
//! batches into a timeline a spectator can step through one event at a time,
//! prefetching the next phase while the current one is read and optionally
//! autoplaying to the end.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use werewolf_playback::{HttpGameClient, PlaybackConfig, PlaybackController};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PlaybackConfig::default();
//! let client = Arc::new(HttpGameClient::new(&config)?);
//! let mut controller = PlaybackController::new(client);
//!
//! controller.new_game(7, 2, 42).await?;
//! while !controller.is_over() {
//!     controller.advance().await?;
//!     if let Some(event) = controller.display_state().event {
//!         println!("{}", werewolf_playback::cli::view::format_event(&event));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod playback;
pub mod types;

pub use client::{GameClient, HttpGameClient, ScriptedGameClient};
pub use config::PlaybackConfig;
pub use error::{ClientError, PlaybackError};
pub use playback::{Command, PlaybackController, PlaybackObserver, PlaybackState, Wakeup};
pub use types::{DisplayState, GameSnapshot, Mode, PhaseEvent, PhaseResult};
