//! Command loop driving a playback controller
//!
//! Every input source (keyboard, pointer, scripts) sends the same
//! [`Command`]s; autoplay ticks are interleaved with them on one task.

use tokio::sync::mpsc;

use super::controller::{PlaybackController, PlaybackState};
use crate::error::PlaybackError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Advance,
    NewGame { players: u32, wolves: u32, seed: i64 },
    ToggleAutoplay,
    Quit,
}

/// Apply a single command to the controller
pub async fn dispatch(
    controller: &mut PlaybackController,
    command: Command,
) -> Result<(), PlaybackError> {
    match command {
        Command::Advance => controller.advance().await,
        Command::NewGame {
            players,
            wolves,
            seed,
        } => controller.new_game(players, wolves, seed).await,
        Command::ToggleAutoplay => {
            controller.toggle_autoplay();
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}

/// Process commands and autoplay wakeups until `Quit` or the sender is dropped.
///
/// Input is polled first, so a command is handled even while an autoplay
/// request is outstanding. Errors have already been reported to the
/// controller's observers, so they only get logged here.
pub async fn run_commands(
    controller: &mut PlaybackController,
    commands: &mut mpsc::Receiver<Command>,
) {
    loop {
        tokio::select! {
            biased;
            command = commands.recv() => match command {
                None | Some(Command::Quit) => break,
                Some(command) => {
                    log::trace!("command {:?}", command);
                    if let Err(e) = dispatch(controller, command).await {
                        log::debug!("command failed: {}", e);
                    }
                }
            },
            wakeup = controller.next_wakeup() => {
                if let Err(e) = controller.on_wakeup(wakeup).await {
                    log::debug!("autoplay failed: {}", e);
                }
            }
        }
    }
}

/// Autoplay the current game until a winner is decided.
///
/// Returns the error that stopped autoplay, if any.
pub async fn autoplay_to_end(controller: &mut PlaybackController) -> Result<(), PlaybackError> {
    match controller.state() {
        PlaybackState::Idle => return Err(PlaybackError::NoGame),
        PlaybackState::Terminal => return Ok(()),
        _ => {}
    }
    if !controller.is_autoplaying() {
        controller.toggle_autoplay();
    }
    while controller.is_autoplaying() {
        let wakeup = controller.next_wakeup().await;
        controller.on_wakeup(wakeup).await?;
    }
    Ok(())
}
