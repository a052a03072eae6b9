//! Autoplay Tests - Verify timer-driven progression and the command loop
//! Tests run on a paused clock so autoplay delays elapse instantly

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use werewolf_playback::client::scripted::initial_snapshot;
use werewolf_playback::playback::{PrefetchStatus, autoplay_to_end, run_commands};
use werewolf_playback::types::{EventKind, Phase, PhaseEvent, PlayerId, Team};
use werewolf_playback::{
    ClientError, Command, Mode, PhaseResult, PlaybackController, PlaybackError, PlaybackState,
    ScriptedGameClient, Wakeup,
};

fn message(speaker: u32) -> PhaseEvent {
    PhaseEvent::new(EventKind::Message {
        text: format!("I trust player {}", speaker + 1),
    })
    .with_speaker(PlayerId(speaker))
}

fn phase(phase: Phase, events: Vec<PhaseEvent>) -> PhaseResult {
    let mut snapshot = initial_snapshot(5, 1, 3);
    snapshot.phase = phase;
    snapshot.round = 1;
    PhaseResult::new(snapshot, events)
}

fn wolves_win() -> PhaseResult {
    let mut snapshot = initial_snapshot(5, 1, 3);
    snapshot.phase = Phase::NightWolfKill;
    snapshot.round = 2;
    snapshot.winner = Some(Team::Wolf);
    PhaseResult::new(snapshot, vec![])
}

/// Two phases with events, one without, then a wolf victory
fn scripted_game() -> Arc<ScriptedGameClient> {
    let client = Arc::new(ScriptedGameClient::new());
    client.push_result(Ok(phase(
        Phase::NightWolfChat,
        vec![message(0), message(0)],
    )));
    client.push_result(Ok(phase(
        Phase::DayAnnounce,
        vec![PhaseEvent::new(EventKind::GameStatus {
            alive_wolves: 1,
            alive_villagers: 3,
        })],
    )));
    client.push_result(Ok(phase(
        Phase::DayDiscuss,
        vec![message(1), message(2), message(3)],
    )));
    client.push_result(Ok(wolves_win()));
    client
}

#[cfg(test)]
mod autoplay_tests {
    use super::*;

    /// Test: autoplay runs every phase until the game is decided
    /// Expectation: autoplay is inactive with no pending tick afterwards
    #[tokio::test(start_paused = true)]
    async fn autoplay_runs_to_completion() {
        let client = scripted_game();
        let mut controller = PlaybackController::new(client.clone());
        controller.new_game(5, 1, 3).await.expect("new game failed");

        autoplay_to_end(&mut controller).await.expect("autoplay failed");

        assert_eq!(controller.state(), PlaybackState::Terminal);
        assert_eq!(controller.winner(), Some(Team::Wolf));
        assert!(!controller.is_autoplaying());
        assert!(!controller.has_pending_tick());
        assert_eq!(client.advance_calls(), 4);
        assert_eq!(client.pending_results(), 0);
    }

    /// Test: each event waits out the configured delay
    #[tokio::test(start_paused = true)]
    async fn autoplay_honours_delay() {
        let client = scripted_game();
        let mut controller =
            PlaybackController::with_autoplay_delay(client, Duration::from_millis(500));
        controller.new_game(5, 1, 3).await.expect("new game failed");

        let started = Instant::now();
        autoplay_to_end(&mut controller).await.expect("autoplay failed");

        // seven ticks; the first is immediate and the last ends the game
        assert!(started.elapsed() >= Duration::from_millis(500 * 6));
    }

    /// Test: a failed fetch stops autoplay and surfaces the error
    #[tokio::test(start_paused = true)]
    async fn autoplay_stops_on_error() {
        let client = Arc::new(ScriptedGameClient::new());
        client.push_result(Ok(phase(Phase::NightWolfChat, vec![message(0)])));
        client.push_result(Err(ClientError::network("connection refused")));
        let mut controller = PlaybackController::new(client.clone());
        controller.new_game(5, 1, 3).await.expect("new game failed");

        let err = autoplay_to_end(&mut controller).await.unwrap_err();

        assert_eq!(
            err,
            PlaybackError::Client(ClientError::network("connection refused"))
        );
        assert!(!controller.is_autoplaying());
        assert!(!controller.has_pending_tick());
        assert_eq!(controller.state(), PlaybackState::AwaitingManualAdvance);
        assert_eq!(controller.display_state().mode, Mode::AwaitingManualAdvance);
    }

    /// Test: manual advances are ignored while autoplay runs
    #[tokio::test(start_paused = true)]
    async fn manual_advance_ignored_while_autoplaying() {
        let client = scripted_game();
        let mut controller = PlaybackController::new(client.clone());
        controller.new_game(5, 1, 3).await.expect("new game failed");

        controller.toggle_autoplay();
        controller.advance().await.expect("advance failed");

        assert_eq!(client.advance_calls(), 0);
        assert_eq!(controller.display_state().mode, Mode::AutoPlaying);
        assert_eq!(controller.display_state().action_label(), "Auto Playing");
    }

    /// Test: stopping twice is the same as stopping once
    #[tokio::test(start_paused = true)]
    async fn stop_autoplay_is_idempotent() {
        let client = scripted_game();
        let mut controller = PlaybackController::new(client.clone());
        controller.new_game(5, 1, 3).await.expect("new game failed");

        controller.toggle_autoplay();
        controller.stop_autoplay();
        controller.stop_autoplay();

        assert!(!controller.is_autoplaying());
        assert!(!controller.has_pending_tick());
        controller.tick().await.expect("tick failed");
        assert_eq!(client.advance_calls(), 0);
    }

    /// Test: autoplay without a game is an error
    #[tokio::test(start_paused = true)]
    async fn autoplay_without_game_fails() {
        let client = Arc::new(ScriptedGameClient::new());
        let mut controller = PlaybackController::new(client);

        assert_eq!(
            autoplay_to_end(&mut controller).await,
            Err(PlaybackError::NoGame)
        );
        controller.toggle_autoplay();
        assert!(!controller.is_autoplaying());
    }

    /// Test: commands and autoplay ticks share one loop
    /// Expectation: the game finishes before Quit is processed
    #[tokio::test(start_paused = true)]
    async fn command_loop_drives_autoplay() {
        let client = scripted_game();
        let mut controller = PlaybackController::new(client.clone());
        let (tx, mut rx) = mpsc::channel(8);

        let input = async move {
            tx.send(Command::NewGame {
                players: 5,
                wolves: 1,
                seed: 3,
            })
            .await
            .expect("send failed");
            tx.send(Command::ToggleAutoplay).await.expect("send failed");
            tokio::time::sleep(Duration::from_secs(10)).await;
            tx.send(Command::Quit).await.expect("send failed");
        };

        tokio::join!(run_commands(&mut controller, &mut rx), input);

        assert!(controller.is_over());
        assert_eq!(client.new_game_calls(), 1);
        assert_eq!(client.advance_calls(), 4);
    }

    /// Test: stepping commands are applied in the order they were sent
    #[tokio::test(start_paused = true)]
    async fn command_loop_steps_manually() {
        let client = scripted_game();
        let mut controller = PlaybackController::new(client.clone());
        let (tx, mut rx) = mpsc::channel(8);

        tx.send(Command::NewGame {
            players: 5,
            wolves: 1,
            seed: 3,
        })
        .await
        .expect("send failed");
        tx.send(Command::Advance).await.expect("send failed");
        tx.send(Command::Advance).await.expect("send failed");
        drop(tx);

        run_commands(&mut controller, &mut rx).await;

        assert_eq!(controller.state(), PlaybackState::SteppingEvents);
        assert_eq!(controller.queue().cursor(), 1);
        assert_eq!(controller.display_state().remaining, Some(0));
    }

    /// Test: stopping while a fetch is outstanding keeps its result
    /// Expectation: the next manual advance uses it without a second request
    #[tokio::test(start_paused = true)]
    async fn stop_during_fetch_keeps_result() {
        let client = Arc::new(ScriptedGameClient::new().with_latency(Duration::from_secs(100)));
        client.push_result(Ok(phase(
            Phase::NightWolfChat,
            vec![message(0), message(0)],
        )));
        let mut controller = PlaybackController::new(client.clone());
        controller.new_game(5, 1, 3).await.expect("new game failed");

        controller.toggle_autoplay();
        assert_eq!(controller.next_wakeup().await, Wakeup::Tick);
        controller.on_wakeup(Wakeup::Tick).await.expect("tick failed");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(client.advance_calls(), 1);
        assert_eq!(controller.prefetch_status(), PrefetchStatus::Inflight);

        controller.stop_autoplay();
        assert!(!controller.is_autoplaying());
        assert!(!controller.has_pending_tick());
        assert_eq!(controller.state(), PlaybackState::AwaitingManualAdvance);

        let wakeup = controller.next_wakeup().await;
        assert_eq!(wakeup, Wakeup::FetchLanded(Ok(())));
        controller.on_wakeup(wakeup).await.expect("landing failed");
        assert_eq!(controller.state(), PlaybackState::AwaitingManualAdvance);
        assert_eq!(controller.prefetch_status(), PrefetchStatus::Cached);

        controller.advance().await.expect("advance failed");
        assert_eq!(controller.state(), PlaybackState::SteppingEvents);
        assert_eq!(client.advance_calls(), 1);
    }

    /// Test: pause and quit are handled while an autoplay fetch is outstanding
    #[tokio::test(start_paused = true)]
    async fn command_loop_pauses_during_fetch() {
        let client = Arc::new(ScriptedGameClient::new().with_latency(Duration::from_secs(100)));
        client.push_result(Ok(phase(Phase::NightWolfChat, vec![message(0)])));
        let mut controller = PlaybackController::new(client.clone());
        let (tx, mut rx) = mpsc::channel(8);

        let input = async move {
            tx.send(Command::NewGame {
                players: 5,
                wolves: 1,
                seed: 3,
            })
            .await
            .expect("send failed");
            tx.send(Command::ToggleAutoplay).await.expect("send failed");
            tokio::time::sleep(Duration::from_secs(1)).await;
            tx.send(Command::ToggleAutoplay).await.expect("send failed");
            tx.send(Command::Quit).await.expect("send failed");
        };

        let started = Instant::now();
        tokio::join!(run_commands(&mut controller, &mut rx), input);

        assert!(started.elapsed() < Duration::from_secs(100));
        assert!(!controller.is_autoplaying());
        assert_eq!(client.advance_calls(), 1);
        assert_eq!(controller.prefetch_status(), PrefetchStatus::Inflight);
    }
}
