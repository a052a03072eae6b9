//! Playback controller
//!
//! Turns batch-delivered phase results into a steppable timeline. Within a
//! phase, `advance` presents one event at a time; once the phase is
//! exhausted, the next `advance` fetches the following phase (from the
//! prefetch slot when possible). Autoplay drives the same transitions from a
//! timer.

use std::sync::Arc;
use std::time::Duration;

use super::autoplay::AutoplayScheduler;
use super::prefetch::{PrefetchSlot, PrefetchStatus};
use super::queue::{EventQueue, StepResult};
use crate::client::{GameClient, validate_new_game};
use crate::error::{ClientError, PlaybackError};
use crate::types::{DisplayState, GameSnapshot, Mode, Phase, PhaseResult, Team};

/// Where the controller is in the two-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No game loaded
    Idle,
    /// Presenting the current phase's events
    SteppingEvents,
    /// Phase exhausted (or empty); the next advance fetches a new phase
    AwaitingManualAdvance,
    /// A winner is decided; input is ignored
    Terminal,
}

/// Receives a notification after every state mutation
pub trait PlaybackObserver: Send {
    fn on_change(&mut self, display: &DisplayState, snapshot: Option<&GameSnapshot>);

    /// Called when an error is surfaced to the spectator
    fn on_error(&mut self, _error: &PlaybackError) {}
}

/// What woke the controller up
#[derive(Debug, Clone, PartialEq)]
pub enum Wakeup {
    /// The autoplay timer fired
    Tick,
    /// The in-flight request finished
    FetchLanded(Result<(), ClientError>),
}

pub struct PlaybackController {
    client: Arc<dyn GameClient>,
    snapshot: Option<GameSnapshot>,
    state: PlaybackState,
    winner: Option<Team>,
    queue: EventQueue,
    prefetch: PrefetchSlot,
    autoplay: AutoplayScheduler,
    observers: Vec<Box<dyn PlaybackObserver>>,
}

impl PlaybackController {
    pub fn new(client: Arc<dyn GameClient>) -> Self {
        Self::with_autoplay_delay(client, Duration::ZERO)
    }

    pub fn with_autoplay_delay(client: Arc<dyn GameClient>, delay: Duration) -> Self {
        Self {
            client,
            snapshot: None,
            state: PlaybackState::Idle,
            winner: None,
            queue: EventQueue::new(),
            prefetch: PrefetchSlot::new(),
            autoplay: AutoplayScheduler::new(delay),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn PlaybackObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn prefetch_status(&self) -> PrefetchStatus {
        self.prefetch.status()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_active()
    }

    pub fn has_pending_tick(&self) -> bool {
        self.autoplay.has_pending_tick()
    }

    pub fn is_over(&self) -> bool {
        self.state == PlaybackState::Terminal
    }

    /// What the rendering layer should currently show
    pub fn display_state(&self) -> DisplayState {
        let stepping = self.state == PlaybackState::SteppingEvents;
        let mode = match self.state {
            PlaybackState::Idle => Mode::Idle,
            PlaybackState::Terminal => Mode::Terminal,
            _ if self.autoplay.is_active() => Mode::AutoPlaying,
            PlaybackState::SteppingEvents => Mode::SteppingEvents,
            PlaybackState::AwaitingManualAdvance => Mode::AwaitingManualAdvance,
        };

        DisplayState {
            mode,
            event: if stepping {
                self.queue.current().cloned()
            } else {
                None
            },
            remaining: stepping.then(|| self.queue.remaining()),
            winner: self.winner,
            fresh_game: self.state == PlaybackState::AwaitingManualAdvance
                && self
                    .snapshot
                    .as_ref()
                    .is_some_and(|s| s.phase == Phase::Setup),
        }
    }

    /// Adopt the backend's current game, if there is one
    pub async fn resume(&mut self) -> bool {
        self.reset().await;

        let Some(snapshot) = self.client.get_state().await else {
            log::debug!("no game to resume");
            self.notify();
            return false;
        };

        log::info!(
            "resuming game {} at round {} ({})",
            snapshot.game_id,
            snapshot.round,
            snapshot.phase
        );
        self.winner = snapshot.winner;
        self.state = if snapshot.is_over() {
            PlaybackState::Terminal
        } else {
            PlaybackState::AwaitingManualAdvance
        };
        self.snapshot = Some(snapshot);
        self.notify();
        true
    }

    /// Start a new game, discarding all playback state
    pub async fn new_game(
        &mut self,
        players: u32,
        wolves: u32,
        seed: i64,
    ) -> Result<(), PlaybackError> {
        if let Err(e) = validate_new_game(players, wolves) {
            return Err(self.surface(e));
        }

        self.reset().await;

        match self.client.new_game(players, wolves, seed).await {
            Ok(snapshot) => {
                log::info!(
                    "new game {} with {} players, {} wolves, seed {}",
                    snapshot.game_id,
                    players,
                    wolves,
                    seed
                );
                self.snapshot = Some(snapshot);
                self.state = PlaybackState::AwaitingManualAdvance;
                self.notify();
                Ok(())
            }
            Err(e) => {
                self.notify();
                Err(self.surface(e))
            }
        }
    }

    /// Present the next event, or fetch the next phase when the current one is done
    pub async fn advance(&mut self) -> Result<(), PlaybackError> {
        if self.autoplay.is_active() {
            log::debug!("manual advance ignored while autoplaying");
            return Ok(());
        }

        match self.state {
            PlaybackState::Idle => Err(self.surface(PlaybackError::NoGame)),
            PlaybackState::Terminal => Ok(()),
            PlaybackState::SteppingEvents => {
                if self.step_event() == StepResult::Exhausted {
                    self.begin_prefetch();
                }
                self.notify();
                Ok(())
            }
            PlaybackState::AwaitingManualAdvance => match self.obtain_phase_result().await {
                Ok(result) => {
                    self.apply_phase_result(result, false);
                    Ok(())
                }
                Err(e) => Err(self.surface(e)),
            },
        }
    }

    /// Start autoplay, or stop it when running. Ignored without a live game.
    pub fn toggle_autoplay(&mut self) {
        if matches!(self.state, PlaybackState::Idle | PlaybackState::Terminal) {
            return;
        }
        if self.autoplay.is_active() {
            self.stop_autoplay();
        } else {
            log::info!("autoplay started");
            self.autoplay.start();
            self.notify();
        }
    }

    /// Stop autoplay. An in-flight request is not cancelled; its result
    /// stays in the prefetch slot for the next advance.
    pub fn stop_autoplay(&mut self) {
        if !self.autoplay.is_active() {
            return;
        }
        log::info!("autoplay stopped");
        self.autoplay.stop();
        self.notify();
    }

    /// Resolves when the next autoplay tick is due or a request lands.
    ///
    /// Cancel safe, so it can race user input in a `select!`.
    pub async fn next_wakeup(&mut self) -> Wakeup {
        tokio::select! {
            () = self.autoplay.due() => Wakeup::Tick,
            landed = self.prefetch.landed() => Wakeup::FetchLanded(landed),
        }
    }

    /// Handle a wakeup returned by [`next_wakeup`](Self::next_wakeup)
    pub async fn on_wakeup(&mut self, wakeup: Wakeup) -> Result<(), PlaybackError> {
        match wakeup {
            Wakeup::Tick => self.tick().await,
            Wakeup::FetchLanded(Ok(())) => {
                let awaiting = self.state == PlaybackState::AwaitingManualAdvance;
                if self.autoplay.is_active() && awaiting {
                    if let Some(result) = self.prefetch.take() {
                        self.apply_autoplay_result(result);
                    }
                } else {
                    log::debug!("phase result cached for the next advance");
                    self.notify();
                }
                Ok(())
            }
            Wakeup::FetchLanded(Err(e)) => {
                if !self.autoplay.is_active() {
                    log::warn!("Prefetch failed, next advance will fetch again: {}", e);
                    return Ok(());
                }
                log::warn!("autoplay stopped on error: {}", e);
                self.autoplay.stop();
                self.notify();
                Err(self.surface(e))
            }
        }
    }

    /// Run one autoplay tick.
    ///
    /// Never waits on the network: a missing phase result is requested in
    /// the background and applied when it lands.
    pub async fn tick(&mut self) -> Result<(), PlaybackError> {
        if !self.autoplay.is_active() {
            return Ok(());
        }

        if self.state == PlaybackState::SteppingEvents {
            if self.queue.has_next() {
                self.step_event();
                self.autoplay.schedule();
                self.notify();
                return Ok(());
            }
            self.state = PlaybackState::AwaitingManualAdvance;
            self.notify();
        }

        if self.state != PlaybackState::AwaitingManualAdvance {
            self.autoplay.stop();
            return Ok(());
        }

        self.prefetch.settle().await;
        if let Some(result) = self.prefetch.take() {
            log::debug!("using prefetched phase result");
            self.apply_autoplay_result(result);
        } else if !self.prefetch.is_inflight() {
            self.prefetch.begin(Arc::clone(&self.client));
        }
        Ok(())
    }

    fn step_event(&mut self) -> StepResult {
        let step = self.queue.advance();
        match &step {
            StepResult::Shown { event, remaining } => {
                log::debug!("showing {} ({} more)", event.kind_name(), remaining);
            }
            StepResult::Exhausted => {
                log::debug!("phase exhausted");
                self.state = PlaybackState::AwaitingManualAdvance;
            }
        }
        step
    }

    /// Consume the prefetched result, wait for the in-flight prefetch, or fetch on demand.
    ///
    /// Never issues a request while another is in flight.
    async fn obtain_phase_result(&mut self) -> Result<PhaseResult, ClientError> {
        if let Some(result) = self.prefetch.wait().await {
            log::debug!("using prefetched phase result");
            return Ok(result);
        }
        self.client.advance().await
    }

    fn apply_phase_result(&mut self, result: PhaseResult, from_autoplay: bool) {
        let winner = result.winner();
        self.snapshot = Some(result.snapshot);

        if result.done {
            log::info!(
                "game over, winner: {}",
                winner.map_or_else(|| "none".to_string(), |w| w.to_string())
            );
            self.winner = winner;
            self.state = PlaybackState::Terminal;
            self.queue.clear();
            self.autoplay.stop();
            self.notify();
            return;
        }

        self.queue.load(&result.phase_events);
        log::debug!(
            "phase {:?} loaded: {} of {} events displayable",
            result.phase,
            self.queue.len(),
            result.phase_events.len()
        );

        if self.queue.is_empty() {
            self.state = PlaybackState::AwaitingManualAdvance;
            if !from_autoplay {
                self.begin_prefetch();
            }
        } else {
            self.state = PlaybackState::SteppingEvents;
        }
        self.notify();
    }

    fn apply_autoplay_result(&mut self, result: PhaseResult) {
        self.apply_phase_result(result, true);
        if self.state != PlaybackState::Terminal {
            self.autoplay.schedule();
        }
    }

    fn begin_prefetch(&mut self) {
        if self.autoplay.is_active() {
            return;
        }
        self.prefetch.begin(Arc::clone(&self.client));
    }

    async fn reset(&mut self) {
        self.autoplay.stop();
        self.queue.clear();
        self.prefetch.clear().await;
        self.snapshot = None;
        self.winner = None;
        self.state = PlaybackState::Idle;
    }

    fn notify(&mut self) {
        let display = self.display_state();
        for observer in self.observers.iter_mut() {
            observer.on_change(&display, self.snapshot.as_ref());
        }
    }

    fn surface(&mut self, error: impl Into<PlaybackError>) -> PlaybackError {
        let error = error.into();
        for observer in self.observers.iter_mut() {
            observer.on_error(&error);
        }
        error
    }
}
