//! Timer state for autoplay
//!
//! The scheduler only owns the `active` flag and at most one armed timer.
//! What a tick does is decided by the controller.

use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Sleep, sleep};

pub struct AutoplayScheduler {
    active: bool,
    delay: Duration,
    timer: Option<Pin<Box<Sleep>>>,
}

impl AutoplayScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            active: false,
            delay,
            timer: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a tick is armed and has not fired yet
    pub fn has_pending_tick(&self) -> bool {
        self.timer.is_some()
    }

    /// Activate and arm an immediate first tick
    pub fn start(&mut self) {
        self.active = true;
        self.timer = Some(Box::pin(sleep(Duration::ZERO)));
    }

    /// Arm the next tick after the configured delay; ignored when inactive
    pub fn schedule(&mut self) {
        if self.active {
            self.timer = Some(Box::pin(sleep(self.delay)));
        }
    }

    /// Deactivate and drop the armed tick. Calling it again does nothing.
    pub fn stop(&mut self) {
        self.active = false;
        self.timer = None;
    }

    /// Resolves when the armed tick fires, and never when nothing is armed.
    ///
    /// Cancel safe: dropping the future keeps the timer armed.
    pub async fn due(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.as_mut().await;
                self.timer = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
