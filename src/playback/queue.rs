//! Steppable queue of the current phase's displayable events

use crate::types::PhaseEvent;

/// Keep only the events presented one at a time, preserving order
pub fn filter_displayable_events(events: &[PhaseEvent]) -> Vec<PhaseEvent> {
    events
        .iter()
        .filter(|e| e.is_displayable())
        .cloned()
        .collect()
}

/// Result of moving the cursor forward
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// The cursor now points at `event`, with `remaining` events after it
    Shown { event: PhaseEvent, remaining: usize },
    /// The cursor moved past the last event
    Exhausted,
}

/// Events of one phase and a cursor to the one being presented
///
/// The cursor only moves forward and stops at `len()`.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<PhaseEvent>,
    cursor: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with the displayable subset of `events`
    pub fn load(&mut self, events: &[PhaseEvent]) {
        self.events = filter_displayable_events(events);
        self.cursor = 0;
    }

    /// Event at the cursor
    pub fn current(&self) -> Option<&PhaseEvent> {
        self.events.get(self.cursor)
    }

    /// Whether another event follows the current one
    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.events.len()
    }

    pub fn advance(&mut self) -> StepResult {
        if self.cursor < self.events.len() {
            self.cursor += 1;
        }
        match self.events.get(self.cursor) {
            Some(event) => StepResult::Shown {
                event: event.clone(),
                remaining: self.remaining(),
            },
            None => StepResult::Exhausted,
        }
    }

    /// Events left after the current one
    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.cursor + 1)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.cursor = 0;
    }
}
