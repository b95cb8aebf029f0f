//! Input events
//!
//! Input callbacks only record intent. Held keys become flags, presses become
//! one-shot triggers, and both are consumed at the start of the next tick.
//! Events may be produced on another thread through an [`InputSender`].

use std::sync::mpsc::{self, Receiver, Sender};

use crate::sim::TickInput;

/// Discrete input from the windowing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
    FirePressed,
    PauseToggle,
}

/// Accumulated intent between ticks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    fire_queued: bool,
    pause_queued: bool,
}

impl InputState {
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeftStart => self.move_left = true,
            InputEvent::MoveLeftStop => self.move_left = false,
            InputEvent::MoveRightStart => self.move_right = true,
            InputEvent::MoveRightStop => self.move_right = false,
            InputEvent::FirePressed => self.fire_queued = true,
            // Two toggles before a tick cancel out
            InputEvent::PauseToggle => self.pause_queued = !self.pause_queued,
        }
    }

    /// Take the pending pause toggle
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause_queued)
    }

    /// Build this tick's input and clear the one-shot triggers
    pub fn take_tick_input(&mut self, idle_mode: bool) -> TickInput {
        TickInput {
            move_left: self.move_left,
            move_right: self.move_right,
            fire: std::mem::take(&mut self.fire_queued),
            idle_mode,
        }
    }

    /// Drop queued one-shots (they are not meaningful outside play)
    pub fn discard_triggers(&mut self) {
        self.fire_queued = false;
        self.pause_queued = false;
    }
}

/// Producer half, cloneable and `Send`
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event. Returns false once the game has been dropped.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Consumer half, owned by the game driver
#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<InputEvent>,
}

impl InputReceiver {
    /// Fold everything queued so far into `state`, returning the number of events
    pub fn drain_into(&self, state: &mut InputState) -> usize {
        let mut count = 0;
        for event in self.rx.try_iter() {
            state.apply(event);
            count += 1;
        }
        count
    }
}

pub fn channel() -> (InputSender, InputReceiver) {
    let (tx, rx) = mpsc::channel();
    (InputSender { tx }, InputReceiver { rx })
}
