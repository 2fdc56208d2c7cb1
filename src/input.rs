//! Keyboard and mouse state to per-tick input
//!
//! The windowing layer reports raw press/release and motion events here;
//! once per frame the driver takes a `TickInput` for the simulation.
//! One-shot signals (pause, menu actions) are cleared after each take.

use glam::Vec2;

use crate::sim::{MoveKeys, TickInput, UiAction};

/// A key as reported by the windowing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

/// Accumulated input between two ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: MoveKeys,
    pause: bool,
    look: Vec2,
    action: Option<UiAction>,
    autopilot: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key press or release. Letters are case-insensitive.
    pub fn key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Escape => {
                // Edge triggered: only the press counts
                if pressed {
                    self.pause = true;
                }
            }
            Key::Char(c) => match c.to_ascii_lowercase() {
                'w' => self.held.forward = pressed,
                's' => self.held.back = pressed,
                'a' => self.held.left = pressed,
                'd' => self.held.right = pressed,
                _ => {}
            },
        }
    }

    /// Pointer motion relative to the capture point
    pub fn mouse_motion(&mut self, delta: Vec2) {
        self.look += delta;
    }

    /// Menu choice made this frame; the latest one wins
    pub fn ui_action(&mut self, action: UiAction) {
        self.action = Some(action);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Input for the next tick; clears one-shot signals and motion
    pub fn take(&mut self) -> TickInput {
        TickInput {
            keys: self.held,
            pause: std::mem::take(&mut self.pause),
            look: std::mem::take(&mut self.look),
            action: self.action.take(),
            autopilot: self.autopilot,
        }
    }
}
