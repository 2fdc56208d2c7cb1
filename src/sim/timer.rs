//! Escape countdown

use serde::{Deserialize, Serialize};

use crate::consts::ESCAPE_SECONDS;

/// Countdown for the escape window. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscapeTimer {
    /// Value restored by `reset`
    duration: f32,
    remaining: f32,
}

impl Default for EscapeTimer {
    fn default() -> Self {
        Self::new(ESCAPE_SECONDS)
    }
}

impl EscapeTimer {
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            remaining: duration,
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    /// Count down by `dt`, clamping at zero
    ///
    /// Returns true only on the tick that reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        self.remaining == 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}
