//! Pacing constants for playback and feedback.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long each symbol is shown during playback
pub const DEFAULT_SHOW_MS: u64 = 400;

/// Silence between two symbols during playback
pub const DEFAULT_GAP_MS: u64 = 300;

/// Flash length when the player presses a pad
pub const DEFAULT_FEEDBACK_MS: u64 = 200;

/// Pause between a cleared level and the next playback
pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1000;

/// Game pacing, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub show_ms: u64,
    pub gap_ms: u64,
    pub feedback_ms: u64,
    pub advance_delay_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            show_ms: DEFAULT_SHOW_MS,
            gap_ms: DEFAULT_GAP_MS,
            feedback_ms: DEFAULT_FEEDBACK_MS,
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
        }
    }
}

impl Timing {
    pub fn show(&self) -> Duration {
        Duration::from_millis(self.show_ms)
    }

    pub fn gap(&self) -> Duration {
        Duration::from_millis(self.gap_ms)
    }

    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    /// Time one playback step occupies: the flash plus the gap after it
    pub fn step(&self) -> Duration {
        self.show() + self.gap()
    }

    /// Total playback time for a sequence of `len` symbols
    pub fn playback(&self, len: usize) -> Duration {
        self.step() * len as u32
    }
}
