//! Pad symbols and their tones.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four colored pads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Red,
    Blue,
    Green,
    Orange,
}

impl Symbol {
    /// Every symbol, in pad order
    pub const ALL: [Symbol; 4] = [Symbol::Red, Symbol::Blue, Symbol::Green, Symbol::Orange];

    /// Tone frequency in Hz. Fixed for the lifetime of the process.
    pub fn tone_hz(self) -> f32 {
        match self {
            Symbol::Red => 261.6,
            Symbol::Blue => 329.6,
            Symbol::Green => 392.0,
            Symbol::Orange => 523.3,
        }
    }

    /// Lowercase name, used for file names and config keys
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Red => "red",
            Symbol::Blue => "blue",
            Symbol::Green => "green",
            Symbol::Orange => "orange",
        }
    }

    /// Parse a pad name, case-insensitively
    pub fn from_name(name: &str) -> Option<Symbol> {
        Symbol::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Red => write!(f, "RED"),
            Symbol::Blue => write!(f, "BLUE"),
            Symbol::Green => write!(f, "GREEN"),
            Symbol::Orange => write!(f, "ORANGE"),
        }
    }
}
