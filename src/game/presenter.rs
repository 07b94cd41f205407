//! Presentation seam between the game engine and the outside world.
//!
//! The engine owns every duration: `present` is fire-and-forget and the
//! engine schedules its own timers for when the flash is over.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::time::Duration;

use log::warn;

use crate::game::symbol::Symbol;

/// Terminal message surfaced by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A new game started, playback is about to begin
    WatchSequence,
    /// A level began; carries the new level counter
    Level(u32),
    /// Playback finished, the player may enter the sequence
    YourTurn,
    /// The player reproduced the whole sequence
    LevelCleared,
    /// Round lost without beating the best score
    GameOver { score: u32 },
    /// Round lost with a new best score
    NewHighScore { score: u32 },
    /// Hard reset
    Reset,
    /// Best score known to the engine
    BestScore(u32),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::WatchSequence => write!(f, "Watch the sequence!"),
            Notice::Level(level) => write!(f, "Level {}", level),
            Notice::YourTurn => write!(f, "Your turn!"),
            Notice::LevelCleared => write!(f, "Nice! Next Level..."),
            Notice::GameOver { score } => write!(f, "Game Over! Score: {}", score),
            Notice::NewHighScore { score } => write!(f, "New High Score! {}", score),
            Notice::Reset => write!(f, "Game Reset. Press Start to Play Again."),
            Notice::BestScore(best) => write!(f, "Best: {}", best),
        }
    }
}

/// Flashes pads, emits tones and shows messages
pub trait Presenter {
    /// Highlight `symbol` and sound its tone for `duration`
    fn present(&mut self, symbol: Symbol, duration: Duration);

    /// Enable or silence tone emission. Flashing is unaffected.
    fn set_muted(&mut self, muted: bool);

    /// Show a status message
    fn notify(&mut self, notice: &Notice);
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, symbol: Symbol, duration: Duration) {
        (**self).present(symbol, duration)
    }

    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted)
    }

    fn notify(&mut self, notice: &Notice) {
        (**self).notify(notice)
    }
}

// ============================================================================
// Pad table
// ============================================================================

/// How one pad is drawn and sounded
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub label: String,
    pub tone_hz: f32,
}

/// Explicit mapping from symbol to its presentation
#[derive(Debug, Clone, PartialEq)]
pub struct PadTable {
    pads: BTreeMap<Symbol, Pad>,
}

impl Default for PadTable {
    fn default() -> Self {
        let pads = Symbol::ALL
            .into_iter()
            .map(|symbol| {
                let pad = Pad {
                    label: symbol.to_string(),
                    tone_hz: symbol.tone_hz(),
                };
                (symbol, pad)
            })
            .collect();
        Self { pads }
    }
}

impl PadTable {
    /// Override the label shown for `symbol`
    pub fn with_label(mut self, symbol: Symbol, label: impl Into<String>) -> Self {
        if let Some(pad) = self.pads.get_mut(&symbol) {
            pad.label = label.into();
        }
        self
    }

    pub fn pad(&self, symbol: Symbol) -> Option<&Pad> {
        self.pads.get(&symbol)
    }
}

// ============================================================================
// Terminal presenter
// ============================================================================

/// Writes flashes and messages as lines of text; a tone is the terminal bell
pub struct TerminalPresenter<W: Write> {
    pads: PadTable,
    out: W,
    muted: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(pads: PadTable, out: W) -> Self {
        Self {
            pads,
            out,
            muted: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        let result = writeln!(self.out, "{}", line).and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, symbol: Symbol, duration: Duration) {
        let line = match self.pads.pad(symbol) {
            Some(pad) if self.muted => format!("  [{}]", pad.label),
            Some(pad) => format!("\x07  [{}] {:.1} Hz", pad.label, pad.tone_hz),
            None => format!("  [{}]", symbol),
        };
        log::trace!("present {} for {:?}", symbol, duration);
        self.emit(&line);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.emit(if muted { "Sound off" } else { "Sound on" });
    }

    fn notify(&mut self, notice: &Notice) {
        self.emit(&notice.to_string());
    }
}

// ============================================================================
// Recording presenter
// ============================================================================

/// One call to [`Presenter::present`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    pub symbol: Symbol,
    pub duration: Duration,
    /// Whether a tone was emitted with the flash
    pub audible: bool,
}

/// Keeps every call for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub flashes: Vec<Flash>,
    pub notices: Vec<Notice>,
    pub muted: bool,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbols flashed for `duration`, in order
    pub fn flashed_with(&self, duration: Duration) -> Vec<Symbol> {
        self.flashes
            .iter()
            .filter(|f| f.duration == duration)
            .map(|f| f.symbol)
            .collect()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn clear(&mut self) {
        self.flashes.clear();
        self.notices.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, symbol: Symbol, duration: Duration) {
        self.flashes.push(Flash {
            symbol,
            duration,
            audible: !self.muted,
        });
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
