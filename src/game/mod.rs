//! Game Module
//!
//! The sequence-game core:
//! - Pad symbols and tones
//! - Pacing constants
//! - Cancellable timer queue
//! - Presenter seam
//! - Sequence engine state machine

pub mod engine;
pub mod presenter;
pub mod scheduler;
pub mod symbol;
pub mod timing;

pub use engine::{
    InputOutcome, RandomPicker, RoundResult, ScriptedPicker, SequenceEngine, SessionState,
    SymbolPicker,
};
pub use presenter::{Flash, Notice, Pad, PadTable, Presenter, RecordingPresenter, TerminalPresenter};
pub use scheduler::{TaskHandle, TimerQueue};
pub use symbol::Symbol;
pub use timing::Timing;
