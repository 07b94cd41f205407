//! Sequence Engine for Echopad
//!
//! Owns the target sequence, the player's input for the current level, the
//! level counter and the session state, and drives playback through a
//! [`Presenter`].
//!
//! State transitions:
//! - `Idle --start_game--> Presenting`
//! - `Presenting --playback complete--> AwaitingInput`
//! - `AwaitingInput --full match, after the advance delay--> Presenting` (next level)
//! - `AwaitingInput --mismatch--> Idle`
//! - `any --reset_game--> Idle`
//!
//! Time is virtual. The owner moves the clock forward with
//! [`SequenceEngine::advance_to`] and every task due by then runs at its own
//! deadline, so pacing stays exact however coarse the steps are.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::presenter::{Notice, Presenter};
use crate::game::scheduler::{TaskHandle, TimerQueue};
use crate::game::symbol::Symbol;
use crate::game::timing::Timing;
use crate::store::ScoreStore;

// ============================================================================
// Symbol pickers
// ============================================================================

/// Source of new sequence steps
pub trait SymbolPicker {
    fn pick(&mut self) -> Symbol;
}

/// Uniform, independent picks. Immediate repeats are allowed.
#[derive(Debug, Clone)]
pub struct RandomPicker<R = StdRng> {
    rng: R,
}

impl RandomPicker<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible picks for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SymbolPicker for RandomPicker<R> {
    fn pick(&mut self) -> Symbol {
        Symbol::ALL[self.rng.gen_range(0..Symbol::ALL.len())]
    }
}

/// Plays back a fixed script, starting over when it runs out
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    script: VecDeque<Symbol>,
}

impl ScriptedPicker {
    /// An empty script always picks RED
    pub fn new(script: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl SymbolPicker for ScriptedPicker {
    fn pick(&mut self) -> Symbol {
        match self.script.pop_front() {
            Some(symbol) => {
                self.script.push_back(symbol);
                symbol
            }
            None => Symbol::Red,
        }
    }
}

// ============================================================================
// Session state and outcomes
// ============================================================================

/// Where the session is in the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No round running (initial, and after every round end or reset)
    #[default]
    Idle,
    /// Playing back the sequence; input is dropped
    Presenting,
    /// Waiting for the player to repeat the sequence
    AwaitingInput,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Presenting => write!(f, "Presenting"),
            SessionState::AwaitingInput => write!(f, "AwaitingInput"),
        }
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    /// Level counter at the end of the round
    pub score: u32,
    /// Whether the score beat the stored best
    pub new_best: bool,
}

/// What happened to one pad press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not the player's turn; the press was dropped
    Ignored,
    /// Correct, more symbols to go
    Accepted,
    /// Correct and the whole sequence is done; next level is scheduled
    LevelComplete,
    /// Wrong symbol; the round is over
    Failed(RoundResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Show `sequence[index]`, or hand over to the player once past the end
    PlaybackStep { generation: u64, index: usize },
    /// Start the next level after a cleared one
    Advance { generation: u64 },
}

// ============================================================================
// Engine
// ============================================================================

/// The game state machine
pub struct SequenceEngine<P, S, G = RandomPicker> {
    presenter: P,
    store: S,
    picker: G,
    timing: Timing,

    sequence: Vec<Symbol>,
    input: Vec<Symbol>,
    level: u32,
    state: SessionState,
    started: bool,
    muted: bool,
    best: u32,
    last_result: Option<RoundResult>,

    timers: TimerQueue<Task>,
    pending_advance: Option<TaskHandle>,
    /// Bumped whenever outstanding tasks become obsolete
    generation: u64,
    now: Duration,
}

impl<P: Presenter, S: ScoreStore, G: SymbolPicker> SequenceEngine<P, S, G> {
    /// Create an idle engine. The best score is read from `store` once, here.
    pub fn new(mut presenter: P, store: S, picker: G, timing: Timing) -> Self {
        let best = match store.get() {
            Ok(best) => best,
            Err(e) => {
                warn!("Could not read best score, starting from 0: {}", e);
                0
            }
        };
        presenter.notify(&Notice::BestScore(best));

        Self {
            presenter,
            store,
            picker,
            timing,
            sequence: Vec::new(),
            input: Vec::new(),
            level: 0,
            state: SessionState::Idle,
            started: false,
            muted: false,
            best,
            last_result: None,
            timers: TimerQueue::new(),
            pending_advance: None,
            generation: 0,
            now: Duration::ZERO,
        }
    }

    // ========================================================================
    // Game operations
    // ========================================================================

    /// Begin a new game. Ignored while a game is already running.
    pub fn start_game(&mut self) {
        if self.started {
            debug!("[ENGINE] Start ignored, game already in progress");
            return;
        }

        info!("[ENGINE] New game (best {})", self.best);
        self.invalidate_timers();
        self.started = true;
        self.level = 0;
        self.sequence.clear();
        self.last_result = None;
        self.presenter.notify(&Notice::WatchSequence);
        self.advance_level();
    }

    /// Grow the sequence by one random symbol and play it all back.
    ///
    /// Ignored when no game is running.
    pub fn advance_level(&mut self) {
        if !self.started {
            debug!("[ENGINE] Advance ignored, no game running");
            return;
        }

        // any playback or advance still queued belongs to the previous level
        self.invalidate_timers();

        self.level += 1;
        self.input.clear();
        let symbol = self.picker.pick();
        self.sequence.push(symbol);
        self.state = SessionState::Presenting;

        debug!(
            "[ENGINE] Level {} added {}, presenting {} symbols",
            self.level,
            symbol,
            self.sequence.len()
        );
        self.presenter.notify(&Notice::Level(self.level));
        self.play_step(0);
    }

    /// Check one pad press against the sequence
    pub fn submit_input(&mut self, symbol: Symbol) -> InputOutcome {
        if !self.started || self.state != SessionState::AwaitingInput {
            debug!("[ENGINE] Input {} dropped in state {}", symbol, self.state);
            return InputOutcome::Ignored;
        }

        self.input.push(symbol);
        self.presenter.present(symbol, self.timing.feedback());

        // a press past the end of a cleared sequence is a mismatch too
        let index = self.input.len() - 1;
        if self.sequence.get(index) != Some(&symbol) {
            debug!(
                "[ENGINE] Mismatch at {}: expected {:?}, got {}",
                index,
                self.sequence.get(index),
                symbol
            );
            return InputOutcome::Failed(self.end_round());
        }

        if self.input.len() == self.sequence.len() {
            self.presenter.notify(&Notice::LevelCleared);
            let due = self.now + self.timing.advance_delay();
            let task = Task::Advance {
                generation: self.generation,
            };
            self.pending_advance = Some(self.timers.schedule(due, task));
            debug!("[ENGINE] Level {} cleared, next at {:?}", self.level, due);
            return InputOutcome::LevelComplete;
        }

        InputOutcome::Accepted
    }

    /// End the current round as a loss and record the score if it is a new best
    pub fn end_round(&mut self) -> RoundResult {
        self.invalidate_timers();
        self.started = false;
        self.state = SessionState::Idle;

        let score = self.level;
        let new_best = score > self.best;
        if new_best {
            self.best = score;
            if let Err(e) = self.store.set(score) {
                warn!("Could not save best score {}: {}", score, e);
            }
            self.presenter.notify(&Notice::NewHighScore { score });
        } else {
            self.presenter.notify(&Notice::GameOver { score });
        }

        info!("[ENGINE] Round over, score {} (best {})", score, self.best);
        let result = RoundResult { score, new_best };
        self.last_result = Some(result);
        result
    }

    /// Flip tone emission. Returns the new mute flag.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.presenter.set_muted(self.muted);
        debug!("[ENGINE] Muted: {}", self.muted);
        self.muted
    }

    /// Hard reset to an empty idle session, whatever the current state
    pub fn reset_game(&mut self) {
        self.invalidate_timers();
        self.started = false;
        self.sequence.clear();
        self.input.clear();
        self.level = 0;
        self.state = SessionState::Idle;
        self.last_result = None;
        info!("[ENGINE] Reset");
        self.presenter.notify(&Notice::Reset);
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Move the clock to `now`, running every task due by then in order.
    ///
    /// The clock never goes backwards.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some((handle, task)) = self.timers.pop_due(now) {
            self.now = self.now.max(handle.due());
            self.run_task(task);
        }
        self.now = self.now.max(now);
    }

    /// Move the clock forward by `elapsed`
    pub fn advance_by(&mut self, elapsed: Duration) {
        self.advance_to(self.now + elapsed);
    }

    /// Earliest pending deadline, if anything is scheduled
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::PlaybackStep { generation, index } => {
                if generation != self.generation {
                    debug!("[ENGINE] Stale playback step dropped");
                    return;
                }
                self.play_step(index);
            }
            Task::Advance { generation } => {
                if generation != self.generation {
                    debug!("[ENGINE] Stale level advance dropped");
                    return;
                }
                self.pending_advance = None;
                self.advance_level();
            }
        }
    }

    fn play_step(&mut self, index: usize) {
        match self.sequence.get(index).copied() {
            Some(symbol) => {
                self.presenter.present(symbol, self.timing.show());
                let task = Task::PlaybackStep {
                    generation: self.generation,
                    index: index + 1,
                };
                self.timers.schedule(self.now + self.timing.step(), task);
            }
            None => {
                self.state = SessionState::AwaitingInput;
                debug!("[ENGINE] Playback done, awaiting input");
                self.presenter.notify(&Notice::YourTurn);
            }
        }
    }

    fn invalidate_timers(&mut self) {
        self.timers.cancel_all();
        self.pending_advance = None;
        self.generation += 1;
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn sequence(&self) -> &[Symbol] {
        &self.sequence
    }

    pub fn input(&self) -> &[Symbol] {
        &self.input
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// A cleared level is waiting for its advance delay
    pub fn is_advance_pending(&self) -> bool {
        self.pending_advance
            .is_some_and(|handle| self.timers.is_pending(handle))
    }

    pub fn last_result(&self) -> Option<RoundResult> {
        self.last_result
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
