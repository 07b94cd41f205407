//! Game Controller
//!
//! Maps raw input (keys, command words, whole lines) onto engine calls. No
//! game rules live here: turn guarding is the engine's job, and there is no
//! debouncing, so every press becomes its own `submit_input`.

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;

use crate::error::{EchoError, Result};
use crate::game::{InputOutcome, Presenter, SequenceEngine, Symbol, SymbolPicker};
use crate::store::ScoreStore;

/// Control commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Reset,
    Mute,
    Quit,
}

impl Command {
    /// Every word [`Command::parse`] accepts
    pub const WORDS: [&'static str; 7] =
        ["start", "go", "reset", "restart", "mute", "quit", "exit"];

    /// Parse a command word, case-insensitively. `mute` toggles.
    pub fn parse(word: &str) -> Option<Command> {
        match word.trim().to_ascii_lowercase().as_str() {
            "start" | "go" => Some(Command::Start),
            "reset" | "restart" => Some(Command::Reset),
            "mute" => Some(Command::Mute),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Whether the input loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ============================================================================
// Key map
// ============================================================================

/// Fixed lookup from key to pad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    keys: BTreeMap<char, Symbol>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let keys = [
            ('q', Symbol::Red),
            ('w', Symbol::Blue),
            ('a', Symbol::Green),
            ('s', Symbol::Orange),
        ]
        .into_iter()
        .collect();
        Self { keys }
    }
}

impl KeyMap {
    /// Build a key map. Keys are case-insensitive, so `Q` and `q` collide.
    ///
    /// A map whose keys can spell a command word is rejected, since such a
    /// line would be read as the command.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (char, Symbol)>) -> Result<Self> {
        let mut keys = BTreeMap::new();
        for (key, symbol) in pairs {
            let key = key.to_ascii_lowercase();
            if key.is_whitespace() {
                return Err(EchoError::InvalidConfig {
                    reason: "whitespace cannot be a pad key".to_string(),
                });
            }
            if keys.insert(key, symbol).is_some() {
                return Err(EchoError::DuplicateKey { key });
            }
        }

        if let Some(word) = Command::WORDS
            .iter()
            .find(|word| word.chars().all(|c| keys.contains_key(&c)))
        {
            return Err(EchoError::InvalidConfig {
                reason: format!("pad keys spell the command word '{}'", word),
            });
        }

        Ok(Self { keys })
    }

    pub fn lookup(&self, key: char) -> Option<Symbol> {
        self.keys.get(&key.to_ascii_lowercase()).copied()
    }

    /// First key bound to `symbol`
    pub fn key_for(&self, symbol: Symbol) -> Option<char> {
        self.keys
            .iter()
            .find(|(_, s)| **s == symbol)
            .map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Symbol)> + '_ {
        self.keys.iter().map(|(k, s)| (*k, *s))
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Routes input events into a [`SequenceEngine`]
pub struct GameController<P, S, G> {
    engine: SequenceEngine<P, S, G>,
    keys: KeyMap,
}

impl<P: Presenter, S: ScoreStore, G: SymbolPicker> GameController<P, S, G> {
    pub fn new(engine: SequenceEngine<P, S, G>, keys: KeyMap) -> Self {
        Self { engine, keys }
    }

    /// Bring the engine clock up to `now`
    pub fn tick(&mut self, now: Duration) {
        self.engine.advance_to(now);
    }

    /// A pad was activated directly (pointer, touch)
    pub fn press_pad(&mut self, symbol: Symbol) -> InputOutcome {
        self.engine.submit_input(symbol)
    }

    /// A key was pressed. Returns `None` for unmapped keys.
    pub fn press_key(&mut self, key: char) -> Option<InputOutcome> {
        let symbol = self.keys.lookup(key)?;
        Some(self.engine.submit_input(symbol))
    }

    pub fn command(&mut self, command: Command) -> Flow {
        match command {
            Command::Start => self.engine.start_game(),
            Command::Reset => self.engine.reset_game(),
            Command::Mute => {
                self.engine.toggle_mute();
            }
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Handle one line of terminal input: a command word, or a run of pad keys
    pub fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        if let Some(command) = Command::parse(line) {
            return self.command(command);
        }

        for key in line.chars().filter(|c| !c.is_whitespace()) {
            if self.press_key(key).is_none() {
                debug!("[CONTROLLER] Unmapped key {:?}", key);
            }
        }
        Flow::Continue
    }

    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    pub fn engine(&self) -> &SequenceEngine<P, S, G> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SequenceEngine<P, S, G> {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{RecordingPresenter, ScriptedPicker, SessionState, Timing};
    use crate::store::MemoryStore;
    use test_case::test_case;

    type TestController = GameController<RecordingPresenter, MemoryStore, ScriptedPicker>;

    fn controller(script: &[Symbol]) -> TestController {
        let engine = SequenceEngine::new(
            RecordingPresenter::new(),
            MemoryStore::new(),
            ScriptedPicker::new(script.iter().copied()),
            Timing::default(),
        );
        GameController::new(engine, KeyMap::default())
    }

    #[test_case('q', Some(Symbol::Red))]
    #[test_case('w', Some(Symbol::Blue))]
    #[test_case('a', Some(Symbol::Green))]
    #[test_case('s', Some(Symbol::Orange))]
    #[test_case('Q', Some(Symbol::Red))]
    #[test_case('x', None)]
    fn test_default_key_map(key: char, expected: Option<Symbol>) {
        assert_eq!(KeyMap::default().lookup(key), expected);
    }

    #[test_case("start", Some(Command::Start))]
    #[test_case("GO", Some(Command::Start))]
    #[test_case("restart", Some(Command::Reset))]
    #[test_case("mute", Some(Command::Mute))]
    #[test_case("unmute", None)]
    #[test_case(" exit ", Some(Command::Quit))]
    #[test_case("qwas", None)]
    fn test_command_parse(word: &str, expected: Option<Command>) {
        assert_eq!(Command::parse(word), expected);
    }

    #[test]
    fn test_key_map_rejects_duplicates() {
        let err = KeyMap::from_pairs([('j', Symbol::Red), ('J', Symbol::Blue)]).unwrap_err();
        assert!(matches!(err, EchoError::DuplicateKey { key: 'j' }));
    }

    #[test_case(&['g', 'o', 'x', 'y'], "go")]
    #[test_case(&['e', 'x', 'i', 't'], "exit")]
    fn test_key_map_rejects_command_words(keys: &[char], word: &str) {
        let pairs = keys.iter().copied().zip(Symbol::ALL);
        let err = KeyMap::from_pairs(pairs).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains(word));
    }

    #[test]
    fn test_key_map_allows_partial_command_letters() {
        let keys = KeyMap::from_pairs([('g', Symbol::Red), ('x', Symbol::Blue)]).unwrap();
        assert_eq!(keys.lookup('g'), Some(Symbol::Red));
    }

    #[test]
    fn test_key_for() {
        let keys = KeyMap::default();
        assert_eq!(keys.key_for(Symbol::Green), Some('a'));
    }

    #[test]
    fn test_start_command_starts_game() {
        let mut controller = controller(&[Symbol::Red]);
        assert_eq!(controller.handle_line("start"), Flow::Continue);
        assert_eq!(controller.engine().state(), SessionState::Presenting);
    }

    #[test]
    fn test_quit_command() {
        let mut controller = controller(&[Symbol::Red]);
        assert_eq!(controller.handle_line("quit"), Flow::Quit);
    }

    #[test]
    fn test_keys_in_a_line_are_routed_in_order() {
        let mut controller = controller(&[Symbol::Red, Symbol::Green, Symbol::Blue]);
        controller.command(Command::Start);
        controller.engine_mut().advance_level();
        controller.engine_mut().advance_level();
        controller.tick(Duration::from_millis(2100));

        controller.handle_line("q a");
        assert_eq!(controller.engine().input(), &[Symbol::Red, Symbol::Green]);
        assert!(controller.engine().is_started());
    }

    #[test]
    fn test_repeated_presses_are_not_debounced() {
        let mut controller = controller(&[Symbol::Red, Symbol::Red]);
        controller.command(Command::Start);
        controller.engine_mut().advance_level();
        controller.tick(Duration::from_millis(1400));

        assert_eq!(controller.press_key('q'), Some(InputOutcome::Accepted));
        assert_eq!(controller.press_key('q'), Some(InputOutcome::LevelComplete));
    }

    #[test]
    fn test_double_tap_on_last_pad_ends_round() {
        let mut controller = controller(&[Symbol::Red]);
        controller.command(Command::Start);
        controller.tick(Duration::from_millis(700));

        controller.handle_line("qq");
        assert_eq!(controller.engine().state(), SessionState::Idle);
        assert_eq!(controller.engine().last_result().map(|r| r.score), Some(1));

        controller.tick(Duration::from_millis(5000));
        assert_eq!(controller.engine().level(), 1);
    }

    #[test]
    fn test_keys_ignored_while_presenting() {
        let mut controller = controller(&[Symbol::Red]);
        controller.command(Command::Start);
        assert_eq!(controller.press_key('q'), Some(InputOutcome::Ignored));
        assert_eq!(controller.press_key('z'), None);
    }

    #[test]
    fn test_mute_command_passes_through() {
        let mut controller = controller(&[Symbol::Red]);
        controller.handle_line("mute");
        assert!(controller.engine().is_muted());
        controller.handle_line("mute");
        assert!(!controller.engine().is_muted());
    }
}
