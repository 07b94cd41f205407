//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use tokio::io::BufReader;

use crate::config::Config;
use crate::controller::{GameController, KeyMap};
use crate::error::Result;
use crate::game::{PadTable, RandomPicker, SequenceEngine, Symbol, TerminalPresenter};
use crate::runtime;
use crate::store::{ProfileStore, ScoreStore};
use crate::tones;

/// Config and profile resolved from flags, config file and platform defaults
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub profile: ProfileStore,
}

impl Settings {
    /// Profile precedence: `--profile`, then `profile_path` from the config,
    /// then the platform data directory.
    pub fn resolve(config_path: Option<&Path>, profile_path: Option<&Path>) -> Result<Self> {
        let config = Config::resolve(config_path)?;
        let profile_path = match (profile_path, &config.profile_path) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => path.clone(),
            (None, None) => ProfileStore::default_path()?,
        };

        Ok(Self {
            config,
            profile: ProfileStore::open(profile_path),
        })
    }
}

/// Play an interactive game on stdin/stdout.
pub fn play(settings: &Settings, seed: Option<u64>, muted: bool) -> Result<()> {
    let keys = settings.config.key_map()?;
    show_rules_once(&settings.profile, &keys);

    let presenter = TerminalPresenter::new(PadTable::default(), io::stdout());
    let picker = match seed {
        Some(seed) => RandomPicker::seeded(seed),
        None => RandomPicker::from_entropy(),
    };
    let mut engine = SequenceEngine::new(
        presenter,
        settings.profile.clone(),
        picker,
        settings.config.timing,
    );
    if muted {
        engine.toggle_mute();
    }

    info!("Profile: {}", settings.profile.path().display());
    let mut controller = GameController::new(engine, keys);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(runtime::run(
        &mut controller,
        BufReader::new(tokio::io::stdin()),
    ))?;

    println!("Best score: {}", controller.engine().best());
    Ok(())
}

/// Print the best score.
pub fn show_best(settings: &Settings) -> Result<()> {
    let profile = settings.profile.load()?;
    match profile.best_achieved_at {
        Some(at) => println!(
            "Best score: {} (set {})",
            profile.best_score,
            at.format("%Y-%m-%d %H:%M")
        ),
        None => println!("Best score: {}", profile.best_score),
    }
    Ok(())
}

/// Forget the best score.
pub fn reset_best(settings: &Settings) -> Result<()> {
    let previous = settings.profile.get()?;
    settings.profile.reset_best()?;
    info!("Best score reset (was {})", previous);
    println!("Best score reset (was {}).", previous);
    Ok(())
}

/// Print the key bindings.
pub fn show_keys(settings: &Settings) -> Result<()> {
    let keys = settings.config.key_map()?;
    print!("{}", key_help(&keys));
    Ok(())
}

/// Write the pad tones to `dir`.
pub fn export_tones(dir: &Path, duration_ms: u64, sample_rate: u32) -> Result<Vec<PathBuf>> {
    let written = tones::export_tones(dir, Duration::from_millis(duration_ms), sample_rate)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(written)
}

/// One line per pad plus the command words
pub fn key_help(keys: &KeyMap) -> String {
    let mut help = String::from("Pads:\n");
    for symbol in Symbol::ALL {
        let key = keys
            .key_for(symbol)
            .map(|k| k.to_string())
            .unwrap_or_else(|| "-".to_string());
        help.push_str(&format!("  {}  {}\n", key, symbol));
    }
    help.push_str("Commands: start, reset, mute, quit\n");
    help
}

/// First-run rules
pub fn rules_text(keys: &KeyMap) -> String {
    format!(
        "How to play:\n\
         1. Type 'start' and press Enter.\n\
         2. Watch the pads light up.\n\
         3. Repeat the sequence by typing the pad keys, then Enter.\n\
         4. Each round adds one more pad. One mistake ends the game.\n\
         {}",
        key_help(keys)
    )
}

fn show_rules_once(profile: &ProfileStore, keys: &KeyMap) {
    match profile.rules_seen() {
        Ok(true) => print!("{}", key_help(keys)),
        Ok(false) => {
            print!("{}", rules_text(keys));
            if let Err(e) = profile.mark_rules_seen() {
                warn!("Could not record that the rules were shown: {}", e);
            }
        }
        Err(e) => {
            warn!("Could not read profile: {}", e);
            print!("{}", rules_text(keys));
        }
    }
}
