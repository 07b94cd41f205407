//! Echopad CLI - terminal memory game
//!
//! Command-line entry point for Echopad.

use clap::Parser;
use env_logger::Env;
use log::info;

use echopad::cli::commands::{self, Settings};
use echopad::cli::{Cli, Commands};
use echopad::EchoError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger (stderr, so it stays out of the game's stdout)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Echopad v{}", env!("CARGO_PKG_VERSION"));

    let command = cli.command.clone().unwrap_or_default();
    if let Err(e) = handle_command(&cli, command) {
        if let Some(suggestion) = e.recovery_suggestion() {
            eprintln!("hint: {}", suggestion);
        }
        return Err(e.into());
    }

    Ok(())
}

fn handle_command(cli: &Cli, cmd: Commands) -> Result<(), EchoError> {
    let settings = || Settings::resolve(cli.config.as_deref(), cli.profile.as_deref());

    match cmd {
        Commands::Play { seed, muted } => commands::play(&settings()?, seed, muted),
        Commands::Best => commands::show_best(&settings()?),
        Commands::ResetBest => commands::reset_best(&settings()?),
        Commands::Keys => commands::show_keys(&settings()?),
        // tone export needs neither config nor profile
        Commands::ExportTones {
            dir,
            duration_ms,
            sample_rate,
        } => commands::export_tones(&dir, duration_ms, sample_rate).map(|_| ()),
    }
}
