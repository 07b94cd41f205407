//! CLI Module
//!
//! Command-line interface for Echopad.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tones::DEFAULT_SAMPLE_RATE;

/// Echopad - repeat the growing sequence of pads and tones
#[derive(Parser, Debug)]
#[command(name = "echopad")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: <config dir>/echopad/config.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile file holding the best score
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Play in the terminal (default)
    #[command(name = "play")]
    Play {
        /// Seed for a reproducible sequence
        #[arg(long)]
        seed: Option<u64>,

        /// Start with sound off
        #[arg(long)]
        muted: bool,
    },

    /// Print the best score
    #[command(name = "best")]
    Best,

    /// Forget the best score
    #[command(name = "reset-best")]
    ResetBest,

    /// Print the key bindings
    #[command(name = "keys")]
    Keys,

    /// Write each pad tone to a WAV file
    #[command(name = "export-tones")]
    ExportTones {
        /// Output directory
        dir: PathBuf,

        /// Tone length in milliseconds
        #[arg(long, default_value_t = 400)]
        duration_ms: u64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Play {
            seed: None,
            muted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_play() {
        let cli = Cli::try_parse_from(["echopad"]).unwrap();
        assert_eq!(cli.command.unwrap_or_default(), Commands::default());
    }

    #[test]
    fn test_play_flags() {
        let cli = Cli::try_parse_from(["echopad", "play", "--seed", "7", "--muted"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Play {
                seed: Some(7),
                muted: true
            })
        );
    }

    #[test]
    fn test_global_profile_after_subcommand() {
        let cli = Cli::try_parse_from(["echopad", "best", "--profile", "/tmp/p.json"]).unwrap();
        assert_eq!(cli.profile, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(cli.command, Some(Commands::Best));
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::try_parse_from(["echopad", "export-tones", "out"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::ExportTones {
                dir: PathBuf::from("out"),
                duration_ms: 400,
                sample_rate: 44100,
            })
        );
    }
}
