//! Echopad - Terminal Memory Game
//!
//! The machine plays a sequence of colored-pad flashes with tones, and the
//! player repeats it. Every cleared level adds one more pad; one wrong pad
//! ends the round.
//!
//! # Architecture
//!
//! - [`game`]: the sequence engine state machine, its timer queue and the
//!   `Presenter` seam
//! - [`controller`]: maps keys and command words onto engine calls
//! - [`store`]: best-score persistence
//! - [`runtime`]: tokio event loop for the terminal
//! - [`tones`]: pad tone rendering and WAV export
//! - [`config`], [`cli`]: configuration and command-line front end

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod runtime;
pub mod store;
pub mod tones;

pub use error::{EchoError, Result};
