//! CLI argument definitions for reflex.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hold window for a key press when none is given.
pub const DEFAULT_HOLD_MS: u64 = 400;

#[derive(Parser)]
#[command(name = "reflex")]
#[command(about = "Reflex memory game (terminal board)", version)]
pub struct Args {
    /// Path to a TOML game config (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE", env = "REFLEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Best score file (default: <data dir>/reflex/best_score.json)
    #[arg(long, value_name = "FILE", env = "REFLEX_STORE")]
    pub store: Option<PathBuf>,

    /// Log file (the terminal is used by the board)
    #[arg(long, value_name = "FILE", default_value = "reflex.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Play on the terminal board (default)
    Play {
        /// Fixed seed for the challenge generator (reproducible rounds)
        #[arg(long)]
        seed: Option<u64>,
        /// How long a key counts as held after each press, in ms
        #[arg(long, default_value_t = DEFAULT_HOLD_MS)]
        hold_ms: u64,
    },
    /// Show the stored best score
    Scores {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}
