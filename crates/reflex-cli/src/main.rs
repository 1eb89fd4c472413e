mod cli;
mod commands;
mod input;
mod shutdown;
mod terminal;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Command, DEFAULT_HOLD_MS};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_file)?;
    info!("reflex v{} starting", env!("CARGO_PKG_VERSION"));

    let store = args.store.unwrap_or_else(default_store_path);
    let config = args.config.as_deref();

    match args.command {
        Some(Command::Play { seed, hold_ms }) => commands::play::run(config, &store, seed, hold_ms),
        Some(Command::Scores { json }) => commands::scores::run(&store, json),
        Some(Command::Config) => commands::config::run(config),
        None => commands::play::run(config, &store, None, DEFAULT_HOLD_MS),
    }
}

/// Log to a file; stdout belongs to the board. RUST_LOG overrides the filter.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reflex=info,reflex_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reflex")
        .join("best_score.json")
}
