//! Play command: run the game on the terminal board.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reflex_core::{
    Controller, CounterSeeded, EventSource, FileStore, SampleSource, SeededSource,
};
use tracing::{error, info};

use super::load_config;
use crate::input::{self, HeldKeys};
use crate::shutdown::ShutdownSignal;
use crate::terminal::{TerminalBoard, TerminalGuard};

pub fn run(
    config_path: Option<&Path>,
    store_path: &Path,
    seed: Option<u64>,
    hold_ms: u64,
) -> Result<()> {
    let config = load_config(config_path);
    let shutdown = setup_shutdown_handler()?;

    let source: Box<dyn SampleSource + Send> = match seed {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            Box::new(SeededSource::new(seed))
        }
        None => Box::new(CounterSeeded::new()),
    };
    let store = FileStore::new(store_path);
    info!("Best score file: {:?}", store.path());

    let events = EventSource::new();
    let keys = Arc::new(HeldKeys::new(Duration::from_millis(hold_ms)));

    let guard = TerminalGuard::enter().context("Failed to prepare terminal")?;
    let keyboard =
        input::spawn_keyboard_monitor(Arc::clone(&shutdown), Arc::clone(&keys), events.handle());

    let board = TerminalBoard::new(keys);
    let mut controller = Controller::new(board, events, source, store, &config);
    controller.run(shutdown.flag());

    // Make sure the keyboard thread sees the shutdown even if the loop ended
    // on its own.
    shutdown.trigger();
    if keyboard.join().is_err() {
        error!("Keyboard thread panicked");
    }
    drop(guard);

    let session = controller.session_score();
    match controller.best_score() {
        Ok(best) => println!("Last session: {}  Best: {}", session, best),
        Err(e) => {
            error!("Failed to read best score: {}", e);
            println!("Last session: {}", session);
        }
    }
    Ok(())
}

/// Ctrl+C outside raw mode (or a SIGINT from elsewhere) also stops the game.
fn setup_shutdown_handler() -> Result<Arc<ShutdownSignal>> {
    let shutdown = Arc::new(ShutdownSignal::new());
    let handler = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        handler.trigger();
    })
    .context("Failed to install Ctrl+C handler")?;
    Ok(shutdown)
}
