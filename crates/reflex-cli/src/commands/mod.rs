//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod config;
pub mod play;
pub mod scores;

use std::path::Path;

use reflex_core::GameConfig;
use tracing::{info, warn};

/// Load the game config, falling back to defaults when it cannot be read.
pub fn load_config(path: Option<&Path>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };
    match GameConfig::load(path) {
        Ok(config) => {
            info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("Failed to load config from {:?}: {}, using defaults", path, e);
            GameConfig::default()
        }
    }
}
