use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::timing;
use crate::error::Result;

/// Top-level game configuration, loaded from TOML.
///
/// ```toml
/// [timing]
/// response_window_ms = 1500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timing: Timing,
}

impl GameConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Durations used by the state handlers, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub response_window_ms: u64,
    pub countdown_step_ms: u64,
    pub round_pause_ms: u64,
    pub game_over_hold_ms: u64,
    pub result_hold_ms: u64,
    pub chime_cycles: u8,
    pub chime_interval_ms: u64,
    pub poll_interval_ms: u64,
    pub attract_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            response_window_ms: timing::RESPONSE_WINDOW_MS,
            countdown_step_ms: timing::COUNTDOWN_STEP_MS,
            round_pause_ms: timing::ROUND_PAUSE_MS,
            game_over_hold_ms: timing::GAME_OVER_HOLD_MS,
            result_hold_ms: timing::RESULT_HOLD_MS,
            chime_cycles: timing::CHIME_CYCLES,
            chime_interval_ms: timing::CHIME_INTERVAL_MS,
            poll_interval_ms: timing::POLL_INTERVAL_MS,
            attract_interval_ms: timing::ATTRACT_INTERVAL_MS,
        }
    }
}

impl Timing {
    pub fn response_window(&self) -> Duration {
        Duration::from_millis(self.response_window_ms)
    }

    pub fn countdown_step(&self) -> Duration {
        Duration::from_millis(self.countdown_step_ms)
    }

    pub fn round_pause(&self) -> Duration {
        Duration::from_millis(self.round_pause_ms)
    }

    pub fn game_over_hold(&self) -> Duration {
        Duration::from_millis(self.game_over_hold_ms)
    }

    pub fn result_hold(&self) -> Duration {
        Duration::from_millis(self.result_hold_ms)
    }

    pub fn chime_interval(&self) -> Duration {
        Duration::from_millis(self.chime_interval_ms)
    }

    /// Poll interval for the round loop.
    ///
    /// Never zero, and at most a twentieth of the response window so the
    /// held buttons are sampled many times before the window closes.
    pub fn poll_interval(&self) -> Duration {
        let ceiling = (self.response_window_ms / 20).max(1);
        Duration::from_millis(self.poll_interval_ms.clamp(1, ceiling))
    }

    pub fn attract_interval(&self) -> Duration {
        Duration::from_millis(self.attract_interval_ms.max(1))
    }
}
