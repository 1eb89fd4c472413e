//! Game configuration.
//!
//! This module contains:
//! - Fixed timing defaults taken from the board firmware (`timing`)
//! - `GameConfig` / `Timing` - TOML-loadable overrides of those defaults
//!
//! Difficulty thresholds live in [`crate::play::DifficultyTier`] and are
//! intentionally not part of the configuration.

mod game;

pub use game::*;

/// Timing defaults of the board.
///
/// The countdown runs `COUNTDOWN_STEPS` steps of `COUNTDOWN_STEP_MS` each (~4 s),
/// and the end-of-game sequence holds for `GAME_OVER_HOLD_MS + RESULT_HOLD_MS` (~6 s).
pub mod timing {
    /// Response window for one challenge round.
    pub const RESPONSE_WINDOW_MS: u64 = 2000;

    /// Delay between countdown display steps.
    pub const COUNTDOWN_STEP_MS: u64 = 1000;

    /// Number of countdown display steps ("Starting...", "3", "2", "1").
    pub const COUNTDOWN_STEPS: usize = 4;

    /// Pause after a correct answer before the next round.
    pub const ROUND_PAUSE_MS: u64 = 1000;

    /// How long "Game Over." stays on the display.
    pub const GAME_OVER_HOLD_MS: u64 = 2000;

    /// How long the final score and high score stay on the display.
    pub const RESULT_HOLD_MS: u64 = 4000;

    /// Buzzer toggles for the correct-answer chime.
    pub const CHIME_CYCLES: u8 = 20;

    /// Interval between buzzer toggles.
    pub const CHIME_INTERVAL_MS: u64 = 10;

    /// Interval between input snapshot comparisons during a round.
    pub const POLL_INTERVAL_MS: u64 = 5;

    /// Menu attract-blink toggle interval.
    pub const ATTRACT_INTERVAL_MS: u64 = 500;
}
