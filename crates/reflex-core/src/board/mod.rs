//! Board abstraction for testability.
//!
//! The engine talks to the display, lights, buzzer and buttons only through
//! these traits, so it runs unchanged against a terminal simulator or the
//! scripted [`mock::MockBoard`].

pub mod mock;

use std::time::Duration;

use bitflags::bitflags;

use crate::challenge::{ButtonSet, ChallengeMask};

/// Column of the live score on the top display row (after "Score: ").
pub const SCORE_COLUMN: usize = 7;

/// Characters per display row.
pub const DISPLAY_WIDTH: usize = 16;

bitflags! {
    /// Lights and buzzer, written as one combined bitmask.
    ///
    /// Color lights sit one bit above the matching [`ChallengeMask`] bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Outputs: u8 {
        const BUZZER = 1 << 0;
        const GREEN = 1 << 1;
        const YELLOW = 1 << 2;
        const BLUE = 1 << 3;
        const RED = 1 << 4;
        const START = 1 << 5;
    }
}

impl Outputs {
    /// Lights for the colors of a challenge.
    pub fn lights(mask: ChallengeMask) -> Self {
        Self::from_bits_truncate(mask.bits() << 1)
    }

    /// Color lights currently on, as a mask.
    pub fn color_lights(&self) -> ChallengeMask {
        ChallengeMask::from_bits_truncate(self.bits() >> 1)
    }
}

/// Addressable display rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Top,
    Bottom,
}

/// Output-only feedback: display, lights and buzzer.
///
/// Nothing returned here influences game state.
pub trait FeedbackSink {
    /// Clear the display and home the cursor.
    fn clear(&mut self);

    /// Write text starting at the beginning of a row.
    fn write(&mut self, region: Region, text: &str);

    /// Redraw the live score at [`SCORE_COLUMN`] of the top row.
    fn draw_score(&mut self, value: u16);

    /// Replace the state of every light and the buzzer.
    fn set_outputs(&mut self, outputs: Outputs);

    /// Toggle `outputs` `cycles` times, `interval` apart. Blocks until done.
    fn pulse(&mut self, outputs: Outputs, cycles: u8, interval: Duration);
}

/// Instantaneous button state.
pub trait InputPort {
    fn snapshot(&self) -> ButtonSet;
}

/// Everything the controller needs from the hardware.
pub trait Board: FeedbackSink + InputPort {}

impl<T: FeedbackSink + InputPort> Board for T {}
