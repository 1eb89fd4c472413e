//! Scripted board for testing.
//!
//! Records every feedback call and lets a test "player" react to what the
//! lights show, pressing buttons through the same [`EventHandle`] the real
//! input thread would use.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use crate::board::{FeedbackSink, InputPort, Outputs, Region};
use crate::challenge::ButtonSet;
use crate::event::EventHandle;
use crate::play::Button;

/// One recorded feedback call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Clear,
    Text(Region, String),
    Score(u16),
    Outputs(Outputs),
    Pulse { outputs: Outputs, cycles: u8 },
}

/// The simulated player's hands: button edges plus held-button state.
#[derive(Debug, Clone)]
pub struct PlayerHands {
    events: EventHandle,
    pressed: Arc<AtomicU8>,
}

impl PlayerHands {
    pub fn new(events: EventHandle) -> Self {
        Self {
            events,
            pressed: Arc::new(AtomicU8::new(0)),
        }
    }

    /// Press and release immediately: an edge without a held state.
    pub fn tap(&self, button: Button) -> bool {
        self.events.button_edge(button)
    }

    /// Hold down `buttons` (in addition to anything already held), raising an
    /// edge for each newly pressed one.
    pub fn hold(&self, buttons: ButtonSet) {
        let before = ButtonSet::from_bits_truncate(
            self.pressed.fetch_or(buttons.bits(), Ordering::SeqCst),
        );
        for button in buttons.difference(before).buttons() {
            self.events.button_edge(button);
        }
    }

    pub fn release_all(&self) {
        self.pressed.store(0, Ordering::SeqCst);
    }

    pub fn pressed(&self) -> ButtonSet {
        ButtonSet::from_bits_truncate(self.pressed.load(Ordering::SeqCst))
    }
}

type Reaction = Box<dyn FnMut(Outputs, &PlayerHands) + Send>;

/// Recording board driven by an optional reaction to output changes.
pub struct MockBoard {
    frames: Vec<Frame>,
    hands: PlayerHands,
    reaction: Option<Reaction>,
}

impl MockBoard {
    pub fn new(events: EventHandle) -> Self {
        Self {
            frames: Vec::new(),
            hands: PlayerHands::new(events),
            reaction: None,
        }
    }

    /// Call `reaction` after every `set_outputs`.
    pub fn on_outputs<F>(mut self, reaction: F) -> Self
    where
        F: FnMut(Outputs, &PlayerHands) + Send + 'static,
    {
        self.reaction = Some(Box::new(reaction));
        self
    }

    pub fn hands(&self) -> &PlayerHands {
        &self.hands
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// All text written to the display, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.frames
            .iter()
            .filter_map(|frame| match frame {
                Frame::Text(_, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every score drawn at the score cursor, in order.
    pub fn scores(&self) -> Vec<u16> {
        self.frames
            .iter()
            .filter_map(|frame| match frame {
                Frame::Score(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn clear_frames(&mut self) {
        self.frames.clear();
    }
}

impl FeedbackSink for MockBoard {
    fn clear(&mut self) {
        self.frames.push(Frame::Clear);
    }

    fn write(&mut self, region: Region, text: &str) {
        self.frames.push(Frame::Text(region, text.to_string()));
    }

    fn draw_score(&mut self, value: u16) {
        self.frames.push(Frame::Score(value));
    }

    fn set_outputs(&mut self, outputs: Outputs) {
        self.frames.push(Frame::Outputs(outputs));
        if let Some(reaction) = self.reaction.as_mut() {
            reaction(outputs, &self.hands);
        }
    }

    fn pulse(&mut self, outputs: Outputs, cycles: u8, _interval: Duration) {
        self.frames.push(Frame::Pulse { outputs, cycles });
    }
}

impl InputPort for MockBoard {
    fn snapshot(&self) -> ButtonSet {
        self.hands.pressed()
    }
}
