use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::event::Event;
use crate::play::Button;

/// Game state. Exactly one is active at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, IntoStaticStr,
)]
pub enum GameState {
    #[default]
    Menu,
    Countdown,
    ViewScores,
    Challenge,
    RoundResolved,
    Ended,
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{}", name)
    }
}

/// Input to the transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// An armed button edge.
    Button(Button),
    /// The response window closed.
    WindowExpired,
    /// The input snapshot equals the challenge mask.
    InputMatched,
    /// A blocking state handler finished its entry sequence.
    Completed,
}

impl From<Event> for Trigger {
    fn from(event: Event) -> Self {
        match event {
            Event::ButtonEdge(button) => Self::Button(button),
            Event::WindowExpired => Self::WindowExpired,
        }
    }
}

bitflags! {
    /// Side effects applied by the controller, in declaration order, before the
    /// new state becomes current.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Effects: u8 {
        /// Disarm every event source, stop the window, drop queued events.
        const QUIESCE = 1 << 0;
        /// Turn off all lights and the buzzer.
        const CLEAR_OUTPUTS = 1 << 1;
        /// Forget the current challenge mask.
        const DISCARD_ROUND = 1 << 2;
        /// sessionScore <- 0
        const RESET_SCORE = 1 << 3;
        /// sessionScore += 1
        const AWARD_POINT = 1 << 4;
        /// Persist sessionScore if it beats the stored best.
        const RECORD_BEST = 1 << 5;
    }
}

/// Result of the transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: GameState,
    pub effects: Effects,
}

impl Transition {
    pub fn new(next: GameState, effects: Effects) -> Self {
        Self { next, effects }
    }
}

/// How the last round ended. Diagnostic only: both failures route to `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    Correct,
    WrongButton(Button),
    Expired,
}

/// The single authoritative transition function.
///
/// ## Transitions
///
/// - Menu + Start -> Countdown (score reset)
/// - Menu + Scores -> ViewScores
/// - Countdown + Completed -> Challenge
/// - Challenge + InputMatched -> RoundResolved (point awarded)
/// - Challenge + colour button / WindowExpired -> Ended (best recorded)
/// - RoundResolved + Completed -> Challenge
/// - Ended + Completed -> Menu
/// - ViewScores + Exit -> Menu
///
/// Anything else returns `None` and must be ignored by the caller.
pub fn transition(state: GameState, trigger: Trigger) -> Option<Transition> {
    let leave = Effects::QUIESCE | Effects::CLEAR_OUTPUTS;
    let fail = leave | Effects::DISCARD_ROUND | Effects::RECORD_BEST;

    let (next, effects) = match (state, trigger) {
        (GameState::Menu, Trigger::Button(Button::Start)) => {
            (GameState::Countdown, leave | Effects::RESET_SCORE)
        }
        (GameState::Menu, Trigger::Button(Button::SCORES)) => (GameState::ViewScores, leave),
        (GameState::Countdown, Trigger::Completed) => (GameState::Challenge, Effects::empty()),
        (GameState::Challenge, Trigger::InputMatched) => (
            GameState::RoundResolved,
            leave | Effects::DISCARD_ROUND | Effects::AWARD_POINT,
        ),
        (GameState::Challenge, Trigger::Button(button)) if button.is_color() => {
            (GameState::Ended, fail)
        }
        (GameState::Challenge, Trigger::WindowExpired) => (GameState::Ended, fail),
        (GameState::RoundResolved, Trigger::Completed) => {
            (GameState::Challenge, Effects::empty())
        }
        (GameState::Ended, Trigger::Completed) => (GameState::Menu, Effects::empty()),
        (GameState::ViewScores, Trigger::Button(Button::EXIT)) => (GameState::Menu, leave),
        _ => return None,
    };
    Some(Transition::new(next, effects))
}
