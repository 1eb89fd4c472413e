//! Keyboard input for the terminal board.
//!
//! A terminal only reports key presses, never releases, so a key counts as
//! held for a fixed window after each press. Every press also raises a
//! button edge through the game's [`EventHandle`].
//!
//! Key map:
//! - Enter / Space: Start
//! - r / 1: Red, b / 2: Blue, y / 3: Yellow, g / 4: Green
//! - Esc, q, Ctrl+C: quit

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use reflex_core::{Button, ButtonSet, EventHandle};
use tracing::{debug, warn};

use crate::shutdown::ShutdownSignal;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(Button),
    Quit,
}

/// Translate a terminal key event into a board action.
pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyAction::Quit),
            _ => None,
        };
    }

    let button = match key.code {
        KeyCode::Esc => return Some(KeyAction::Quit),
        KeyCode::Enter | KeyCode::Char(' ') => Button::Start,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => return Some(KeyAction::Quit),
            'r' | '1' => Button::Red,
            'b' | '2' => Button::Blue,
            'y' | '3' => Button::Yellow,
            'g' | '4' => Button::Green,
            _ => return None,
        },
        _ => return None,
    };
    Some(KeyAction::Press(button))
}

/// Press timestamps, read back as a held-button snapshot.
#[derive(Debug)]
pub struct HeldKeys {
    pressed_at: Mutex<HashMap<Button, Instant>>,
    hold: Duration,
}

impl HeldKeys {
    pub fn new(hold: Duration) -> Self {
        Self {
            pressed_at: Mutex::new(HashMap::new()),
            hold,
        }
    }

    pub fn press(&self, button: Button) {
        self.press_at(button, Instant::now());
    }

    fn press_at(&self, button: Button, at: Instant) {
        if let Ok(mut pressed) = self.pressed_at.lock() {
            pressed.insert(button, at);
        }
    }

    /// Buttons pressed within the hold window.
    pub fn held(&self) -> ButtonSet {
        self.held_at(Instant::now())
    }

    fn held_at(&self, now: Instant) -> ButtonSet {
        let Ok(pressed) = self.pressed_at.lock() else {
            return ButtonSet::empty();
        };
        pressed
            .iter()
            .filter(|(_, at)| now.saturating_duration_since(**at) < self.hold)
            .fold(ButtonSet::empty(), |set, (button, _)| {
                set | ButtonSet::from(*button)
            })
    }
}

/// Spawn the keyboard thread. It exits when shutdown is requested.
pub fn spawn_keyboard_monitor(
    shutdown: Arc<ShutdownSignal>,
    keys: Arc<HeldKeys>,
    events: EventHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !shutdown.is_shutdown() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("Keyboard poll failed: {}", e);
                    break;
                }
            }

            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Keyboard read failed: {}", e);
                    break;
                }
            };

            match map_key(&key) {
                Some(KeyAction::Press(button)) => {
                    keys.press(button);
                    let accepted = events.button_edge(button);
                    debug!("Key {:?} -> {} (accepted: {})", key.code, button, accepted);
                }
                Some(KeyAction::Quit) => {
                    debug!("Quit key pressed");
                    shutdown.trigger();
                }
                None => {}
            }
        }
    })
}
