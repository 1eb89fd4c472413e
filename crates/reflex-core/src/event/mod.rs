//! Asynchronous event sources.
//!
//! Button edges are raised from other threads through a cloneable
//! [`EventHandle`] (the interrupt side). The single consumer, [`EventSource`],
//! is owned by the controller and also owns the response-window deadline.
//!
//! Arming works like a pin-change mask: the handle drops edges for buttons
//! that are not armed. Every `arm`/`quiesce` starts a new epoch, and the
//! consumer discards edges stamped with an older one, so nothing queued for
//! one state can leak into the next.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::challenge::ButtonSet;
use crate::play::Button;

/// Normalized hardware event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    ButtonEdge(Button),
    WindowExpired,
}

/// Armed button mask and epoch, packed so producers read both atomically.
#[derive(Debug, Default)]
struct Gate(AtomicU64);

impl Gate {
    fn load(&self) -> (u32, ButtonSet) {
        let word = self.0.load(Ordering::SeqCst);
        (
            (word >> 8) as u32,
            ButtonSet::from_bits_truncate(word as u8),
        )
    }

    fn store(&self, epoch: u32, armed: ButtonSet) {
        self.0
            .store(((epoch as u64) << 8) | armed.bits() as u64, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy)]
struct Stamped {
    button: Button,
    epoch: u32,
}

/// Producer side. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct EventHandle {
    gate: Arc<Gate>,
    tx: Sender<Stamped>,
}

impl EventHandle {
    /// Report a button edge. Returns `false` if the button is not armed.
    pub fn button_edge(&self, button: Button) -> bool {
        let (epoch, armed) = self.gate.load();
        if !armed.contains_button(button) {
            trace!("Dropped edge for disarmed button {}", button);
            return false;
        }
        self.tx.send(Stamped { button, epoch }).is_ok()
    }

    /// Buttons currently accepted.
    pub fn armed(&self) -> ButtonSet {
        self.gate.load().1
    }
}

/// Consumer side, owned by the controller.
#[derive(Debug)]
pub struct EventSource {
    gate: Arc<Gate>,
    rx: Receiver<Stamped>,
    handle: EventHandle,
    epoch: u32,
    armed: ButtonSet,
    deadline: Option<Instant>,
}

impl EventSource {
    pub fn new() -> Self {
        let gate = Arc::new(Gate::default());
        let (tx, rx) = mpsc::channel();
        let handle = EventHandle {
            gate: Arc::clone(&gate),
            tx,
        };
        Self {
            gate,
            rx,
            handle,
            epoch: 0,
            armed: ButtonSet::empty(),
            deadline: None,
        }
    }

    pub fn handle(&self) -> EventHandle {
        self.handle.clone()
    }

    pub fn armed(&self) -> ButtonSet {
        self.armed
    }

    /// Time left in the response window, `None` when no window is running.
    pub fn window_remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Replace the armed button set and start a new epoch.
    pub fn arm(&mut self, buttons: ButtonSet) {
        self.epoch = self.epoch.wrapping_add(1);
        self.armed = buttons;
        self.gate.store(self.epoch, buttons);
    }

    /// Start the response window; `WindowExpired` is delivered once it closes.
    pub fn arm_window(&mut self, window: Duration) {
        self.deadline = Some(Instant::now() + window);
    }

    /// Disarm everything and discard queued edges. Returns the number discarded.
    pub fn quiesce(&mut self) -> usize {
        self.arm(ButtonSet::empty());
        self.deadline = None;

        let mut discarded = 0;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            trace!("Discarded {} queued edge(s)", discarded);
        }
        discarded
    }

    /// Wait up to `timeout` for the next armed event.
    ///
    /// Queued edges are returned before a window expiry observed in the same call.
    pub fn next(&mut self, timeout: Duration) -> Option<Event> {
        let until = Instant::now() + timeout;

        loop {
            if let Some(button) = self.next_edge(Duration::ZERO) {
                return Some(Event::ButtonEdge(button));
            }
            if self.take_expired() {
                return Some(Event::WindowExpired);
            }

            let left = until.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return None;
            }
            let wait = self.window_remaining().map_or(left, |window| window.min(left));
            if let Some(button) = self.next_edge(wait) {
                return Some(Event::ButtonEdge(button));
            }
        }
    }

    /// Wait up to `timeout` for an armed button edge. The window is not checked.
    pub fn next_edge(&mut self, timeout: Duration) -> Option<Button> {
        let until = Instant::now() + timeout;

        loop {
            let stamped = match self.rx.try_recv() {
                Ok(stamped) => stamped,
                Err(TryRecvError::Disconnected) => return None,
                Err(TryRecvError::Empty) => {
                    let left = until.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return None;
                    }
                    match self.rx.recv_timeout(left) {
                        Ok(stamped) => stamped,
                        Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                            return None;
                        }
                    }
                }
            };
            if let Some(button) = self.accept(stamped) {
                return Some(button);
            }
        }
    }

    /// True once if the response window has closed; the window is disarmed.
    pub fn take_expired(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    fn accept(&self, stamped: Stamped) -> Option<Button> {
        if stamped.epoch == self.epoch && self.armed.contains_button(stamped.button) {
            Some(stamped.button)
        } else {
            trace!(
                "Discarded stale edge {} (epoch {} != {})",
                stamped.button, stamped.epoch, self.epoch
            );
            None
        }
    }
}

impl Default for EventSource {
    fn default() -> Self {
        Self::new()
    }
}
