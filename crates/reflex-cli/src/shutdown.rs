//! Shutdown signal shared between the keyboard thread, the Ctrl+C handler
//! and the game loop.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ShutdownSignal {
    flag: AtomicBool,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Raw flag, for loops that take `&AtomicBool`.
    pub fn flag(&self) -> &AtomicBool {
        &self.flag
    }
}
