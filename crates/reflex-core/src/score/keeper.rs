use tracing::info;

use crate::error::Result;
use crate::score::BestScoreStore;

/// Session score plus the durable best score.
#[derive(Debug)]
pub struct ScoreKeeper<S> {
    session: u16,
    store: S,
}

impl<S: BestScoreStore> ScoreKeeper<S> {
    pub fn new(store: S) -> Self {
        Self { session: 0, store }
    }

    pub fn session(&self) -> u16 {
        self.session
    }

    pub fn reset(&mut self) {
        self.session = 0;
    }

    /// Add one point. Saturates at `u16::MAX`.
    pub fn award(&mut self) -> u16 {
        self.session = self.session.saturating_add(1);
        self.session
    }

    pub fn best(&self) -> Result<u16> {
        self.store.read_best()
    }

    /// Persist the session score if it strictly beats the stored best.
    ///
    /// Returns the new best when a write happened.
    pub fn record_best(&mut self) -> Result<Option<u16>> {
        let best = self.store.read_best()?;
        if self.session <= best {
            return Ok(None);
        }
        self.store.write_best(self.session)?;
        info!("New best score: {} (was {})", self.session, best);
        Ok(Some(self.session))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
