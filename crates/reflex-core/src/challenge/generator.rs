//! Difficulty-scaled challenge generation.
//!
//! Samples come from a [`SampleSource`] so tests and reproducible runs can
//! replace the weak counter-seeded default with a fixed sequence.

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing::trace;

use crate::challenge::ChallengeMask;
use crate::play::{Color, DifficultyTier};

/// Source of raw challenge samples.
///
/// Only `sample % 4` is significant. Not suitable for anything that needs
/// real randomness.
pub trait SampleSource {
    fn next_sample(&mut self) -> u8;
}

/// Default source: reseeds a small PRNG from a free-running counter on every draw.
#[derive(Debug, Clone)]
pub struct CounterSeeded {
    epoch: Instant,
}

impl CounterSeeded {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    fn counter(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }
}

impl Default for CounterSeeded {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for CounterSeeded {
    fn next_sample(&mut self) -> u8 {
        let mut rng = SmallRng::seed_from_u64(self.counter());
        rng.next_u32() as u8
    }
}

/// PRNG seeded once, for reproducible sessions.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: SmallRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl SampleSource for SeededSource {
    fn next_sample(&mut self) -> u8 {
        self.rng.next_u32() as u8
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    samples: Vec<u8>,
    cursor: usize,
}

impl SequenceSource {
    /// An empty list behaves like a list holding a single `0`.
    pub fn new(samples: Vec<u8>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Samples that produce exactly these colors, in order.
    pub fn from_colors(colors: &[Color]) -> Self {
        Self::new(colors.iter().map(|c| *c as u8).collect())
    }
}

impl SampleSource for SequenceSource {
    fn next_sample(&mut self) -> u8 {
        if self.samples.is_empty() {
            return 0;
        }
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor = self.cursor.wrapping_add(1);
        sample
    }
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn next_sample(&mut self) -> u8 {
        (**self).next_sample()
    }
}

/// Builds a [`ChallengeMask`] from `tier.draws()` independent samples.
///
/// Duplicate draws collapse in the union, so a mask can hold fewer distinct
/// colors than the tier asks for. This is kept as-is.
#[derive(Debug, Clone)]
pub struct ChallengeGenerator<S> {
    source: S,
}

impl<S: SampleSource> ChallengeGenerator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn generate(&mut self, tier: DifficultyTier) -> ChallengeMask {
        let mask: ChallengeMask = (0..tier.draws())
            .map(|_| Color::from_sample(self.source.next_sample()))
            .collect();
        trace!("Generated challenge {} at {}", mask, tier);
        mask
    }
}
