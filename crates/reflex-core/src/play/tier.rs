use serde::{Deserialize, Serialize};
use strum::FromRepr;

/// Number of simultaneous targets, derived from the session score.
///
/// | score  | tier |
/// |--------|------|
/// | 0-10   | 1    |
/// | 11-20  | 2    |
/// | 21-30  | 3    |
/// | > 30   | 4    |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, FromRepr,
)]
#[repr(u8)]
pub enum DifficultyTier {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl DifficultyTier {
    pub fn for_score(score: u16) -> Self {
        match score {
            0..=10 => Self::One,
            11..=20 => Self::Two,
            21..=30 => Self::Three,
            _ => Self::Four,
        }
    }

    /// Number of samples drawn for a challenge at this tier.
    pub fn draws(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(DifficultyTier::for_score(0), DifficultyTier::One);
        assert_eq!(DifficultyTier::for_score(10), DifficultyTier::One);
        assert_eq!(DifficultyTier::for_score(11), DifficultyTier::Two);
        assert_eq!(DifficultyTier::for_score(20), DifficultyTier::Two);
        assert_eq!(DifficultyTier::for_score(21), DifficultyTier::Three);
        assert_eq!(DifficultyTier::for_score(30), DifficultyTier::Three);
        assert_eq!(DifficultyTier::for_score(31), DifficultyTier::Four);
        assert_eq!(DifficultyTier::for_score(u16::MAX), DifficultyTier::Four);
    }

    #[test]
    fn test_draws() {
        assert_eq!(DifficultyTier::One.draws(), 1);
        assert_eq!(DifficultyTier::Four.draws(), 4);
        assert_eq!(DifficultyTier::from_repr(3), Some(DifficultyTier::Three));
        assert_eq!(DifficultyTier::from_repr(0), None);
    }
}
