//! Random source for the computer's reply.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::instrument;

/// Chooses one of `len` equally valid candidates.
pub trait CandidatePicker: Send {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform choice backed by ChaCha8.
#[derive(Debug, Clone)]
pub struct RandomPicker {
    rng: ChaCha8Rng,
}

impl RandomPicker {
    /// Seeds from OS entropy.
    #[instrument]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic sequence for a given seed.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl CandidatePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always picks the same index, clamped to the last candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker(pub usize);

impl CandidatePicker for FixedPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_picker_is_reproducible() {
        let mut a = RandomPicker::seeded(42);
        let mut b = RandomPicker::seeded(42);
        let picks_a: Vec<_> = (0..20).map(|_| a.pick(7)).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.pick(7)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&i| i < 7));
    }

    #[test]
    fn test_fixed_picker_clamps() {
        let mut picker = FixedPicker(5);
        assert_eq!(picker.pick(3), 2);
        assert_eq!(picker.pick(10), 5);
    }
}
