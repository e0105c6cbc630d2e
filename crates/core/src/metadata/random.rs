//! Injectable random number source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random numbers in `[0, 1)`.
///
/// The generator only ever asks for unit-interval draws and derives indices
/// and integer ranges from them, so a test double only has to return fixed
/// floats.
pub trait RandomSource: Send {
    /// Returns the next draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let index = (self.next_unit() * len as f64).floor() as usize;
        // Guard against sources that hand back exactly 1.0
        index.min(len.saturating_sub(1))
    }

    /// Uniform integer in `lo..=hi`.
    fn int_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        let span = hi - lo + 1;
        let offset = (self.next_unit() * span as f64).floor() as u64;
        lo + offset.min(span - 1)
    }
}

/// [`RandomSource`] backed by rand's `StdRng`.
#[derive(Debug, Clone)]
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Seeds from operating system entropy.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Deterministic source for reproducible batches.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}
