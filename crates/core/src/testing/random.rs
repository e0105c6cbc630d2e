//! Deterministic random sources.

use crate::metadata::RandomSource;

/// Returns the same draw forever.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Cycles through a list of draws.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    draws: Vec<f64>,
    next: usize,
}

impl SequenceRandom {
    /// `draws` must not be empty.
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "SequenceRandom needs at least one draw");
        Self { draws, next: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        let draw = self.draws[self.next % self.draws.len()];
        self.next += 1;
        draw
    }
}
