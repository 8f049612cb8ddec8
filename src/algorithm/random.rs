//! Caller-supplied randomness

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Source of uniform values in `[0, 1)`
///
/// The solver never touches a global generator. Reproducible runs use
/// `seeded`; hosts with their own generator wrap it with `from_fn`.
pub struct RandomSource {
    next: Box<dyn FnMut() -> f64>,
}

impl RandomSource {
    /// Deterministic source backed by `StdRng`
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_fn(move || rng.random::<f64>())
    }

    /// Wrap an arbitrary generator
    pub fn from_fn(next: impl FnMut() -> f64 + 'static) -> Self {
        Self {
            next: Box::new(next),
        }
    }

    /// Next value, clamped into `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        let value = (self.next)();
        if value.is_nan() || value < 0.0 {
            0.0
        } else {
            value.min(1.0 - f64::EPSILON)
        }
    }

    /// Uniform index below `bound`; 0 when `bound` is 0
    pub fn below(&mut self, bound: usize) -> usize {
        let scaled = (self.next_f64() * bound as f64) as usize;
        scaled.min(bound.saturating_sub(1))
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}
