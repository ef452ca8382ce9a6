use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of randomness handed to every simulator tick.
///
/// Only `range_inclusive` and `unit` need implementing; tests swap in
/// scripted sources to pin down draws.
pub trait RandomSource {
    /// Uniform integer in `low..=high`.
    fn range_inclusive(&mut self, low: usize, high: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform index into a non-empty slice of length `len`.
    fn index(&mut self, len: usize) -> usize {
        self.range_inclusive(0, len.saturating_sub(1))
    }

    /// Uniform float in `[0, 100)`.
    fn percent(&mut self) -> f64 {
        self.unit() * 100.0
    }

    /// True with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }
}

/// Adapter from any `rand` generator.
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<SmallRng> {
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Fisher-Yates shuffle driven by a `RandomSource`.
pub fn shuffle<T, S: RandomSource + ?Sized>(items: &mut [T], rng: &mut S) {
    for i in (1..items.len()).rev() {
        let j = rng.range_inclusive(0, i);
        items.swap(i, j);
    }
}
