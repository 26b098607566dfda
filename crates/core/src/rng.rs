//! Injectable random source shared by map generation, encounters and combat.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Every random draw in the core goes through this trait so tests can script outcomes.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform integer in `[min, max]`. Collapses to `min` when the range is empty.
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        let offset = self.next_u64() % span;
        (i64::from(min) + offset as i64) as i32
    }

    /// Uniform roll in `1..=100`.
    fn roll_percent(&mut self) -> u32 {
        1 + (self.next_u64() % 100) as u32
    }

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u64() % len as u64) as usize)
    }
}

/// Seeded ChaCha stream; identical seeds give identical runs.
#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRng {
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}
