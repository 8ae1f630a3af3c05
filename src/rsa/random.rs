// Random Source
// Seedable generator shared by prime generation and the Miller-Rabin test

use std::sync::{Mutex, MutexGuard, PoisonError};

use num_bigint::RandBigInt;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::bigint::RsaBigInt;

/// Owned pseudo-random generator.
///
/// Draws go through `&self` and are serialized by an internal lock, so one
/// source can be handed by reference to every consumer, including ones on
/// other threads, without corrupting the generator's sequence.
#[derive(Debug)]
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    /// Deterministic source; the same seed always yields the same draws
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Next uniformly distributed 32-bit word
    pub fn next_u32(&self) -> u32 {
        self.lock().next_u32()
    }

    /// Uniform integer in `[low, high)`
    ///
    /// # Panics
    ///
    /// If `low >= high`.
    pub fn bigint_range(&self, low: &RsaBigInt, high: &RsaBigInt) -> RsaBigInt {
        self.lock().gen_bigint_range(low, high)
    }

    // A panic while holding the lock cannot leave StdRng half-updated
    fn lock(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
