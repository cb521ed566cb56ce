//! Shared random source for template functions.
//!
//! Every template function draws from one [`RandomSource`]. Access is
//! serialized behind a mutex, so concurrent render calls never observe a
//! torn generator state. Workers that want to avoid lock contention can
//! [`fork`](RandomSource::fork) an independently seeded child.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Random source shared by all functions of a registry.
pub struct RandomSource {
    rng: Mutex<Box<dyn RngCore + Send>>,
    seed: Option<u64>,
}

impl RandomSource {
    /// Create a reproducible source from a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(Box::new(StdRng::seed_from_u64(seed))),
            seed: Some(seed),
        }
    }

    /// Create a source seeded from the wall clock.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::from_seed(nanos)
    }

    /// Wrap an arbitrary generator.
    pub fn from_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
            seed: None,
        }
    }

    /// Seed this source was created from, if known.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Run `f` with exclusive access to the generator.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        let mut rng = self.rng.lock();
        f(&mut **rng)
    }

    /// Create an independent child source seeded from this one.
    pub fn fork(&self) -> Self {
        let seed = self.with_rng(|rng| rng.next_u64());
        Self::from_seed(seed)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_time()
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
