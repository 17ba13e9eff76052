//! Traffic density sampling
//!
//! Each intersection refreshes its density readings at the top of every
//! signal cycle. Readings are independent uniform draws, not a stateful
//! traffic process.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::DENSITY_MAX;

/// Produces pseudo-random density readings for the two approaches
///
/// Holds its own RNG so each intersection samples without contending on a
/// shared source. Seeded construction gives reproducible runs.
#[derive(Debug)]
pub struct TrafficSampler {
    rng: Option<StdRng>,
}

impl TrafficSampler {
    /// Create a sampler backed by the thread-local RNG
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// Create a deterministic sampler from a seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw a fresh (north-south, east-west) density pair
    ///
    /// Each value is uniform in 0..=10 and independent of every other
    /// draw, including the other half of the same pair.
    pub fn sample(&mut self) -> (u8, u8) {
        match &mut self.rng {
            Some(rng) => (
                rng.random_range(0..=DENSITY_MAX),
                rng.random_range(0..=DENSITY_MAX),
            ),
            None => {
                let mut rng = rand::rng();
                (
                    rng.random_range(0..=DENSITY_MAX),
                    rng.random_range(0..=DENSITY_MAX),
                )
            }
        }
    }
}

impl Default for TrafficSampler {
    fn default() -> Self {
        Self::new()
    }
}
