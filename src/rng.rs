// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Design
//!
//! Barrier pricing needs random numbers that are:
//! 1. **Reproducible**: same seed → same paths, bit for bit
//! 2. **Partitioned**: every path draws from its own stream, so workers never share a generator
//! 3. **Thread-count independent**: the result does not depend on how rayon splits the work
//!
//! # Sub-streams
//!
//! A [`RngFactory`] owns one 64-bit base seed. Path `i` gets a `StdRng` seeded with a
//! splitmix64 mix of `(base_seed, i)`:
//! ```text
//! z = base_seed ⊕ splitmix64(path_id)
//! seed = splitmix64(z)
//! ```
//! Mixing the path index before combining keeps runs with adjacent base seeds from
//! sharing streams (`seed + i` would make seed 42 / path 1 equal seed 43 / path 0).
//!
//! # Unseeded runs
//!
//! [`RngFactory::from_entropy`] draws the base seed from the process-level thread RNG.
//! Two unseeded runs are expected to differ. The drawn seed is kept in the factory so
//! the run can be replayed with [`RngFactory::new`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// splitmix64 finaliser
#[inline]
pub fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Factory handing out one independent generator per simulated path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Factory seeded from the process-level default random source
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Seeded factory when `seed` is given, entropy-seeded otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Seed of the sub-stream owned by `path_id`
    pub fn stream_seed(&self, path_id: u64) -> u64 {
        splitmix64(self.base_seed ^ splitmix64(path_id))
    }

    /// Generator for a specific path
    pub fn path_rng(&self, path_id: u64) -> StdRng {
        StdRng::seed_from_u64(self.stream_seed(path_id))
    }
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}
