//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single source of randomness of the crate.
//! Every stochastic operation (random cycles, crossover tie-breaking, mutation, the
//! mutation draw in the ecosystem) takes it explicitly, so a generator created with
//! [`RandomNumberGenerator::from_seed`] makes a whole run reproducible.
//!
//! ## Example
//!
//! ```rust
//! use hamilton::rng::RandomNumberGenerator;
//!
//! let mut a = RandomNumberGenerator::from_seed(7);
//! let mut b = RandomNumberGenerator::from_seed(7);
//! assert_eq!(a.gen_index(100), b.gen_index(100));
//! ```

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Resolution of the mutation draw: an integer in `[0, MUTATION_RESOLUTION)` is compared
/// against `probability * MUTATION_RESOLUTION`.
pub const MUTATION_RESOLUTION: u32 = 1_000_000;

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a uniformly drawn index in `[0, upper)`.
    ///
    /// # Panics
    ///
    /// Panics if `upper` is zero.
    pub fn gen_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }

    /// Draws an integer in `[0, 1_000_000)` and reports whether it falls below
    /// `probability * 1_000_000`.
    ///
    /// A probability of `0.0` never succeeds and `1.0` always does.
    pub fn gen_bool_per_million(&mut self, probability: f64) -> bool {
        let draw = self.rng.gen_range(0..MUTATION_RESOLUTION);
        (draw as f64) < probability * MUTATION_RESOLUTION as f64
    }

    /// Shuffles the slice in place.
    pub fn shuffle<T>(&mut self, values: &mut [T]) {
        values.shuffle(&mut self.rng);
    }

    /// Derives an independent generator seeded from this one.
    ///
    /// Reproduction workers each get a fork, created on the driver thread before any
    /// worker starts, so a seeded ecosystem stays deterministic regardless of thread
    /// scheduling.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.rng.gen())
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
