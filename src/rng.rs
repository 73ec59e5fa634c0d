//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct provides a small interface over the `rand`
//! crate for the draws the engine needs: uniform values, values within a range
//! and index samples.
//!
//! ## Example
//!
//! ```rust
//! use genbit::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let draw = rng.uniform();
//! assert!((0.0..1.0).contains(&draw));
//! ```
//!
//! ## Operator generators
//!
//! Genetic operators do not hold a plain generator. They hold an [`OperatorRng`],
//! which reseeds from a fixed seed on every call when one was supplied, and
//! otherwise hands every worker thread its own entropy-seeded generator:
//!
//! ```rust
//! use genbit::rng::OperatorRng;
//!
//! let seeded = OperatorRng::new(Some(42));
//! let a = seeded.with(|rng| rng.uniform());
//! let b = seeded.with(|rng| rng.uniform());
//! assert_eq!(a, b);
//! ```

use std::cell::RefCell;
use std::fmt;

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};
use thread_local::ThreadLocal;

/// A wrapper around the `rand` crate's `StdRng` that provides methods for generating
/// random numbers within a specified range.
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

    /// Draws a value uniformly from `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws a value uniformly from the closed interval `[low, high]`.
    ///
    /// `low` must not exceed `high`.
    pub fn uniform_in(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..=high)
    }

    /// Samples `amount` distinct indices from `0..length`.
    ///
    /// `amount` must not exceed `length`.
    pub fn sample_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.rng, length, amount).into_vec()
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// The generator owned by a genetic operator.
///
/// With a seed, each call to [`OperatorRng::with`] runs against a generator
/// freshly seeded from it, so repeated calls with identical inputs give
/// identical outputs. Without one, every thread that calls into the operator
/// gets its own generator, seeded once from entropy and advanced from then on.
pub struct OperatorRng {
    seed: Option<u64>,
    local: ThreadLocal<RefCell<RandomNumberGenerator>>,
}

impl OperatorRng {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            local: ThreadLocal::new(),
        }
    }

    /// The seed supplied at construction, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Runs `f` with this operator's generator for the calling thread.
    pub fn with<R>(&self, f: impl FnOnce(&mut RandomNumberGenerator) -> R) -> R {
        match self.seed {
            Some(seed) => f(&mut RandomNumberGenerator::from_seed(seed)),
            None => {
                let cell = self
                    .local
                    .get_or(|| RefCell::new(RandomNumberGenerator::new()));
                let mut rng = cell.borrow_mut();
                f(&mut rng)
            }
        }
    }
}

impl Clone for OperatorRng {
    fn clone(&self) -> Self {
        Self::new(self.seed)
    }
}

impl fmt::Debug for OperatorRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRng")
            .field("seed", &self.seed)
            .finish()
    }
}
