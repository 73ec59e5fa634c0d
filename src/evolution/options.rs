//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the run-level settings of an [`Engine`](super::Engine):
//! how many generations [`Engine::evolve`](super::Engine::evolve) runs, how much it logs
//! and from how many breeding pairs on the pair loop is handed to rayon.
//!
//! ## Example
//!
//! ```rust
//! use genbit::evolution::options::{EvolutionOptions, LogLevel};
//!
//! // Create a new EvolutionOptions instance with custom parameters
//! let custom_options = EvolutionOptions::new(200, LogLevel::Verbose);
//! assert_eq!(custom_options.num_generations(), 200);
//!
//! // Create a new EvolutionOptions instance with default parameters
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.parallel_threshold(), 64);
//! ```
//!
//! ## LogLevel
//!
//! - `Verbose`: one `info` event per generation plus `debug` events with the
//!   best fitness and solution.
//! - `Minimal`: one `info` event per generation.
//! - `None`: no per-generation events.

use crate::error::{GeneticError, Result};

const DEFAULT_NUM_GENERATIONS: usize = 100;
const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Verbose,
    Minimal,
    #[default]
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionOptions {
    num_generations: usize,
    log_level: LogLevel,
    /// Minimum number of breeding pairs to process in parallel
    parallel_threshold: usize,
}

impl EvolutionOptions {
    pub fn new(num_generations: usize, log_level: LogLevel) -> Self {
        Self {
            num_generations,
            log_level,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Creates a new `EvolutionOptions` instance with all parameters specified.
    ///
    /// # Arguments
    ///
    /// * `num_generations` - The number of generations `Engine::evolve` runs.
    /// * `log_level` - The logging level for the run.
    /// * `parallel_threshold` - The minimum number of breeding pairs handed to rayon.
    pub fn new_with_threshold(
        num_generations: usize,
        log_level: LogLevel,
        parallel_threshold: usize,
    ) -> Self {
        Self {
            num_generations,
            log_level,
            parallel_threshold,
        }
    }

    pub fn num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Returns the minimum number of breeding pairs to process in parallel.
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Rejects settings the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::InvalidConfiguration`] for a zero parallel threshold.
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(GeneticError::InvalidConfiguration(
                "parallel threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use genbit::evolution::options::{EvolutionOptions, LogLevel};
    ///
    /// let options = EvolutionOptions::builder()
    ///     .num_generations(200)
    ///     .log_level(LogLevel::Minimal)
    ///     .parallel_threshold(16)
    ///     .build();
    /// assert_eq!(options.log_level(), LogLevel::Minimal);
    /// ```
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_GENERATIONS, LogLevel::None)
    }
}

/// Builder for `EvolutionOptions`.
///
/// Unset fields fall back to the `EvolutionOptions::default()` values.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    num_generations: Option<usize>,
    log_level: Option<LogLevel>,
    parallel_threshold: Option<usize>,
}

impl EvolutionOptionsBuilder {
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn build(self) -> EvolutionOptions {
        EvolutionOptions {
            num_generations: self.num_generations.unwrap_or(DEFAULT_NUM_GENERATIONS),
            log_level: self.log_level.unwrap_or_default(),
            parallel_threshold: self.parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}
