//! # Error Types
//!
//! This module defines the error type shared by every part of the engine:
//! chromosome construction, population bookkeeping, the genetic operators and
//! the process-group merge step.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genbit::error::{GeneticError, Result};
//!
//! fn checked_precision(precision: f64) -> Result<f64> {
//!     if precision <= 0.0 {
//!         return Err(GeneticError::InvalidConfiguration(
//!             "precision must be positive".to_string(),
//!         ));
//!     }
//!     Ok(precision)
//! }
//!
//! assert!(checked_precision(0.1).is_ok());
//! assert!(checked_precision(0.0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genbit::error::{GeneticError, OptionExt};
//!
//! fn first_score(scores: &[f64]) -> genbit::error::Result<f64> {
//!     scores.first().copied().ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert!(first_score(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur in the genetic algorithm engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneticError {
    /// A range, precision, probability or option value cannot be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Two collections that must agree in length do not.
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A chromosome bit index past the end of the chromosome.
    #[error("Index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A solution component lies outside of its value range.
    #[error("Bounds error: {0}")]
    OutOfBounds(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a fitness calculation yields an unusable value.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// The process group failed to merge partial results.
    #[error("Distributed error: {0}")]
    Distributed(String),

    /// Error that occurs when an evolution process fails.
    #[error("Evolution error: {0}")]
    Evolution(String),
}

/// A specialized Result type for genetic algorithm operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

/// Checks that two lengths agree, naming the collection on failure.
pub(crate) fn ensure_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(GeneticError::DimensionMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Checks that a probability lies in `[0, 1]`.
pub(crate) fn ensure_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GeneticError::InvalidConfiguration(format!(
            "{} must lie in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}
