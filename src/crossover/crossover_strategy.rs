use std::fmt::Debug;

use crate::error::Result;
use crate::individual::Individual;

/// Trait for crossover strategies in genetic algorithms.
///
/// A crossover strategy produces two children from two parents. The parents
/// are only read. Children are returned as new individuals whose chromosomes
/// may have been rewritten; their decoded solutions are not refreshed, so
/// callers that read `solution()` before mutation must call
/// [`Individual::refresh_solution`] first.
pub trait CrossoverStrategy: Debug + Send + Sync {
    /// Crosses `father` and `mother` into two children.
    ///
    /// # Errors
    ///
    /// Returns an error if the parents' chromosomes differ in length.
    fn cross(&self, father: &Individual, mother: &Individual) -> Result<(Individual, Individual)>;
}
