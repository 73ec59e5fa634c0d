use std::fmt::Debug;

use crate::error::Result;
use crate::individual::Individual;
use crate::population::Population;

/// Trait for mutation strategies in genetic algorithms.
///
/// A mutation strategy perturbs one individual's chromosome in place and
/// leaves its decoded solution consistent with the result.
pub trait MutationStrategy: Debug + Send + Sync {
    fn mutate(&self, individual: &mut Individual) -> Result<()>;

    /// Mutates a child bred from `population`.
    ///
    /// The engine calls this instead of [`MutationStrategy::mutate`] so that
    /// adaptive strategies can look at the parent generation. Defaults to `mutate`.
    fn mutate_within(&self, individual: &mut Individual, _population: &Population) -> Result<()> {
        self.mutate(individual)
    }
}
