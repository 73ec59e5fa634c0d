use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::individual::Individual;
use crate::population::{IndividualId, Population};

/// The pair of slots chosen to breed. Father and mother may be the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Parents {
    pub father: IndividualId,
    pub mother: IndividualId,
}

impl Parents {
    pub fn new(father: IndividualId, mother: IndividualId) -> Self {
        Self { father, mother }
    }

    /// Resolves both handles against the population they were selected from.
    pub fn resolve<'p>(&self, population: &'p Population) -> (&'p Individual, &'p Individual) {
        (population.get(self.father), population.get(self.mother))
    }
}

/// Trait for selection strategies in genetic algorithms.
///
/// A selection strategy picks two parents from the current population based on
/// fitness. Implementations only read the population; the engine calls
/// `select` from many worker threads at once while a generation is bred.
///
/// # Examples
///
/// ```
/// use genbit::individual::{Individual, ValueRange};
/// use genbit::population::Population;
/// use genbit::selection::{RouletteWheelSelection, SelectionStrategy};
///
/// let range = ValueRange::new(0.0, 1.0);
/// let individuals = vec![
///     Individual::broadcast(&[0.25], range, 0.125).unwrap(),
///     Individual::broadcast(&[0.75], range, 0.125).unwrap(),
/// ];
/// let population = Population::new(individuals, |i: &Individual| i.solution()[0]).unwrap();
///
/// let selection = RouletteWheelSelection::with_seed(1);
/// let parents = selection.select(&population).unwrap();
/// let (father, mother) = parents.resolve(&population);
/// assert_eq!(father.dimension(), mother.dimension());
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects a father and a mother from `population`.
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy cannot build its selection weights,
    /// for instance when a fitness value is not finite.
    fn select(&self, population: &Population) -> Result<Parents>;
}

/// Slot indices ordered from worst to best fitness. Equal scores keep slot order.
///
/// `strategy` names the caller in the error raised for a non-finite score.
pub(crate) fn rank_worst_first(population: &Population, strategy: &str) -> Result<Vec<usize>> {
    let scores = population.fitness_values();
    if let Some(score) = scores.iter().find(|score| !score.is_finite()) {
        return Err(GeneticError::FitnessCalculation(format!(
            "{} selection requires finite fitness values, got {}",
            strategy, score
        )));
    }

    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    ranked.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
    Ok(ranked)
}
