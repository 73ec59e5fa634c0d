use crate::error::{GeneticError, Result};
use crate::population::{IndividualId, Population};
use crate::rng::{OperatorRng, RandomNumberGenerator};
use crate::selection::selection_strategy::{Parents, SelectionStrategy};

/// A selection strategy that selects parents through tournament selection.
///
/// Each parent is the fittest of `tournament_size` distinct individuals drawn
/// at random. Father and mother come from two independent tournaments, so
/// they may be the same individual.
///
/// Tournament selection provides a balance between exploration and exploitation:
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
///
/// # Examples
///
/// ```
/// use genbit::individual::{Individual, ValueRange};
/// use genbit::population::Population;
/// use genbit::selection::{SelectionStrategy, TournamentSelection};
///
/// let individuals = (0..6)
///     .map(|_| Individual::random_broadcast(1, ValueRange::new(0.0, 1.0), 0.01).unwrap())
///     .collect();
/// let population = Population::new(individuals, |i: &Individual| i.solution()[0]).unwrap();
///
/// let selection = TournamentSelection::new(3).unwrap();
/// assert!(selection.select(&population).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
    rng: OperatorRng,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy with the specified tournament size.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        Self::build(tournament_size, None)
    }

    /// Like [`TournamentSelection::new`], reseeding from `seed` on every call.
    pub fn with_seed(tournament_size: usize, seed: u64) -> Result<Self> {
        Self::build(tournament_size, Some(seed))
    }

    fn build(tournament_size: usize, seed: Option<u64>) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::InvalidConfiguration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            tournament_size,
            rng: OperatorRng::new(seed),
        })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    /// Runs one tournament and returns its winner. Ties go to the competitor
    /// drawn first.
    fn compete(&self, population: &Population, rng: &mut RandomNumberGenerator) -> IndividualId {
        let scores = population.fitness_values();
        let competitors = rng.sample_indices(population.len(), self.tournament_size);

        let mut winner = competitors[0];
        for &candidate in &competitors[1..] {
            if scores[candidate] > scores[winner] {
                winner = candidate;
            }
        }
        IndividualId::new(winner)
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self {
            tournament_size: 2,
            rng: OperatorRng::new(None),
        }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(&self, population: &Population) -> Result<Parents> {
        if self.tournament_size >= population.len() {
            return Err(GeneticError::InvalidConfiguration(format!(
                "Tournament size ({}) must be smaller than the population size ({})",
                self.tournament_size,
                population.len()
            )));
        }

        Ok(self.rng.with(|rng| {
            let father = self.compete(population, rng);
            let mother = self.compete(population, rng);
            Parents::new(father, mother)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::{Individual, ValueRange};

    fn population(size: usize) -> Population {
        let range = ValueRange::new(0.0, 8.0);
        let individuals = (1..=size)
            .map(|i| Individual::broadcast(&[i as f64], range, 1.0).unwrap())
            .collect();
        Population::new(individuals, |indv: &Individual| indv.solution()[0]).unwrap()
    }

    #[test]
    fn test_zero_tournament_size_is_rejected() {
        assert!(matches!(
            TournamentSelection::new(0),
            Err(GeneticError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_tournament_larger_than_population_is_rejected() {
        let selection = TournamentSelection::new(4).unwrap();
        assert!(matches!(
            selection.select(&population(4)),
            Err(GeneticError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_worst_individual_never_wins_a_real_tournament() {
        let population = population(6);
        let selection = TournamentSelection::new(2).unwrap();
        for _ in 0..200 {
            let parents = selection.select(&population).unwrap();
            assert_ne!(parents.father, IndividualId::new(0));
            assert_ne!(parents.mother, IndividualId::new(0));
        }
    }

    #[test]
    fn test_near_full_tournament_favours_the_best() {
        let population = population(6);
        let selection = TournamentSelection::new(5).unwrap();
        for _ in 0..50 {
            let parents = selection.select(&population).unwrap();
            // The best individual can only be left out of one slot in six.
            let father = population.fitness_of(parents.father);
            assert!(father >= 5.0);
        }
    }

    #[test]
    fn test_seeded_tournament_repeats() {
        let population = population(8);
        let selection = TournamentSelection::with_seed(3, 9).unwrap();
        let first = selection.select(&population).unwrap();
        assert_eq!(selection.select(&population).unwrap(), first);
        assert_eq!(selection.seed(), Some(9));
        assert_eq!(selection.tournament_size(), 3);
    }
}
