use crate::error::{GeneticError, Result};
use crate::population::{IndividualId, Population};
use crate::rng::OperatorRng;
use crate::selection::selection_strategy::{Parents, SelectionStrategy};

/// A selection strategy that selects parents through roulette wheel selection.
///
/// Each individual owns a slice of the wheel as wide as its fitness minus the
/// population's worst fitness, so negative fitness values need no special
/// treatment. Two independent spins pick the father and the mother; the same
/// individual may win both.
///
/// When every individual has the same fitness, every slice is empty and both
/// spins land on the first individual.
#[derive(Debug, Clone)]
pub struct RouletteWheelSelection {
    rng: OperatorRng,
}

impl RouletteWheelSelection {
    /// Creates a roulette wheel drawing from per-thread entropy-seeded generators.
    pub fn new() -> Self {
        Self {
            rng: OperatorRng::new(None),
        }
    }

    /// Creates a roulette wheel that reseeds from `seed` on every call.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: OperatorRng::new(Some(seed)),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    /// Builds the cumulative wheel over the population's fitness values.
    ///
    /// # Errors
    ///
    /// Returns an error if any fitness value is not finite.
    fn build_wheel(&self, population: &Population) -> Result<Vec<f64>> {
        let scores = population.fitness_values();
        if let Some(score) = scores.iter().find(|score| !score.is_finite()) {
            return Err(GeneticError::FitnessCalculation(format!(
                "Roulette wheel selection requires finite fitness values, got {}",
                score
            )));
        }

        let min_fitness = population.worst_fitness();
        Ok(scores
            .iter()
            .scan(0.0, |accum, &score| {
                *accum += score - min_fitness;
                Some(*accum)
            })
            .collect())
    }

    /// The first slot whose cumulative weight exceeds `draw`, wrapping a draw
    /// equal to the total back to the first slot.
    fn spin(wheel: &[f64], draw: f64) -> usize {
        wheel.partition_point(|&weight| weight <= draw) % wheel.len()
    }
}

impl Default for RouletteWheelSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStrategy for RouletteWheelSelection {
    fn select(&self, population: &Population) -> Result<Parents> {
        let wheel = self.build_wheel(population)?;
        let total = wheel.last().copied().unwrap_or(0.0);

        let (father, mother) = self.rng.with(|rng| {
            let father = Self::spin(&wheel, rng.uniform_in(0.0, total));
            let mother = Self::spin(&wheel, rng.uniform_in(0.0, total));
            (father, mother)
        });

        Ok(Parents::new(IndividualId::new(father), IndividualId::new(mother)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::Fitness;
    use crate::individual::{Individual, ValueRange};

    fn product(indv: &Individual) -> f64 {
        indv.solution()[0] * indv.solution()[1]
    }

    fn population() -> Population {
        let ranges = [ValueRange::new(0.0, 1.0), ValueRange::new(1.0, 2.0)];
        let precisions = [0.125, 0.25];
        let individuals = vec![
            Individual::new(&[1.0, 1.75], &ranges, &precisions).unwrap(),
            Individual::new(&[0.875, 1.5], &ranges, &precisions).unwrap(),
            Individual::new(&[0.5, 2.0], &ranges, &precisions).unwrap(),
        ];
        Population::new(individuals, product).unwrap()
    }

    #[test]
    fn test_wheel_is_shifted_by_worst_fitness() {
        let selection = RouletteWheelSelection::new();
        let wheel = selection.build_wheel(&population()).unwrap();
        assert_eq!(wheel, vec![0.75, 1.0625, 1.0625]);
    }

    #[test]
    fn test_spin_upper_bound() {
        let wheel = [0.75, 1.0625, 1.0625];
        assert_eq!(RouletteWheelSelection::spin(&wheel, 0.0), 0);
        assert_eq!(RouletteWheelSelection::spin(&wheel, 0.75), 1);
        assert_eq!(RouletteWheelSelection::spin(&wheel, 1.0), 1);
        // A draw equal to the total wraps around.
        assert_eq!(RouletteWheelSelection::spin(&wheel, 1.0625), 0);
    }

    #[test]
    fn test_worst_individual_is_never_selected() {
        let population = population();
        let selection = RouletteWheelSelection::new();
        for _ in 0..200 {
            let parents = selection.select(&population).unwrap();
            assert_ne!(parents.father, IndividualId::new(2));
            assert_ne!(parents.mother, IndividualId::new(2));
        }
    }

    #[test]
    fn test_seeded_selection_repeats() {
        let population = population();
        let selection = RouletteWheelSelection::with_seed(0);
        let first = selection.select(&population).unwrap();
        let second = selection.select(&population).unwrap();
        assert_eq!(first, second);
        assert_eq!(selection.seed(), Some(0));
    }

    #[test]
    fn test_uniform_fitness_lands_on_first_slot() {
        let range = ValueRange::new(0.0, 1.0);
        let individuals = (0..4)
            .map(|_| Individual::random_broadcast(1, range, 0.125).unwrap())
            .collect();
        let population = Population::new(individuals, |_: &Individual| 3.0).unwrap();

        let selection = RouletteWheelSelection::new();
        for _ in 0..20 {
            let parents = selection.select(&population).unwrap();
            assert_eq!(parents, Parents::new(IndividualId::new(0), IndividualId::new(0)));
        }
    }

    #[test]
    fn test_negative_fitness_is_accepted() {
        let population = population();
        let negated = Population::with_fitness(population.individuals().to_vec(), {
            let inner = population.fitness_function().clone();
            std::sync::Arc::new(move |indv: &Individual| -inner.score(indv) - 10.0)
        })
        .unwrap();

        let wheel = RouletteWheelSelection::new().build_wheel(&negated).unwrap();
        assert!(wheel.iter().all(|w| *w >= 0.0));
        assert!(RouletteWheelSelection::new().select(&negated).is_ok());
    }

    #[test]
    fn test_non_finite_fitness_is_rejected() {
        let individuals = population().individuals().to_vec();
        let population = Population::new(individuals, |indv: &Individual| {
            if indv.solution()[0] < 0.6 {
                f64::NAN
            } else {
                1.0
            }
        })
        .unwrap();

        assert!(matches!(
            RouletteWheelSelection::new().select(&population),
            Err(GeneticError::FitnessCalculation(_))
        ));
    }
}
