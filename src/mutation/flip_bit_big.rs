use tracing::warn;

use crate::error::{GeneticError, Result};
use crate::individual::Individual;
use crate::mutation::{flip_bit::FlipBitMutation, mutation_strategy::MutationStrategy};
use crate::population::Population;

/// Flip-bit mutation that switches to a big mutation probability once the
/// population has converged.
///
/// The population counts as converged when `fmax * alpha < fmean`, i.e. when
/// the mean fitness has crept close to the best one. Children bred from such
/// a population mutate with `pbm` instead of `pm`, which pushes the search out
/// of a local optimum. Both rates go through the same two-stage gate as
/// [`FlipBitMutation`].
#[derive(Debug, Clone)]
pub struct FlipBitBigMutation {
    flip: FlipBitMutation,
    pbm: f64,
    alpha: f64,
}

impl FlipBitBigMutation {
    /// Creates the mutation with the ordinary rate `pm`, the big rate `pbm`
    /// and the intensive factor `alpha`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::InvalidConfiguration`] unless `pm` lies in
    /// `[0, 1]`, `pbm` in `(0, 1)` and `alpha` in `(0.5, 1)`.
    pub fn new(pm: f64, pbm: f64, alpha: f64) -> Result<Self> {
        Self::build(FlipBitMutation::new(pm)?, pbm, alpha)
    }

    /// Like [`FlipBitBigMutation::new`], reseeding from `seed` on every call.
    pub fn with_seed(pm: f64, pbm: f64, alpha: f64, seed: u64) -> Result<Self> {
        Self::build(FlipBitMutation::with_seed(pm, seed)?, pbm, alpha)
    }

    fn build(flip: FlipBitMutation, pbm: f64, alpha: f64) -> Result<Self> {
        if !(pbm > 0.0 && pbm < 1.0) {
            return Err(GeneticError::InvalidConfiguration(format!(
                "big mutation probability must lie in (0, 1), got {}",
                pbm
            )));
        }
        if !(alpha > 0.5 && alpha < 1.0) {
            return Err(GeneticError::InvalidConfiguration(format!(
                "intensive factor must lie in (0.5, 1), got {}",
                alpha
            )));
        }
        if pbm < 5.0 * flip.pm() {
            warn!(pm = flip.pm(), pbm, "big mutation probability is less than 5 * pm");
        }

        Ok(Self { flip, pbm, alpha })
    }

    pub fn pm(&self) -> f64 {
        self.flip.pm()
    }

    pub fn pbm(&self) -> f64 {
        self.pbm
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn seed(&self) -> Option<u64> {
        self.flip.seed()
    }

    /// The rate children of `population` mutate with.
    pub fn rate_for(&self, population: &Population) -> f64 {
        if population.best_fitness() * self.alpha < population.mean_fitness() {
            self.pbm
        } else {
            self.flip.pm()
        }
    }
}

impl MutationStrategy for FlipBitBigMutation {
    /// Without a population to judge, mutates with `pm`.
    fn mutate(&self, individual: &mut Individual) -> Result<()> {
        self.flip.mutate_with_rate(individual, self.flip.pm())
    }

    fn mutate_within(&self, individual: &mut Individual, population: &Population) -> Result<()> {
        self.flip.mutate_with_rate(individual, self.rate_for(population))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::ValueRange;
    use crate::test_support::capture_logs;

    fn population(values: &[f64]) -> Population {
        let individuals = values
            .iter()
            .map(|&x| Individual::broadcast(&[x], ValueRange::new(0.0, 4.0), 0.5).unwrap())
            .collect();
        Population::new(individuals, |indv: &Individual| indv.solution()[0]).unwrap()
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(FlipBitBigMutation::new(1.5, 0.5, 0.8).is_err());
        assert!(FlipBitBigMutation::new(0.1, 1.0, 0.8).is_err());
        assert!(FlipBitBigMutation::new(0.1, 0.0, 0.8).is_err());
        assert!(FlipBitBigMutation::new(0.1, 0.6, 0.5).is_err());
        assert!(FlipBitBigMutation::new(0.1, 0.6, 1.0).is_err());
        assert!(FlipBitBigMutation::new(0.1, 0.6, 0.8).is_ok());
    }

    #[test]
    fn test_small_big_rate_warns() {
        let logs = capture_logs(|| {
            FlipBitBigMutation::new(0.2, 0.5, 0.8).unwrap();
        });
        assert!(logs.contains("big mutation probability is less than 5 * pm"));

        let logs = capture_logs(|| {
            FlipBitBigMutation::new(0.05, 0.5, 0.8).unwrap();
        });
        assert!(logs.is_empty());
    }

    #[test]
    fn test_spread_population_keeps_ordinary_rate() {
        // fmax = 4, fmean = 2: 4 * 0.8 = 3.2 is not below the mean.
        let mutation = FlipBitBigMutation::new(0.05, 0.6, 0.8).unwrap();
        assert_eq!(mutation.rate_for(&population(&[0.5, 1.5, 4.0])), 0.05);
    }

    #[test]
    fn test_converged_population_switches_to_big_rate() {
        // fmax = 4, fmean = 3.5: 4 * 0.8 = 3.2 is below the mean.
        let mutation = FlipBitBigMutation::new(0.05, 0.6, 0.8).unwrap();
        assert_eq!(mutation.rate_for(&population(&[3.0, 3.5, 4.0])), 0.6);
    }

    #[test]
    fn test_big_rate_applies_through_the_gate() {
        let converged = population(&[3.0, 3.5, 4.0]);
        let mutation = FlipBitBigMutation::with_seed(0.0, 0.99, 0.8, 7).unwrap();
        let reference = converged.individuals()[0].clone();

        let mut plain = reference.clone();
        mutation.mutate(&mut plain).unwrap();
        assert_eq!(plain, reference);

        let big = FlipBitMutation::with_seed(0.99, 7).unwrap();
        let mut expected = reference.clone();
        big.mutate(&mut expected).unwrap();

        let mut adapted = reference.clone();
        mutation.mutate_within(&mut adapted, &converged).unwrap();
        assert_eq!(adapted, expected);
        assert_eq!(adapted.solution(), adapted.decoded_solution().as_slice());
    }
}
