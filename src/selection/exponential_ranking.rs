use crate::error::{GeneticError, Result};
use crate::population::{IndividualId, Population};
use crate::rng::OperatorRng;
use crate::selection::selection_strategy::{rank_worst_first, Parents, SelectionStrategy};

/// A selection strategy that weights fitness ranks geometrically.
///
/// With `N` individuals ranked from worst (rank 0) to best (rank `N - 1`),
/// rank `r` gets the weight `base^(N - 1 - r)`: the best individual weighs 1
/// and every step down the ranking multiplies the weight by `base`. A smaller
/// base concentrates selection on the top of the population.
#[derive(Debug, Clone)]
pub struct ExponentialRankingSelection {
    base: f64,
    rng: OperatorRng,
}

impl ExponentialRankingSelection {
    /// # Errors
    ///
    /// Returns [`GeneticError::InvalidConfiguration`] unless `0 < base < 1`.
    pub fn new(base: f64) -> Result<Self> {
        Self::build(base, None)
    }

    /// Like [`ExponentialRankingSelection::new`], reseeding from `seed` on every call.
    pub fn with_seed(base: f64, seed: u64) -> Result<Self> {
        Self::build(base, Some(seed))
    }

    fn build(base: f64, seed: Option<u64>) -> Result<Self> {
        if !(base > 0.0 && base < 1.0) {
            return Err(GeneticError::InvalidConfiguration(format!(
                "Exponential ranking base must lie in (0, 1), got {}",
                base
            )));
        }

        Ok(Self {
            base,
            rng: OperatorRng::new(seed),
        })
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    /// Cumulative rank weights, worst rank first.
    fn wheel(&self, size: usize) -> Vec<f64> {
        (0..size)
            .scan(0.0, |accum, rank| {
                *accum += self.base.powi((size - 1 - rank) as i32);
                Some(*accum)
            })
            .collect()
    }
}

impl Default for ExponentialRankingSelection {
    fn default() -> Self {
        Self {
            base: 0.5,
            rng: OperatorRng::new(None),
        }
    }
}

impl SelectionStrategy for ExponentialRankingSelection {
    fn select(&self, population: &Population) -> Result<Parents> {
        let ranked = rank_worst_first(population, "Exponential ranking")?;
        let wheel = self.wheel(ranked.len());
        let total = wheel.last().copied().unwrap_or(0.0);
        let last = wheel.len() - 1;
        let spin = |draw: f64| ranked[wheel.partition_point(|&w| w <= draw).min(last)];

        let (father, mother) = self.rng.with(|rng| {
            let father = spin(rng.uniform_in(0.0, total));
            let mother = spin(rng.uniform_in(0.0, total));
            (father, mother)
        });

        Ok(Parents::new(IndividualId::new(father), IndividualId::new(mother)))
    }
}
