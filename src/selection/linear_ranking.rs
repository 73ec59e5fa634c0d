use crate::error::{GeneticError, Result};
use crate::population::{IndividualId, Population};
use crate::rng::OperatorRng;
use crate::selection::selection_strategy::{rank_worst_first, Parents, SelectionStrategy};

/// A selection strategy that selects parents based on their fitness rank.
///
/// Individuals are ranked from worst to best and given selection weights
/// interpolated linearly from `pmin` (worst) to `pmax` (best). Only the order
/// of fitness values matters, so a few outliers cannot take over the wheel.
///
/// # Examples
///
/// ```
/// use genbit::individual::{Individual, ValueRange};
/// use genbit::population::Population;
/// use genbit::selection::{LinearRankingSelection, SelectionStrategy};
///
/// let individuals = (0..4)
///     .map(|_| Individual::random_broadcast(1, ValueRange::new(0.0, 1.0), 0.01).unwrap())
///     .collect();
/// let population = Population::new(individuals, |i: &Individual| i.solution()[0]).unwrap();
///
/// let selection = LinearRankingSelection::new(0.1, 0.9).unwrap();
/// assert!(selection.select(&population).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct LinearRankingSelection {
    pmin: f64,
    pmax: f64,
    rng: OperatorRng,
}

impl LinearRankingSelection {
    /// Creates a linear ranking selection with the weights of the worst and
    /// best individuals.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::InvalidConfiguration`] unless
    /// `0 <= pmin <= pmax` and `pmax > 0`.
    pub fn new(pmin: f64, pmax: f64) -> Result<Self> {
        Self::build(pmin, pmax, None)
    }

    /// Like [`LinearRankingSelection::new`], reseeding from `seed` on every call.
    pub fn with_seed(pmin: f64, pmax: f64, seed: u64) -> Result<Self> {
        Self::build(pmin, pmax, Some(seed))
    }

    fn build(pmin: f64, pmax: f64, seed: Option<u64>) -> Result<Self> {
        if !(pmin >= 0.0 && pmin <= pmax && pmax > 0.0 && pmax.is_finite()) {
            return Err(GeneticError::InvalidConfiguration(format!(
                "Linear ranking needs 0 <= pmin <= pmax and pmax > 0, got pmin={} pmax={}",
                pmin, pmax
            )));
        }

        Ok(Self {
            pmin,
            pmax,
            rng: OperatorRng::new(seed),
        })
    }

    pub fn pmin(&self) -> f64 {
        self.pmin
    }

    pub fn pmax(&self) -> f64 {
        self.pmax
    }

    /// Cumulative rank weights, worst rank first.
    fn wheel(&self, size: usize) -> Vec<f64> {
        if size == 1 {
            return vec![self.pmax];
        }

        let step = (self.pmax - self.pmin) / (size - 1) as f64;
        (0..size)
            .scan(0.0, |accum, rank| {
                *accum += self.pmin + step * rank as f64;
                Some(*accum)
            })
            .collect()
    }
}

impl Default for LinearRankingSelection {
    fn default() -> Self {
        Self {
            pmin: 0.1,
            pmax: 0.9,
            rng: OperatorRng::new(None),
        }
    }
}

impl SelectionStrategy for LinearRankingSelection {
    fn select(&self, population: &Population) -> Result<Parents> {
        let ranked = rank_worst_first(population, "Linear ranking")?;
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
