use crate::error::{ensure_probability, GeneticError, Result};
use crate::individual::Individual;
use crate::mutation::mutation_strategy::MutationStrategy;
use crate::rng::OperatorRng;

/// Flip-bit mutation with a two-stage gate.
///
/// A first draw below `pm` admits the individual to mutation at all. Only then
/// is every chromosome bit flipped independently with probability `pm`, so the
/// effective per-bit rate over many individuals is `pm * pm`.
#[derive(Debug, Clone)]
pub struct FlipBitMutation {
    pm: f64,
    rng: OperatorRng,
}

impl FlipBitMutation {
    /// # Errors
    ///
    /// Returns an error unless `pm` lies in `[0, 1]`.
    pub fn new(pm: f64) -> Result<Self> {
        Self::build(pm, None)
    }

    /// Like [`FlipBitMutation::new`], reseeding from `seed` on every call.
    pub fn with_seed(pm: f64, seed: u64) -> Result<Self> {
        Self::build(pm, Some(seed))
    }

    fn build(pm: f64, seed: Option<u64>) -> Result<Self> {
        ensure_probability("mutation probability", pm)?;
        Ok(Self {
            pm,
            rng: OperatorRng::new(seed),
        })
    }

    pub fn pm(&self) -> f64 {
        self.pm
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    /// Runs the two-stage gate with `rate` in place of `pm`.
    pub(crate) fn mutate_with_rate(&self, individual: &mut Individual, rate: f64) -> Result<()> {
        self.rng.with(|rng| {
            if rng.uniform() < rate {
                for i in 0..individual.chromosome().len() {
                    if rng.uniform() < rate {
                        individual.flip_bit(i)?;
                    }
                }
            }
            Ok::<(), GeneticError>(())
        })?;

        individual.refresh_solution();
        Ok(())
    }
}

impl MutationStrategy for FlipBitMutation {
    fn mutate(&self, individual: &mut Individual) -> Result<()> {
        self.mutate_with_rate(individual, self.pm)
    }
}
