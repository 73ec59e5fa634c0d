use crate::crossover::crossover_strategy::CrossoverStrategy;
use crate::error::{ensure_len, ensure_probability, Result};
use crate::individual::Individual;
use crate::rng::OperatorRng;

/// Uniform crossover over whole chromosomes.
///
/// One draw decides whether the pair crosses at all: a draw at or above `pc`
/// returns plain copies of the parents. Otherwise every bit position at which
/// the parents differ is flipped in both children.
///
/// The gene exchange probability `pe` is accepted and reported but does not
/// gate individual positions.
#[derive(Debug, Clone)]
pub struct UniformCrossover {
    pc: f64,
    pe: f64,
    rng: OperatorRng,
}

impl UniformCrossover {
    /// Creates a uniform crossover with crossover probability `pc` and gene
    /// exchange probability `pe`.
    ///
    /// # Errors
    ///
    /// Returns an error unless both probabilities lie in `[0, 1]`.
    pub fn new(pc: f64, pe: f64) -> Result<Self> {
        Self::build(pc, pe, None)
    }

    /// Like [`UniformCrossover::new`], reseeding from `seed` on every call.
    pub fn with_seed(pc: f64, pe: f64, seed: u64) -> Result<Self> {
        Self::build(pc, pe, Some(seed))
    }

    fn build(pc: f64, pe: f64, seed: Option<u64>) -> Result<Self> {
        ensure_probability("crossover probability", pc)?;
        ensure_probability("gene exchange probability", pe)?;
        Ok(Self {
            pc,
            pe,
            rng: OperatorRng::new(seed),
        })
    }

    pub fn pc(&self) -> f64 {
        self.pc
    }

    pub fn pe(&self) -> f64 {
        self.pe
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }
}

impl CrossoverStrategy for UniformCrossover {
    fn cross(&self, father: &Individual, mother: &Individual) -> Result<(Individual, Individual)> {
        ensure_len(
            "mother chromosome",
            father.chromosome().len(),
            mother.chromosome().len(),
        )?;

        let mut first = father.clone();
        let mut second = mother.clone();

        let draw = self.rng.with(|rng| rng.uniform());
        if draw >= self.pc {
            return Ok((first, second));
        }

        let differing = father
            .chromosome()
            .iter()
            .zip(mother.chromosome())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i);
        for i in differing {
            first.flip_bit(i)?;
            second.flip_bit(i)?;
        }

        Ok((first, second))
    }
}
