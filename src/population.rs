//! # Population
//!
//! An ordered collection of individuals scored by one fitness function.
//!
//! Fitness values, the best individual and the worst individual are computed
//! lazily by a full scan and cached until the individuals are replaced. The
//! caches live in `OnceLock`s, so a population can be read from many worker
//! threads at once while a generation is being bred.
//!
//! ## Example
//!
//! ```rust
//! use genbit::individual::{Individual, ValueRange};
//! use genbit::population::Population;
//!
//! let ranges = [ValueRange::new(0.0, 1.0), ValueRange::new(1.0, 2.0)];
//! let precisions = [0.125, 0.25];
//! let individuals = vec![
//!     Individual::new(&[1.0, 1.75], &ranges, &precisions).unwrap(),
//!     Individual::new(&[0.5, 2.0], &ranges, &precisions).unwrap(),
//! ];
//!
//! let population = Population::new(individuals, |indv: &Individual| {
//!     indv.solution()[0] * indv.solution()[1]
//! })
//! .unwrap();
//!
//! assert_eq!(population.best().solution(), &[1.0, 1.75]);
//! assert_eq!(population.fitness_values(), &[1.75, 1.0]);
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{ensure_len, GeneticError, Result};
use crate::fitness::Fitness;
use crate::individual::Individual;

/// Stable handle to one population slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndividualId(usize);

impl IndividualId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone)]
pub struct Population {
    individuals: Vec<Individual>,
    fitness: Arc<dyn Fitness>,
    scores: OnceLock<Vec<f64>>,
    mean: OnceLock<f64>,
    best: OnceLock<IndividualId>,
    worst: OnceLock<IndividualId>,
}

impl Population {
    /// Creates a population from explicit individuals.
    ///
    /// # Errors
    ///
    /// - [`GeneticError::EmptyPopulation`] if `individuals` is empty.
    /// - [`GeneticError::DimensionMismatch`] if the individuals do not share
    ///   one chromosome length and dimension.
    pub fn new(individuals: Vec<Individual>, fitness: impl Fitness + 'static) -> Result<Self> {
        Self::with_fitness(individuals, Arc::new(fitness))
    }

    /// Like [`Population::new`] with an already shared fitness function.
    pub fn with_fitness(individuals: Vec<Individual>, fitness: Arc<dyn Fitness>) -> Result<Self> {
        let first = individuals.first().ok_or(GeneticError::EmptyPopulation)?;
        let (dimension, bits) = (first.dimension(), first.chromosome().len());
        for indv in &individuals[1..] {
            ensure_len("individual dimension", dimension, indv.dimension())?;
            ensure_len("individual chromosome", bits, indv.chromosome().len())?;
        }

        Ok(Self {
            individuals,
            fitness,
            scores: OnceLock::new(),
            mean: OnceLock::new(),
            best: OnceLock::new(),
            worst: OnceLock::new(),
        })
    }

    /// Creates `size` independently random individuals using the template's
    /// ranges and effective precisions.
    pub fn from_template(
        template: &Individual,
        size: usize,
        fitness: impl Fitness + 'static,
    ) -> Result<Self> {
        let individuals = (0..size)
            .map(|_| Individual::random(template.ranges(), template.precisions()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(individuals, fitness)
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Always false for a constructed population.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn ids(&self) -> impl Iterator<Item = IndividualId> {
        (0..self.individuals.len()).map(IndividualId)
    }

    /// # Panics
    ///
    /// Panics if `id` does not address a slot of this population. Handles
    /// from [`Population::ids`], [`Population::best_id`] or a selection
    /// strategy run on this population are always valid.
    pub fn get(&self, id: IndividualId) -> &Individual {
        &self.individuals[id.0]
    }

    /// Like [`Population::get`], for handles of unknown origin.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::IndexOutOfRange`] if `id` is past the last slot.
    pub fn try_get(&self, id: IndividualId) -> Result<&Individual> {
        self.individuals
            .get(id.0)
            .ok_or(GeneticError::IndexOutOfRange {
                index: id.0,
                len: self.individuals.len(),
            })
    }

    pub fn fitness_function(&self) -> &Arc<dyn Fitness> {
        &self.fitness
    }

    /// Scores an arbitrary individual with this population's fitness function.
    pub fn evaluate(&self, individual: &Individual) -> f64 {
        self.fitness.score(individual)
    }

    /// Fitness of every individual, in slot order.
    pub fn fitness_values(&self) -> &[f64] {
        self.scores.get_or_init(|| {
            self.fitness.prepare(&self.individuals);
            self.individuals
                .iter()
                .map(|indv| self.fitness.score(indv))
                .collect()
        })
    }

    /// Arithmetic mean of [`Population::fitness_values`].
    pub fn mean_fitness(&self) -> f64 {
        *self.mean.get_or_init(|| {
            let scores = self.fitness_values();
            scores.iter().sum::<f64>() / scores.len() as f64
        })
    }

    pub fn fitness_of(&self, id: IndividualId) -> f64 {
        self.fitness_values()[id.0]
    }

    /// The first individual with the highest fitness.
    pub fn best_id(&self) -> IndividualId {
        *self
            .best
            .get_or_init(|| scan(self.fitness_values(), |candidate, current| candidate > current))
    }

    /// The first individual with the lowest fitness.
    pub fn worst_id(&self) -> IndividualId {
        *self
            .worst
            .get_or_init(|| scan(self.fitness_values(), |candidate, current| candidate < current))
    }

    pub fn best(&self) -> &Individual {
        self.get(self.best_id())
    }

    pub fn worst(&self) -> &Individual {
        self.get(self.worst_id())
    }

    pub fn best_fitness(&self) -> f64 {
        self.fitness_of(self.best_id())
    }

    pub fn worst_fitness(&self) -> f64 {
        self.fitness_of(self.worst_id())
    }

    /// Overwrites every slot in place and drops all cached scores.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::DimensionMismatch`] if `individuals` does not
    /// have exactly [`Population::len`] entries.
    pub fn replace_all(&mut self, individuals: Vec<Individual>) -> Result<()> {
        ensure_len("replacement individuals", self.individuals.len(), individuals.len())?;
        for (slot, individual) in self.individuals.iter_mut().zip(individuals) {
            *slot = individual;
        }

        self.scores.take();
        self.mean.take();
        self.best.take();
        self.worst.take();
        Ok(())
    }
}

impl fmt::Debug for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Population")
            .field("individuals", &self.individuals)
            .field("scores", &self.scores.get())
            .field("mean", &self.mean.get())
            .field("best", &self.best.get())
            .field("worst", &self.worst.get())
            .finish_non_exhaustive()
    }
}

/// Index of the first score that `prefer` ranks above all others.
/// NaN scores are passed over.
fn scan(scores: &[f64], prefer: impl Fn(f64, f64) -> bool) -> IndividualId {
    let mut chosen = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        let current = scores[chosen];
        if prefer(score, current) || (current.is_nan() && !score.is_nan()) {
            chosen = i;
        }
    }
    IndividualId(chosen)
}
