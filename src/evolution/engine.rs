//! # Engine
//!
//! The `Engine` drives a [`Population`] through generations. Each generation
//! it breeds the population pair by pair into a staging buffer (selection,
//! crossover, then mutation of both children), merges the buffer across the
//! process group when there is more than one process, writes the previous
//! best individual into slot 0 and installs the result.
//!
//! Pairs are independent. Pair `k` only writes staging slots `2k` and
//! `2k + 1`, so the pair loop runs on the rayon pool without locks once
//! a process owns at least `parallel_threshold` pairs. With an odd
//! population the last slot carries its current individual forward.
//!
//! ## Example
//!
//! ```rust
//! use genbit::crossover::UniformCrossover;
//! use genbit::evolution::Engine;
//! use genbit::individual::{Individual, ValueRange};
//! use genbit::mutation::FlipBitMutation;
//! use genbit::population::Population;
//! use genbit::selection::RouletteWheelSelection;
//!
//! let template = Individual::broadcast(&[5.0], ValueRange::new(0.0, 10.0), 0.01).unwrap();
//! let mut population =
//!     Population::from_template(&template, 20, |indv: &Individual| indv.solution()[0]).unwrap();
//!
//! let selection = RouletteWheelSelection::new();
//! let crossover = UniformCrossover::new(0.8, 0.5).unwrap();
//! let mutation = FlipBitMutation::new(0.1).unwrap();
//!
//! let mut engine = Engine::new(&mut population, &selection, &crossover, &mutation);
//! let before = engine.population().best_fitness();
//! engine.run(10).unwrap();
//! assert!(engine.population().best_fitness() >= before);
//! ```

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, info_span};

use super::{analysis::GenerationObserver, options::EvolutionOptions, LogLevel};
use crate::{
    crossover::CrossoverStrategy,
    distributed::{runtime, ProcessGroup, SingleProcess, SolutionMatrix},
    error::{GeneticError, Result},
    individual::Individual,
    mutation::MutationStrategy,
    population::Population,
    selection::SelectionStrategy,
};

static SINGLE_PROCESS: SingleProcess = SingleProcess;

/// The best individual at the end of a run, with its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult {
    pub individual: Individual,
    pub score: f64,
}

/// A generational engine bound to one population and one operator of each kind.
pub struct Engine<'a> {
    population: &'a mut Population,
    selection: &'a dyn SelectionStrategy,
    crossover: &'a dyn CrossoverStrategy,
    mutation: &'a dyn MutationStrategy,
    group: &'a dyn ProcessGroup,
    options: EvolutionOptions,
    observers: Vec<&'a mut dyn GenerationObserver>,
    generation: usize,
}

impl<'a> Engine<'a> {
    /// Creates an engine for a single process with default options.
    pub fn new(
        population: &'a mut Population,
        selection: &'a dyn SelectionStrategy,
        crossover: &'a dyn CrossoverStrategy,
        mutation: &'a dyn MutationStrategy,
    ) -> Self {
        Self {
            population,
            selection,
            crossover,
            mutation,
            group: &SINGLE_PROCESS,
            options: EvolutionOptions::default(),
            observers: Vec::new(),
            generation: 0,
        }
    }

    /// Splits every generation across `group`.
    ///
    /// Every process in the group must start from the same population.
    pub fn with_group(mut self, group: &'a dyn ProcessGroup) -> Self {
        self.group = group;
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: &'a mut dyn GenerationObserver) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn population(&self) -> &Population {
        &*self.population
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Number of generations installed so far, across all runs.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Runs `num_generations` generations.
    ///
    /// Observers are set up before the first generation, notified after every
    /// generation their interval selects and finalized after the last one.
    ///
    /// # Errors
    ///
    /// - [`GeneticError::InvalidConfiguration`] for invalid options.
    /// - [`GeneticError::Distributed`] if the group spans several processes
    ///   and the runtime was finalized, or if a merge fails. A failed merge
    ///   aborts the run with the population left at the last installed
    ///   generation.
    /// - Any error raised by the operators. In a multi-process run the rank
    ///   whose operator failed returns that error and every other rank
    ///   returns [`GeneticError::Distributed`].
    pub fn run(&mut self, num_generations: usize) -> Result<()> {
        self.options.validate()?;
        if self.group.process_count() > 1 {
            runtime::ensure_active()?;
        }

        let span = info_span!(
            "evolution",
            rank = self.group.rank(),
            processes = self.group.process_count()
        );
        let _guard = span.enter();

        let observing = self.group.is_leader();
        for observer in self.observers.iter_mut() {
            if observing || !observer.leader_only() {
                observer.setup(num_generations, &*self.population);
            }
        }

        for _ in 0..num_generations {
            self.step()?;
            let generation = self.generation;
            self.generation += 1;

            for observer in self.observers.iter_mut() {
                if (observing || !observer.leader_only())
                    && generation % observer.interval().max(1) == 0
                {
                    observer.register_step(generation, &*self.population);
                }
            }
            self.log_generation(generation);
        }

        for observer in self.observers.iter_mut() {
            if observing || !observer.leader_only() {
                observer.finalize(&*self.population);
            }
        }
        Ok(())
    }

    /// Runs `options.num_generations()` generations and returns the best individual.
    ///
    /// # Errors
    ///
    /// Everything [`Engine::run`] returns, plus
    /// [`GeneticError::FitnessCalculation`] if the best fitness is not finite.
    pub fn evolve(&mut self) -> Result<EvolutionResult> {
        self.run(self.options.num_generations())?;
        self.best()
    }

    /// The current best individual and its fitness.
    pub fn best(&self) -> Result<EvolutionResult> {
        let score = self.population.best_fitness();
        if !score.is_finite() {
            return Err(GeneticError::FitnessCalculation(format!(
                "best individual has a non-finite fitness: {}",
                score
            )));
        }
        Ok(EvolutionResult {
            individual: self.population.best().clone(),
            score,
        })
    }

    /// Breeds, merges and installs one generation.
    fn step(&mut self) -> Result<()> {
        let population: &Population = &*self.population;
        let (selection, crossover, mutation) = (self.selection, self.crossover, self.mutation);

        let elite = population.best().clone();
        let mut staging = population.individuals().to_vec();

        let (start, end) = self.group.partition_range(population.len() / 2);
        let breed = |pair: &mut [Individual]| -> Result<()> {
            let parents = selection.select(population)?;
            let (father, mother) = parents.resolve(population);
            let (mut first, mut second) = crossover.cross(father, mother)?;
            mutation.mutate_within(&mut first, population)?;
            mutation.mutate_within(&mut second, population)?;
            pair[0] = first;
            pair[1] = second;
            Ok(())
        };

        let owned = &mut staging[2 * start..2 * end];
        let bred = if end - start >= self.options.parallel_threshold() {
            owned.par_chunks_mut(2).try_for_each(&breed)
        } else {
            owned.chunks_mut(2).try_for_each(&breed)
        };

        if self.group.process_count() > 1 {
            // Peers that own no pairs, or whose pairs succeeded, still wait in
            // the merge; every rank settles the outcome before anyone leaves.
            let peer_failed = self.group.any_failed(bred.is_err())?;
            bred?;
            if peer_failed {
                return Err(GeneticError::Distributed(format!(
                    "rank {} aborts the generation: a peer failed while breeding",
                    self.group.rank()
                )));
            }
            staging = self.merge(&staging, start, end)?;
        } else {
            bred?;
        }

        staging[0] = elite;
        self.population.replace_all(staging)
    }

    /// Assembles the full generation from every process's owned rows.
    ///
    /// Rows outside this process's pairs stay zero, so the element-wise sum
    /// leaves each row holding exactly its owner's values.
    fn merge(&self, staging: &[Individual], start: usize, end: usize) -> Result<Vec<Individual>> {
        let rows = staging.len();
        let layout = Arc::clone(staging[0].layout());
        let cols = layout.dimension();

        let mut local = SolutionMatrix::zeros(rows, cols);
        for row in 2 * start..2 * end {
            local.row_mut(row).copy_from_slice(staging[row].solution());
        }
        if rows % 2 == 1 && self.group.is_leader() {
            local
                .row_mut(rows - 1)
                .copy_from_slice(staging[rows - 1].solution());
        }

        let mut global = SolutionMatrix::zeros(rows, cols);
        self.group
            .allreduce_sum(local.as_slice(), global.as_mut_slice(), rows, cols)
            .map_err(|err| match err {
                GeneticError::Distributed(_) => err,
                other => GeneticError::Distributed(format!("merge failed: {}", other)),
            })?;

        global
            .iter_rows()
            .map(|row| Individual::with_layout(row, Arc::clone(&layout)))
            .collect()
    }

    fn log_generation(&self, generation: usize) {
        let level = self.options.log_level();
        if level == LogLevel::None {
            return;
        }

        info!(generation, best_fitness = self.population.best_fitness(), "generation installed");
        if level == LogLevel::Verbose {
            debug!(
                generation,
                worst_fitness = self.population.worst_fitness(),
                best_solution = ?self.population.best().solution(),
                "generation detail"
            );
        }
    }
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("selection", &self.selection)
            .field("crossover", &self.crossover)
            .field("mutation", &self.mutation)
            .field("process_count", &self.group.process_count())
            .field("rank", &self.group.rank())
            .field("options", &self.options)
            .field("observers", &self.observers.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
