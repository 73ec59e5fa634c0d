//! # On-the-fly analysis
//!
//! A [`GenerationObserver`] is handed the population before the first
//! generation of a run, after every `interval()`-th installed generation and
//! once more after the last one. Two stock observers ship with the crate:
//! [`FitnessStore`] records the best solution and fitness of every registered
//! generation, and [`ConsoleOutput`] reports progress through `tracing`.
//!
//! ```rust
//! use genbit::evolution::analysis::{FitnessStore, GenerationObserver};
//!
//! let store = FitnessStore::with_interval(5);
//! assert_eq!(store.interval(), 5);
//! assert!(store.records().is_empty());
//! ```

use tracing::info;

use crate::population::Population;

/// Hooks the engine calls around and during a run.
pub trait GenerationObserver: Send {
    /// Observe every `interval`-th generation, counting from 0. Treated as 1 if 0.
    fn interval(&self) -> usize {
        1
    }

    /// Whether only the leader process observes a distributed run.
    fn leader_only(&self) -> bool {
        true
    }

    fn setup(&mut self, _num_generations: usize, _population: &Population) {}

    fn register_step(&mut self, generation: usize, population: &Population);

    fn finalize(&mut self, _population: &Population) {}
}

/// The best individual of one registered generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    pub generation: usize,
    pub solution: Vec<f64>,
    pub fitness: f64,
}

/// Records the best solution and fitness per registered generation.
#[derive(Debug, Clone)]
pub struct FitnessStore {
    interval: usize,
    records: Vec<GenerationRecord>,
}

impl FitnessStore {
    pub fn new() -> Self {
        Self::with_interval(1)
    }

    pub fn with_interval(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Best fitness of each registered generation, in order.
    pub fn fitness_values(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.fitness).collect()
    }

    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }
}

impl Default for FitnessStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationObserver for FitnessStore {
    fn interval(&self) -> usize {
        self.interval
    }

    fn setup(&mut self, num_generations: usize, _population: &Population) {
        self.records.clear();
        self.records.reserve(num_generations / self.interval + 1);
    }

    fn register_step(&mut self, generation: usize, population: &Population) {
        self.records.push(GenerationRecord {
            generation,
            solution: population.best().solution().to_vec(),
            fitness: population.best_fitness(),
        });
    }

    fn finalize(&mut self, _population: &Population) {
        if let Some(last) = self.records.last() {
            info!(
                generations = self.records.len(),
                best_fitness = last.fitness,
                "fitness store finalized"
            );
        }
    }
}

/// Reports the progress of a run through `tracing` at info level.
#[derive(Debug, Clone)]
pub struct ConsoleOutput {
    interval: usize,
    num_generations: usize,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self::with_interval(1)
    }

    pub fn with_interval(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            num_generations: 0,
        }
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationObserver for ConsoleOutput {
    fn interval(&self) -> usize {
        self.interval
    }

    fn setup(&mut self, num_generations: usize, population: &Population) {
        self.num_generations = num_generations;
        info!(
            generations = num_generations,
            population_size = population.len(),
            "evolution started"
        );
    }

    fn register_step(&mut self, generation: usize, population: &Population) {
        info!(
            generation = generation + 1,
            total = self.num_generations,
            best_fitness = population.best_fitness(),
            "generation evolved"
        );
    }

    fn finalize(&mut self, population: &Population) {
        info!(
            best_solution = ?population.best().solution(),
            best_fitness = population.best_fitness(),
            "optimal solution found"
        );
    }
}
