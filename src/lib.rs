//! # genbit
//!
//! A genetic algorithm engine over binary chromosomes.
//!
//! Real-valued solution vectors are discretized per component onto a
//! power-of-two grid and packed into one bit chromosome. A [`Population`]
//! of such individuals is evolved by an [`Engine`] using pluggable
//! selection, crossover and mutation operators, with the pair loop of each
//! generation spread over rayon worker threads and, optionally, over the
//! ranks of a [`ProcessGroup`](distributed::ProcessGroup).
//!
//! ```rust
//! use genbit::{
//!     Engine, FlipBitMutation, Individual, Population, RouletteWheelSelection,
//!     UniformCrossover, ValueRange,
//! };
//!
//! let template = Individual::broadcast(&[5.0], ValueRange::new(0.0, 10.0), 0.001)?;
//! let mut population = Population::from_template(&template, 30, |indv: &Individual| {
//!     let x = indv.solution()[0];
//!     x + 10.0 * (5.0 * x).sin() + 7.0 * (4.0 * x).cos()
//! })?;
//!
//! let selection = RouletteWheelSelection::new();
//! let crossover = UniformCrossover::new(0.8, 0.5)?;
//! let mutation = FlipBitMutation::new(0.1)?;
//!
//! let mut engine = Engine::new(&mut population, &selection, &crossover, &mutation);
//! engine.run(20)?;
//! let best = engine.best()?;
//! assert!((0.0..=10.0).contains(&best.individual.solution()[0]));
//! # Ok::<(), genbit::GeneticError>(())
//! ```

pub mod crossover;
pub mod distributed;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod individual;
pub mod mutation;
pub mod population;
pub mod rng;
pub mod selection;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use crossover::{CrossoverStrategy, UniformCrossover};
pub use error::{GeneticError, OptionExt, Result};
pub use evolution::{
    ConsoleOutput, Engine, EngineBuilder, EvolutionOptions, EvolutionResult, FitnessStore,
    GenerationObserver, LogLevel,
};
pub use fitness::{Fitness, LinearScaling, Minimize, ScalingTarget};
pub use individual::{Individual, ValueRange};
pub use mutation::{FlipBitBigMutation, FlipBitMutation, MutationStrategy};
pub use population::{IndividualId, Population};
pub use selection::{
    ExponentialRankingSelection, LinearRankingSelection, RouletteWheelSelection, SelectionStrategy,
    TournamentSelection,
};
