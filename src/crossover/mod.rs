pub mod crossover_strategy;
pub mod uniform;

pub use crossover_strategy::CrossoverStrategy;
pub use uniform::UniformCrossover;
