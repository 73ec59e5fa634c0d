pub mod analysis;
pub mod builder;
pub mod engine;
pub mod options;

pub use analysis::{ConsoleOutput, FitnessStore, GenerationObserver, GenerationRecord};
pub use builder::EngineBuilder;
pub use engine::{Engine, EvolutionResult};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
