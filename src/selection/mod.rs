pub mod exponential_ranking;
pub mod linear_ranking;
pub mod roulette;
pub mod selection_strategy;
pub mod tournament;

pub use exponential_ranking::ExponentialRankingSelection;
pub use linear_ranking::LinearRankingSelection;
pub use roulette::RouletteWheelSelection;
pub use selection_strategy::{Parents, SelectionStrategy};
pub use tournament::TournamentSelection;
