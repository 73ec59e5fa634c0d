pub mod flip_bit;
pub mod flip_bit_big;
pub mod mutation_strategy;

pub use flip_bit::FlipBitMutation;
pub use flip_bit_big::FlipBitBigMutation;
pub use mutation_strategy::MutationStrategy;
