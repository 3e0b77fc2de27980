pub mod assembly;
pub mod sampling;
pub mod scoring;

pub use assembly::FeedAssembler;
pub use sampling::{rank_weights, PrefixSumTree, WeightedSampler};
pub use scoring::{ScoreEngine, ScoreResult};
