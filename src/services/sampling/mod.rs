// ============================================
// Sampling Layer
// ============================================
//
// Order machinery for feed assembly:
// - PrefixSumTree: binary-indexed tree over f64 weights, O(log n) updates
//   and cumulative queries
// - WeightedSampler: weighted draws without replacement on top of the tree
// - rank_weights: geometric mass splits for rank-biased pools
//
// Everything here is deterministic given the injected RNG; exhaustion
// surfaces as `None`, never as an error.

pub mod fenwick;
pub mod rank_weights;
pub mod weighted;

pub use fenwick::PrefixSumTree;
pub use rank_weights::rank_weights;
pub use weighted::WeightedSampler;
