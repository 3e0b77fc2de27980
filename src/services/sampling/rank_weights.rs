// ============================================
// Rank Weights
// ============================================
//
// Geometric weight vectors for rank-biased sampling: the top-ranked
// candidate gets half the pool's mass, each following rank half of the
// previous one, and the tail rank is doubled so the vector sums to
// exactly the mass it was asked to spread.

/// Spread `total_mass` over `len` ranks by geometric halving.
///
/// rank_weights(1.0, 4) = [0.5, 0.25, 0.125, 0.125]; the last rank keeps
/// the doubled remainder so the sum is exact. Halving and doubling are
/// exact in binary floating point, so no rounding correction is needed.
pub fn rank_weights(total_mass: f64, len: usize) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }

    let mut weights = Vec::with_capacity(len);
    let mut share = total_mass / 2.0;
    for _ in 0..len {
        weights.push(share);
        share /= 2.0;
    }

    // Fold the geometric remainder into the tail.
    if let Some(last) = weights.last_mut() {
        *last *= 2.0;
    }

    weights
}
