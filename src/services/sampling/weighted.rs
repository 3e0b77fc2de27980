// ============================================
// Weighted Sampler
// ============================================
//
// Weighted sampling without replacement over a fixed candidate vector.
// Each draw costs O(log n): sample a target uniformly in [0, total mass),
// find the slot it falls into through the prefix-sum tree, then zero that
// slot so no draw repeats.
//
// Exhaustion is a normal outcome, not an error: `pick` returns `None`
// once no positive-weight candidate is left.

use rand::Rng;

use super::fenwick::PrefixSumTree;

/// Single-session sampler over index weights. Indices refer to the weight
/// vector the sampler was built from; the caller maps them back onto its
/// own candidates.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    tree: PrefixSumTree,
    weights: Vec<f64>,
    remaining: usize,
}

impl WeightedSampler {
    /// Build a sampler over `weights`. Entries must be finite and
    /// non-negative; zero-weight entries are legal but never drawn.
    pub fn from_weights(weights: &[f64]) -> Self {
        let tree = PrefixSumTree::from_weights(weights);
        let remaining = weights.iter().filter(|&&weight| weight > 0.0).count();
        Self {
            tree,
            weights: weights.to_vec(),
            remaining,
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Positive-weight candidates still drawable.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Mass still in play.
    pub fn total_mass(&self) -> f64 {
        self.tree.total()
    }

    /// Draw one index with probability proportional to its current weight,
    /// then remove it from all future draws. Returns `None` when the
    /// sampler is exhausted.
    pub fn pick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }

        let total = self.tree.total();
        if total <= 0.0 {
            return None;
        }

        let target = rng.gen_range(0.0..total);
        let index = self.tree.lower_bound(target)?;

        let weight = self.weights[index];
        if weight <= 0.0 {
            // Subtraction residue steered the walk onto a spent slot; all
            // meaningful mass is gone.
            return None;
        }

        self.tree.add(index, -weight);
        self.weights[index] = 0.0;
        self.remaining -= 1;
        Some(index)
    }

    /// Drain the sampler into the full draw order.
    pub fn drain<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.remaining);
        while let Some(index) = self.pick(rng) {
            order.push(index);
        }
        order
    }
}
