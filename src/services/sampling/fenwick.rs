// ============================================
// Prefix-Sum Tree
// ============================================
//
// Binary-indexed tree over f64 weights, the structure behind the weighted
// sampler: point updates and cumulative-weight queries in O(log n), plus a
// descending-bitmask search for the slot a sampled target falls into.
//
// Storage is the classic 1-based flat array: updates climb by adding the
// lowest set bit of the node index, queries descend by clearing it.

/// Binary-indexed tree over non-negative weights.
///
/// Weights must be finite and non-negative; negative deltas through
/// [`PrefixSumTree::add`] are only meaningful while they keep every slot
/// non-negative.
#[derive(Debug, Clone)]
pub struct PrefixSumTree {
    /// 1-based node array; index 0 is unused.
    nodes: Vec<f64>,
    len: usize,
}

impl PrefixSumTree {
    /// Build a tree holding `len` zero weights.
    pub fn with_len(len: usize) -> Self {
        Self {
            nodes: vec![0.0; len + 1],
            len,
        }
    }

    /// Build a tree from initial weights in O(n): each slot's value is
    /// pushed to its parent once instead of replaying `add` per slot.
    pub fn from_weights(weights: &[f64]) -> Self {
        let len = weights.len();
        let mut nodes = vec![0.0; len + 1];
        for (i, &weight) in weights.iter().enumerate() {
            debug_assert!(weight >= 0.0, "weights must be non-negative");
            let node = i + 1;
            nodes[node] += weight;
            let parent = node + lowest_bit(node);
            if parent <= len {
                let subtotal = nodes[node];
                nodes[parent] += subtotal;
            }
        }
        Self { nodes, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add `delta` to the weight at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn add(&mut self, index: usize, delta: f64) {
        assert!(index < self.len, "index {index} out of bounds {}", self.len);
        let mut node = index + 1;
        while node <= self.len {
            self.nodes[node] += delta;
            node += lowest_bit(node);
        }
    }

    /// Sum of the first `count` weights. Counts past the end clamp to the
    /// full length.
    pub fn prefix_sum(&self, count: usize) -> f64 {
        let mut node = count.min(self.len);
        let mut sum = 0.0;
        while node > 0 {
            sum += self.nodes[node];
            node &= node - 1;
        }
        sum
    }

    /// Total weight in the tree.
    pub fn total(&self) -> f64 {
        self.prefix_sum(self.len)
    }

    /// Smallest index whose cumulative weight strictly exceeds `target`,
    /// or `None` when the total does not (target at or past the total
    /// mass). With non-negative weights the returned slot always carries
    /// positive weight for targets in `[0, total)`.
    pub fn lower_bound(&self, mut target: f64) -> Option<usize> {
        if self.len == 0 {
            return None;
        }

        // Descend from the highest power of two: keep stepping right while
        // the subtree sum stays at or below the remaining target.
        let mut position = 0usize;
        let mut mask = self.len.next_power_of_two();
        while mask > 0 {
            let next = position + mask;
            if next <= self.len && self.nodes[next] <= target {
                target -= self.nodes[next];
                position = next;
            }
            mask >>= 1;
        }

        if position >= self.len {
            None
        } else {
            Some(position)
        }
    }
}

#[inline]
fn lowest_bit(node: usize) -> usize {
    node & node.wrapping_neg()
}
