//! Binary indexed (Fenwick) tree over non-negative weights.
//!
//! Supports point updates and prefix-sum search in O(log n), which keeps
//! repeated draw-and-remove loops from going quadratic on large pools.

/// Cumulative-weight tree. Indices are 0-based in the public API.
#[derive(Debug, Clone, Default)]
pub struct FenwickTree {
    /// 1-based partial sums; `tree[0]` is unused.
    tree: Vec<f64>,
    values: Vec<f64>,
}

impl FenwickTree {
    /// Create a tree of `len` zero weights.
    pub fn new(len: usize) -> Self {
        Self {
            tree: vec![0.0; len + 1],
            values: vec![0.0; len],
        }
    }

    /// Build a tree from weights in O(n). Negative and non-finite weights are stored as zero.
    pub fn from_weights(weights: &[f64]) -> Self {
        let values: Vec<f64> = weights.iter().copied().map(sanitize).collect();
        let n = values.len();
        let mut tree = vec![0.0; n + 1];
        for i in 1..=n {
            tree[i] += values[i - 1];
            let parent = i + lowbit(i);
            if parent <= n {
                tree[parent] += tree[i];
            }
        }
        Self { tree, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current weight at `index`.
    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Replace the weight at `index`.
    pub fn set(&mut self, index: usize, weight: f64) {
        let weight = sanitize(weight);
        let delta = weight - self.values[index];
        self.values[index] = weight;
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] += delta;
            i += lowbit(i);
        }
    }

    /// Sum of the weights in `[0, end)`.
    pub fn prefix_sum(&self, end: usize) -> f64 {
        let mut sum = 0.0;
        let mut i = end.min(self.len());
        while i > 0 {
            sum += self.tree[i];
            i -= lowbit(i);
        }
        sum
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.prefix_sum(self.len())
    }

    /// Find the index whose cumulative range `[prefix(i), prefix(i + 1))` contains `target`.
    ///
    /// Only indices with a positive weight are returned. When rounding drift pushes
    /// the search past the end, the last positive entry is returned instead.
    pub fn find(&self, target: f64) -> Option<usize> {
        let n = self.len();
        if n == 0 {
            return None;
        }

        let mut pos = 0usize;
        let mut remaining = target.max(0.0);
        let mut step = 1usize << (usize::BITS - 1 - n.leading_zeros());
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next] <= remaining {
                pos = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }

        if pos < n && self.values[pos] > 0.0 {
            return Some(pos);
        }
        self.nearest_positive(pos.min(n - 1))
    }

    fn nearest_positive(&self, from: usize) -> Option<usize> {
        (from..self.len())
            .find(|&i| self.values[i] > 0.0)
            .or_else(|| (0..from).rev().find(|&i| self.values[i] > 0.0))
    }
}

#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

#[inline]
fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}
