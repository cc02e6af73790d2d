// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Neighbor Index
// ─────────────────────────────────────────────────────────────────────
//! Distance-based neighbour cache under the toroidal minimum image.
//!
//! Rebuilt explicitly by the caller (all-pairs, O(N²)); the lists go stale
//! as sites move and are only as fresh as the last rebuild.

use crate::state::LatticeState;

#[derive(Debug, Clone)]
pub struct NeighborIndex {
    radius: f64,
    lists: Vec<Vec<usize>>,
}

impl NeighborIndex {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            lists: Vec::new(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of sites covered by the last rebuild.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn rebuild(&mut self, state: &LatticeState) {
        let n = state.len();
        let r_sq = self.radius * self.radius;
        self.lists.resize_with(n, Vec::new);
        for list in &mut self.lists {
            list.clear();
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = state.displacement(i, j);
                if dx * dx + dy * dy < r_sq {
                    self.lists[i].push(j);
                    self.lists[j].push(i);
                }
            }
        }

        log::debug!(
            "Rebuilt neighbor index: {n} sites, radius {:.3}, mean coordination {:.2}",
            self.radius,
            self.mean_coordination()
        );
    }

    /// Cached neighbours of `index`, ascending, never containing `index`
    /// itself. Empty for indices outside the last rebuild.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.lists.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn coordination(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    pub fn mean_coordination(&self) -> f64 {
        if self.lists.is_empty() {
            return 0.0;
        }
        let total: usize = self.lists.iter().map(Vec::len).sum();
        total as f64 / self.lists.len() as f64
    }
}
