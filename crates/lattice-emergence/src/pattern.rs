// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Particle Pattern
// ─────────────────────────────────────────────────────────────────────

use std::collections::BTreeSet;
use std::fmt;

use lattice_physics::LatticeState;
use lattice_types::PackingType;

/// Energy change below which an aging step counts as "unchanged".
pub const UNCHANGED_TOLERANCE: f64 = 0.01;
/// Unchanged aging steps that must be exceeded before a pattern is stable.
pub const STABLE_AFTER: u32 = 10;
pub const MIN_SUSTAINING_ENERGY: f64 = 1.0;
pub const MIN_SUSTAINING_STABILITY: f64 = 0.5;

/// A connected, high-energy cluster of sites treated as one emergent
/// particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticlePattern {
    id: u64,
    center_index: usize,
    members: BTreeSet<usize>,
    total_energy: f64,
    /// Mean boundary energy density; infinite for a cluster with no
    /// outside neighbours.
    stability: f64,
    age: u64,
    packing: PackingType,
    last_total_energy: f64,
    unchanged_count: u32,
}

impl ParticlePattern {
    pub fn new(
        id: u64,
        center_index: usize,
        members: impl IntoIterator<Item = usize>,
        total_energy: f64,
        stability: f64,
        packing: PackingType,
    ) -> Self {
        Self {
            id,
            center_index,
            members: members.into_iter().collect(),
            total_energy,
            stability,
            age: 0,
            packing,
            last_total_energy: total_energy,
            unchanged_count: 0,
        }
    }

    /// Advance the pattern's clock and update the unchanged-energy run.
    pub fn age_one_timestep(&mut self) {
        self.age += 1;
        if (self.total_energy - self.last_total_energy).abs() < UNCHANGED_TOLERANCE {
            self.unchanged_count += 1;
        } else {
            self.unchanged_count = 0;
        }
        self.last_total_energy = self.total_energy;
    }

    pub fn is_stable(&self) -> bool {
        self.unchanged_count > STABLE_AFTER
    }

    pub fn is_self_sustaining(&self) -> bool {
        self.total_energy > MIN_SUSTAINING_ENERGY
            && self.stability > MIN_SUSTAINING_STABILITY
            && self.is_stable()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Seed site the cluster was grown from.
    pub fn center_index(&self) -> usize {
        self.center_index
    }

    pub fn members(&self) -> &BTreeSet<usize> {
        &self.members
    }

    pub fn contains(&self, site: usize) -> bool {
        self.members.contains(&site)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }

    pub fn set_total_energy(&mut self, total_energy: f64) {
        self.total_energy = total_energy;
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    pub fn set_stability(&mut self, stability: f64) {
        self.stability = stability;
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn packing(&self) -> PackingType {
        self.packing
    }

    pub fn set_packing(&mut self, packing: PackingType) {
        self.packing = packing;
    }

    /// Mean member position, `None` for an empty pattern. Positions are
    /// averaged as stored, without unwrapping across the torus seam.
    pub fn center_of_mass(&self, state: &LatticeState) -> Option<(f64, f64)> {
        if self.members.is_empty() {
            return None;
        }
        let (sx, sy) = self
            .members
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &i| (sx + state.pos_x[i], sy + state.pos_y[i]));
        let n = self.members.len() as f64;
        Some((sx / n, sy / n))
    }
}

impl fmt::Display for ParticlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Particle {}: center idx={}, size={}, energy={:.2}, stability={:.2}, type={}, age={}",
            self.id,
            self.center_index,
            self.size(),
            self.total_energy,
            self.stability,
            self.packing,
            self.age
        )
    }
}
