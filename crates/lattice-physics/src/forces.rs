// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Force Field
// ─────────────────────────────────────────────────────────────────────
//! Spring (Hooke) and linear-gravity force accumulation.
//!
//! Both passes add into the state's force accumulator; the caller clears
//! it once per step before the first pass.

use lattice_types::PhysicsParams;

use crate::state::{LatticeState, MIN_DISTANCE};

/// Sources with energy density at or below this exert no gravity.
pub const GRAVITY_SOURCE_MIN: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct ForceField {
    pub spring_k: f64,
    pub equilibrium_distance: f64,
    pub gravity_g: f64,
}

impl ForceField {
    pub fn new(params: &PhysicsParams) -> Self {
        Self {
            spring_k: params.spring_k,
            equilibrium_distance: params.equilibrium_distance,
            gravity_g: params.gravity_g,
        }
    }

    /// Hooke force from all four axial springs of every site.
    ///
    /// Each site visits its four neighbours and only updates itself, so
    /// every spring is evaluated once from each end.
    pub fn spacing_forces(&self, state: &mut LatticeState) {
        for i in 0..state.len() {
            let mut fx = 0.0;
            let mut fy = 0.0;
            for j in state.axial_neighbors(i) {
                let (dx, dy) = state.displacement(i, j);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist <= MIN_DISTANCE {
                    continue;
                }
                let magnitude = self.spring_k * (dist - self.equilibrium_distance);
                fx += magnitude * dx / dist;
                fy += magnitude * dy / dist;
            }
            state.force_x[i] += fx;
            state.force_y[i] += fy;
        }
    }

    /// Linear gravity: each energetic source pulls its four axial
    /// neighbours toward itself with `G · E · distance`.
    pub fn gravity_forces(&self, state: &mut LatticeState) {
        for src in 0..state.len() {
            let energy = state.energy_density[src];
            if energy <= GRAVITY_SOURCE_MIN {
                continue;
            }
            for j in state.axial_neighbors(src) {
                let (dx, dy) = state.displacement(j, src);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist <= MIN_DISTANCE {
                    continue;
                }
                let magnitude = self.gravity_g * energy * dist;
                state.force_x[j] += magnitude * dx / dist;
                state.force_y[j] += magnitude * dy / dist;
            }
        }
    }

    /// Clamp each site's force vector to `max_magnitude`, keeping its
    /// direction. NaN components are left as they are.
    pub fn normalize_forces(state: &mut LatticeState, max_magnitude: f64) {
        let max_sq = max_magnitude * max_magnitude;
        for (fx, fy) in state.force_x.iter_mut().zip(state.force_y.iter_mut()) {
            let sq = *fx * *fx + *fy * *fy;
            if sq > max_sq {
                let scale = max_magnitude / sq.sqrt();
                *fx *= scale;
                *fy *= scale;
            }
        }
    }
}
