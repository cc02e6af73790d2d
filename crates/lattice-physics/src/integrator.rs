// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Integrator
// ─────────────────────────────────────────────────────────────────────
//! Semi-implicit (symplectic) Euler stepping and energy accounting.

use lattice_types::PhysicsParams;

use crate::state::LatticeState;

#[derive(Debug, Clone)]
pub struct Integrator {
    pub mass: f64,
    pub spring_k: f64,
    pub equilibrium_distance: f64,
}

impl Integrator {
    pub fn new(params: &PhysicsParams) -> Self {
        Self {
            mass: params.sphere_mass,
            spring_k: params.spring_k,
            equilibrium_distance: params.equilibrium_distance,
        }
    }

    /// `v += F/m · dt`, then `x += v · dt` with the updated velocity.
    pub fn integrate(&self, state: &mut LatticeState, dt: f64) {
        let inv_m = 1.0 / self.mass;
        for i in 0..state.len() {
            state.vel_x[i] += state.force_x[i] * inv_m * dt;
            state.vel_y[i] += state.force_y[i] * inv_m * dt;
            state.pos_x[i] += state.vel_x[i] * dt;
            state.pos_y[i] += state.vel_y[i] * dt;
        }
    }

    /// Scale all velocities by `1 - factor`. Factors outside `[0, 1)` are
    /// ignored.
    pub fn apply_damping(state: &mut LatticeState, factor: f64) {
        if !(0.0..1.0).contains(&factor) {
            return;
        }
        let keep = 1.0 - factor;
        for v in state.vel_x.iter_mut().chain(state.vel_y.iter_mut()) {
            *v *= keep;
        }
    }

    pub fn kinetic_energy(&self, state: &LatticeState) -> f64 {
        let sum_sq: f64 = state
            .vel_x
            .iter()
            .zip(&state.vel_y)
            .map(|(vx, vy)| vx * vx + vy * vy)
            .sum();
        0.5 * self.mass * sum_sq
    }

    /// Spring energy over the right and down neighbour of every site.
    pub fn potential_energy(&self, state: &LatticeState) -> f64 {
        state
            .spring_pairs()
            .map(|(i, j)| {
                let stretch = state.distance(i, j) - self.equilibrium_distance;
                0.5 * self.spring_k * stretch * stretch
            })
            .sum()
    }

    pub fn total_mechanical_energy(&self, state: &LatticeState) -> f64 {
        self.kinetic_energy(state) + self.potential_energy(state)
    }
}
