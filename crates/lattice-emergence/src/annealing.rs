// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Annealing Optimizer
// ─────────────────────────────────────────────────────────────────────
//! Metropolis local search over site positions.
//!
//! High-energy sites get a private temperature and try small random
//! displacements, accepting uphill moves with probability `exp(−ΔE/T)`.
//! Each attempt cools the site geometrically. A run of downhill accepts
//! builds up the site's stability history, which particle detection
//! uses to pick seeds.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use lattice_physics::{LatticeState, NeighborIndex};
use lattice_types::{AnnealingParams, LatticeConfig};

/// Result of a single [`AnnealingOptimizer::attempt_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Site was not annealing; nothing changed.
    Skipped,
    /// Proposal rejected; position restored.
    Rejected,
    Accepted { downhill: bool },
}

/// Tally of one [`AnnealingOptimizer::sweep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub attempted: usize,
    pub accepted: usize,
    pub downhill: usize,
}

impl SweepStats {
    pub fn acceptance_ratio(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }
}

/// Owns the proposal/acceptance generator; the lattice and neighbour
/// cache are borrowed per call.
pub struct AnnealingOptimizer<R: Rng = ChaCha8Rng> {
    params: AnnealingParams,
    spring_k: f64,
    equilibrium_distance: f64,
    gravity_g: f64,
    rng: R,
}

impl AnnealingOptimizer<ChaCha8Rng> {
    /// Optimizer seeded from `config.annealing.seed`.
    pub fn new(config: &LatticeConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.annealing.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng + SeedableRng> AnnealingOptimizer<R> {
    /// Restart the generator from `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
    }
}

impl<R: Rng> AnnealingOptimizer<R> {
    pub fn with_rng(config: &LatticeConfig, rng: R) -> Self {
        Self {
            params: config.annealing.clone(),
            spring_k: config.physics.spring_k,
            equilibrium_distance: config.physics.equilibrium_distance,
            gravity_g: config.physics.gravity_g,
            rng,
        }
    }

    pub fn params(&self) -> &AnnealingParams {
        &self.params
    }

    /// Flag sites above the annealing threshold. A site entering for the
    /// first time gets the initial temperature; sites that drop out keep
    /// whatever temperature they had.
    pub fn identify_regions(&self, state: &mut LatticeState) {
        let threshold = self.params.threshold;
        for i in 0..state.len() {
            if state.energy_density[i] > threshold {
                state.is_annealing[i] = true;
                if state.annealing_temperature[i] == 0.0 {
                    state.annealing_temperature[i] = self.params.initial_temperature;
                }
            } else {
                state.is_annealing[i] = false;
            }
        }
    }

    /// Spring energy to every cached neighbour, plus the coordination
    /// term, plus the local EM intensity, minus the gravity well.
    pub fn local_energy(&self, state: &LatticeState, neighbors: &NeighborIndex, site: usize) -> f64 {
        let list = neighbors.neighbors(site);
        let mut energy = 0.0;
        for &j in list {
            let stretch = state.distance(site, j) - self.equilibrium_distance;
            energy += 0.5 * self.spring_k * stretch * stretch;
        }
        energy += self.params.coordination.energy(list.len());
        energy += state.em_real[site] * state.em_real[site] + state.em_imag[site] * state.em_imag[site];
        energy -= self.gravity_g * state.energy_density[site];
        energy
    }

    /// One Metropolis trial for `site`. Non-annealing sites are left
    /// completely untouched, including their temperature.
    pub fn attempt_move(
        &mut self,
        state: &mut LatticeState,
        neighbors: &NeighborIndex,
        site: usize,
    ) -> MoveOutcome {
        if !state.is_annealing[site] {
            return MoveOutcome::Skipped;
        }

        let current = self.local_energy(state, neighbors, site);
        let old_x = state.pos_x[site];
        let old_y = state.pos_y[site];
        let delta = self.params.max_position_delta;
        let dx = (self.rng.gen::<f64>() - 0.5) * 2.0 * delta;
        let dy = (self.rng.gen::<f64>() - 0.5) * 2.0 * delta;
        state.pos_x[site] = old_x + dx;
        state.pos_y[site] = old_y + dy;

        let proposed = self.local_energy(state, neighbors, site);
        let delta_e = proposed - current;
        let temperature = state.annealing_temperature[site];

        let accept = if delta_e < 0.0 {
            true
        } else if temperature > 0.0 {
            self.rng.gen::<f64>() < (-delta_e / temperature).exp()
        } else {
            false
        };

        let outcome = if accept {
            state.structural_energy[site] = proposed;
            let downhill = delta_e < 0.0;
            if downhill {
                state.stability_history[site] = state.stability_history[site].saturating_add(1);
            } else {
                state.stability_history[site] = 0;
            }
            MoveOutcome::Accepted { downhill }
        } else {
            state.pos_x[site] = old_x;
            state.pos_y[site] = old_y;
            MoveOutcome::Rejected
        };

        state.annealing_temperature[site] *= self.params.cooling_rate;
        outcome
    }

    /// Sequential pass over every annealing site in index order. Later
    /// sites see the moves already accepted earlier in the same pass.
    pub fn sweep(&mut self, state: &mut LatticeState, neighbors: &NeighborIndex) -> SweepStats {
        let mut stats = SweepStats::default();
        for i in 0..state.len() {
            match self.attempt_move(state, neighbors, i) {
                MoveOutcome::Skipped => {}
                MoveOutcome::Rejected => stats.attempted += 1,
                MoveOutcome::Accepted { downhill } => {
                    stats.attempted += 1;
                    stats.accepted += 1;
                    if downhill {
                        stats.downhill += 1;
                    }
                }
            }
        }
        log::debug!(
            "Annealing sweep: {} attempted, {} accepted ({} downhill)",
            stats.attempted,
            stats.accepted,
            stats.downhill
        );
        stats
    }

    pub fn annealing_count(&self, state: &LatticeState) -> usize {
        state.is_annealing.iter().filter(|&&a| a).count()
    }

    /// Mean temperature over annealing sites, 0 when none anneal.
    pub fn average_temperature(&self, state: &LatticeState) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (i, &active) in state.is_annealing.iter().enumerate() {
            if active {
                sum += state.annealing_temperature[i];
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}
