// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Simulation Loop
// ─────────────────────────────────────────────────────────────────────
//! Per-step order (fixed):
//!   1. Clear force accumulators
//!   2. Spring forces
//!   3. Gravity forces
//!   4. Optional force clamp
//!   5. Symplectic Euler integration
//!   6. Velocity damping
//!   7. EM wave relaxation (+ optional absorbing frame)
//!
//! At caller-chosen cadences, after the physics:
//!   8. Neighbour index rebuild
//!   9. Annealing region update + sweep
//!   10. Particle detection
//!   11. Internal resonance of tracked particles

use serde::{Deserialize, Serialize};

use lattice_emergence::{AnnealingOptimizer, DetectionReport, ParticleClassifier, SweepStats};
use lattice_physics::{ForceField, Integrator, LatticeState, NeighborIndex, WaveRelaxer};
use lattice_types::{LatticeConfig, LatticeError, LatticeResult};

use crate::snapshot::{LatticeSnapshot, SnapshotCell};

/// Stepping and cadence configuration. A cadence of 0 disables the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Timestep. Default: 0.01.
    pub dt: f64,
    /// Per-step velocity damping; skipped when 0, ignored outside [0, 1).
    /// Default: 0.001.
    pub velocity_damping: f64,
    /// Force clamp; disabled by default.
    pub max_force: Option<f64>,
    pub neighbor_every: usize,
    pub anneal_every: usize,
    pub detect_every: usize,
    pub resonance_every: usize,
    /// Width of the absorbing EM frame; disabled by default.
    pub absorbing_border: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            velocity_damping: 0.001,
            max_force: None,
            neighbor_every: 10,
            anneal_every: 1,
            detect_every: 10,
            resonance_every: 1,
            absorbing_border: None,
        }
    }
}

impl EngineConfig {
    /// Physics only: no annealing, detection or resonance.
    pub fn physics_only() -> Self {
        Self {
            neighbor_every: 0,
            anneal_every: 0,
            detect_every: 0,
            resonance_every: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> LatticeResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(LatticeError::Config(format!(
                "dt must be finite and > 0, got {}",
                self.dt
            )));
        }
        if !self.velocity_damping.is_finite() {
            return Err(LatticeError::Config(format!(
                "velocity_damping must be finite, got {}",
                self.velocity_damping
            )));
        }
        if let Some(max) = self.max_force {
            if !(max.is_finite() && max > 0.0) {
                return Err(LatticeError::Config(format!(
                    "max_force must be finite and > 0, got {max}"
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> LatticeResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| LatticeError::Config(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Log entry for one step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepLog {
    pub step: u64,
    pub time: f64,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub em_energy: f64,
    pub average_spacing: f64,
    pub min_spacing: f64,
    pub max_spacing: f64,
    pub total_energy_density: f64,
    pub max_em_amplitude: f64,
    pub annealing_sites: usize,
    pub average_temperature: f64,
    pub particles: usize,
    pub neighbors_rebuilt: bool,
    #[serde(skip)]
    pub sweep: Option<SweepStats>,
    #[serde(skip)]
    pub detection: Option<DetectionReport>,
    pub finite: bool,
}

/// Relative tolerance between grid spacing and spring rest length.
const SPACING_TOLERANCE: f64 = 1e-9;

fn due(cadence: usize, step: u64) -> bool {
    cadence > 0 && step % cadence as u64 == 0
}

/// Orchestrates one shared [`LatticeState`] through the physics pipeline
/// and the emergence stages.
pub struct SimulationLoop {
    pub cfg: EngineConfig,
    lattice_cfg: LatticeConfig,
    state: LatticeState,
    forces: ForceField,
    integrator: Integrator,
    wave: WaveRelaxer,
    neighbors: NeighborIndex,
    annealer: AnnealingOptimizer,
    classifier: ParticleClassifier,
    step_count: u64,
    time: f64,
    non_finite_reported: bool,
}

impl SimulationLoop {
    /// Validate both configs and build every component around `state`.
    /// The neighbour index is built immediately.
    ///
    /// The state's grid spacing also sizes the periodic box, so it must
    /// equal the spring rest length `physics.equilibrium_distance`.
    pub fn new(state: LatticeState, lattice_cfg: LatticeConfig, cfg: EngineConfig) -> LatticeResult<Self> {
        lattice_cfg.validate()?;
        cfg.validate()?;

        let physics = &lattice_cfg.physics;
        let d0 = physics.equilibrium_distance;
        if (state.spacing() - d0).abs() > SPACING_TOLERANCE * d0 {
            return Err(LatticeError::Config(format!(
                "lattice spacing {} does not match equilibrium_distance {d0}",
                state.spacing()
            )));
        }
        let mut neighbors = NeighborIndex::new(physics.neighbor_radius);
        neighbors.rebuild(&state);

        log::info!(
            "Planck lattice {}×{} ({} sites), dt={}",
            state.width(),
            state.height(),
            state.len(),
            cfg.dt
        );

        let forces = ForceField::new(physics);
        let integrator = Integrator::new(physics);
        let wave = WaveRelaxer::new(physics);
        let annealer = AnnealingOptimizer::new(&lattice_cfg);
        let classifier = ParticleClassifier::new(&lattice_cfg.particles);

        Ok(Self {
            cfg,
            lattice_cfg,
            state,
            forces,
            integrator,
            wave,
            neighbors,
            annealer,
            classifier,
            step_count: 0,
            time: 0.0,
            non_finite_reported: false,
        })
    }

    /// Default lattice and engine configuration.
    pub fn default_params(state: LatticeState) -> LatticeResult<Self> {
        Self::new(state, LatticeConfig::default(), EngineConfig::default())
    }

    /// Advance one step.
    pub fn step(&mut self) -> StepLog {
        let dt = self.cfg.dt;

        self.state.clear_forces();
        self.forces.spacing_forces(&mut self.state);
        self.forces.gravity_forces(&mut self.state);
        if let Some(max) = self.cfg.max_force {
            ForceField::normalize_forces(&mut self.state, max);
        }
        self.integrator.integrate(&mut self.state, dt);
        if self.cfg.velocity_damping > 0.0 {
            Integrator::apply_damping(&mut self.state, self.cfg.velocity_damping);
        }
        self.wave.relax(&mut self.state);
        if let Some(border) = self.cfg.absorbing_border {
            WaveRelaxer::apply_absorbing_boundaries(&mut self.state, border);
        }

        self.step_count += 1;
        self.time += dt;
        let step = self.step_count;

        let neighbors_rebuilt = due(self.cfg.neighbor_every, step);
        if neighbors_rebuilt {
            self.neighbors.rebuild(&self.state);
        }

        let sweep = if due(self.cfg.anneal_every, step) {
            self.annealer.identify_regions(&mut self.state);
            Some(self.annealer.sweep(&mut self.state, &self.neighbors))
        } else {
            None
        };

        let detection = if due(self.cfg.detect_every, step) {
            Some(self.classifier.detect(&self.state, &self.neighbors))
        } else {
            None
        };

        if due(self.cfg.resonance_every, step) && !self.classifier.particles().is_empty() {
            self.classifier
                .propagate_internal_resonance(&mut self.state, &self.neighbors);
        }

        let finite = self.check_finite();
        self.build_log(neighbors_rebuilt, sweep, detection, finite)
    }

    /// Run `n` steps and return their logs.
    pub fn run(&mut self, n: usize) -> Vec<StepLog> {
        let mut logs = Vec::with_capacity(n);
        for _ in 0..n {
            logs.push(self.step());
        }
        logs
    }

    fn check_finite(&mut self) -> bool {
        match self.state.first_non_finite() {
            Some(site) => {
                if !self.non_finite_reported {
                    log::warn!(
                        "Non-finite lattice values at site {site} after step {}; consider a smaller dt or a force clamp",
                        self.step_count
                    );
                    self.non_finite_reported = true;
                }
                false
            }
            None => {
                self.non_finite_reported = false;
                true
            }
        }
    }

    fn build_log(
        &self,
        neighbors_rebuilt: bool,
        sweep: Option<SweepStats>,
        detection: Option<DetectionReport>,
        finite: bool,
    ) -> StepLog {
        let (min_spacing, max_spacing) = self.state.spacing_range();
        StepLog {
            step: self.step_count,
            time: self.time,
            kinetic_energy: self.integrator.kinetic_energy(&self.state),
            potential_energy: self.integrator.potential_energy(&self.state),
            em_energy: WaveRelaxer::energy(&self.state),
            average_spacing: self.state.average_spacing(),
            min_spacing,
            max_spacing,
            total_energy_density: self.state.total_energy(),
            max_em_amplitude: self.state.max_em_amplitude(),
            annealing_sites: self.annealer.annealing_count(&self.state),
            average_temperature: self.annealer.average_temperature(&self.state),
            particles: self.classifier.particles().len(),
            neighbors_rebuilt,
            sweep,
            detection,
            finite,
        }
    }

    /// Return sites to the grid, clear velocities and the EM field, and
    /// zero the clock. Energy density, annealing state and tracked
    /// particles are kept.
    pub fn reset(&mut self) {
        self.state.reset_dynamics();
        self.neighbors.rebuild(&self.state);
        self.step_count = 0;
        self.time = 0.0;
        self.non_finite_reported = false;
    }

    pub fn set_timestep(&mut self, dt: f64) -> LatticeResult<()> {
        let mut cfg = self.cfg.clone();
        cfg.dt = dt;
        cfg.validate()?;
        self.cfg = cfg;
        Ok(())
    }

    pub fn set_velocity_damping(&mut self, damping: f64) {
        self.cfg.velocity_damping = damping;
    }

    /// Reseed the annealing generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.annealer.set_seed(seed);
    }

    /// Current step count.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Elapsed simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> &LatticeState {
        &self.state
    }

    /// Mutable access for initializers (pulses, mass concentrations).
    pub fn state_mut(&mut self) -> &mut LatticeState {
        &mut self.state
    }

    pub fn lattice_config(&self) -> &LatticeConfig {
        &self.lattice_cfg
    }

    pub fn neighbors(&self) -> &NeighborIndex {
        &self.neighbors
    }

    pub fn rebuild_neighbors(&mut self) {
        self.neighbors.rebuild(&self.state);
    }

    pub fn classifier(&self) -> &ParticleClassifier {
        &self.classifier
    }

    pub fn annealer(&self) -> &AnnealingOptimizer {
        &self.annealer
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    /// Read-only copy of the current state and tracked particles.
    pub fn snapshot(&self) -> LatticeSnapshot {
        LatticeSnapshot::capture(
            self.step_count,
            self.time,
            &self.state,
            self.classifier.particles(),
        )
    }

    /// Capture and publish a snapshot for concurrent readers.
    pub fn publish(&self, cell: &SnapshotCell) {
        cell.publish(self.snapshot());
    }

    pub fn log_statistics(&self) {
        let (lo, hi) = self.state.spacing_range();
        log::info!(
            "Step {} (t={:.4}): spacing avg={:.4} min={:.4} max={:.4}, energy={:.4}, max EM={:.4}",
            self.step_count,
            self.time,
            self.state.average_spacing(),
            lo,
            hi,
            self.state.total_energy(),
            self.state.max_em_amplitude()
        );
        self.classifier.log_statistics(&self.state);
    }
}
