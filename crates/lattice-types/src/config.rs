// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, LatticeResult};
use crate::packing::PackingType;

/// Largest coordination number covered by the default table.
pub const MAX_TABLE_COORDINATION: usize = 12;

/// Structural energy contribution keyed by neighbour count.
///
/// Counts past the end of `entries` receive `out_of_table_penalty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationTable {
    pub entries: Vec<f64>,
    pub out_of_table_penalty: f64,
}

impl Default for CoordinationTable {
    fn default() -> Self {
        let entries = (0..=MAX_TABLE_COORDINATION as u32)
            .map(|n| PackingType::from_coordination(n).energy_bonus())
            .collect();
        Self {
            entries,
            out_of_table_penalty: PackingType::Custom.energy_bonus(),
        }
    }
}

impl CoordinationTable {
    pub fn energy(&self, coordination: usize) -> f64 {
        self.entries
            .get(coordination)
            .copied()
            .unwrap_or(self.out_of_table_penalty)
    }
}

/// Mechanical and field constants for the stepping pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Hooke constant of the nearest-neighbour springs.
    /// Default: 1.0.
    pub spring_k: f64,

    /// Rest length of the springs, and the initial grid spacing.
    /// Default: 1.0.
    pub equilibrium_distance: f64,

    /// Coupling of energy density to the (linear) gravity force.
    /// Default: 0.01.
    pub gravity_g: f64,

    /// Self-damping term of the EM relaxation.
    /// Default: 0.01.
    pub em_damping: f64,

    /// Mass of every site.
    /// Default: 1.0.
    pub sphere_mass: f64,

    /// Cutoff radius of the distance-based neighbour cache.
    /// Default: 1.5 (captures the 4 axial and 4 diagonal sites of a
    /// unit grid).
    pub neighbor_radius: f64,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            spring_k: 1.0,
            equilibrium_distance: 1.0,
            gravity_g: 0.01,
            em_damping: 0.01,
            sphere_mass: 1.0,
            neighbor_radius: 1.5,
        }
    }
}

/// Metropolis local-search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingParams {
    /// Sites with energy density above this explore new positions.
    /// Default: 2.0.
    pub threshold: f64,

    /// Temperature assigned to a site the first time it anneals.
    /// Default: 1.0.
    pub initial_temperature: f64,

    /// Multiplicative cooling applied after every attempted move.
    /// Default: 0.99.
    pub cooling_rate: f64,

    /// Half-width of the uniform position proposal, per axis.
    /// Default: 0.3.
    pub max_position_delta: f64,

    /// Seed of the proposal / acceptance generator.
    pub seed: u64,

    pub coordination: CoordinationTable,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            initial_temperature: 1.0,
            cooling_rate: 0.99,
            max_position_delta: 0.3,
            seed: 42,
            coordination: CoordinationTable::default(),
        }
    }
}

/// Particle detection and lifecycle parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Energy density a site needs to belong to a particle.
    /// Default: 3.0.
    pub threshold: f64,

    /// Consecutive downhill annealing moves a seed site needs.
    /// Default: 100.
    pub stability_threshold: u32,

    /// Components smaller than this are discarded.
    /// Default: 3.
    pub min_size: usize,

    /// Gain of the internal phase-alignment step.
    /// Default: 0.1.
    pub resonance_strength: f64,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            threshold: 3.0,
            stability_threshold: 100,
            min_size: 3,
            resonance_strength: 0.1,
        }
    }
}

/// All tunables of the lattice kernel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub physics: PhysicsParams,
    pub annealing: AnnealingParams,
    pub particles: ParticleParams,
}

fn require_finite(name: &str, value: f64) -> LatticeResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LatticeError::Config(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

impl LatticeConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> LatticeResult<()> {
        let p = &self.physics;
        require_finite("spring_k", p.spring_k)?;
        require_finite("gravity_g", p.gravity_g)?;
        require_finite("em_damping", p.em_damping)?;
        if !(p.equilibrium_distance.is_finite() && p.equilibrium_distance > 0.0) {
            return Err(LatticeError::Config(format!(
                "equilibrium_distance must be > 0, got {}",
                p.equilibrium_distance
            )));
        }
        if !(p.sphere_mass.is_finite() && p.sphere_mass > 0.0) {
            return Err(LatticeError::Config(format!(
                "sphere_mass must be > 0, got {}",
                p.sphere_mass
            )));
        }
        if !(p.neighbor_radius.is_finite() && p.neighbor_radius > 0.0) {
            return Err(LatticeError::Config(format!(
                "neighbor_radius must be > 0, got {}",
                p.neighbor_radius
            )));
        }

        let a = &self.annealing;
        require_finite("annealing.threshold", a.threshold)?;
        if !(a.initial_temperature.is_finite() && a.initial_temperature > 0.0) {
            return Err(LatticeError::Config(format!(
                "initial_temperature must be > 0, got {}",
                a.initial_temperature
            )));
        }
        if !(a.cooling_rate > 0.0 && a.cooling_rate <= 1.0) {
            return Err(LatticeError::Config(format!(
                "cooling_rate must be in (0, 1], got {}",
                a.cooling_rate
            )));
        }
        if !(a.max_position_delta.is_finite() && a.max_position_delta >= 0.0) {
            return Err(LatticeError::Config(format!(
                "max_position_delta must be >= 0, got {}",
                a.max_position_delta
            )));
        }
        if let Some(bad) = a.coordination.entries.iter().find(|e| !e.is_finite()) {
            return Err(LatticeError::Config(format!(
                "coordination table entries must be finite, got {bad}"
            )));
        }
        require_finite(
            "out_of_table_penalty",
            a.coordination.out_of_table_penalty,
        )?;

        let q = &self.particles;
        require_finite("particles.threshold", q.threshold)?;
        require_finite("resonance_strength", q.resonance_strength)?;
        if q.min_size == 0 {
            return Err(LatticeError::Config(
                "min_size must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults; the
    /// result is validated before it is returned.
    pub fn from_json(json: &str) -> LatticeResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| LatticeError::Config(format!("JSON parse error: {e}")))?;
        if let Err(e) = cfg.validate() {
            log::warn!("Rejected lattice config loaded from JSON: {e}");
            return Err(e);
        }
        Ok(cfg)
    }

    pub fn to_json(&self) -> LatticeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LatticeError::Config(format!("JSON encode error: {e}")))
    }
}
