// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Snapshot Publication
// ─────────────────────────────────────────────────────────────────────
//! Immutable copies of the lattice for readers on other threads
//! (renderers, exporters). The live state is never shared; the stepping
//! thread publishes a fresh copy and readers clone an `Arc` to it.

use std::sync::Arc;

use parking_lot::RwLock;

use lattice_emergence::ParticlePattern;
use lattice_physics::LatticeState;
use lattice_types::PackingType;

/// Read-only view of one tracked particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleView {
    pub id: u64,
    pub center_index: usize,
    pub members: Vec<usize>,
    pub total_energy: f64,
    pub stability: f64,
    pub age: u64,
    pub packing: PackingType,
    pub center_of_mass: Option<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct LatticeSnapshot {
    pub step: u64,
    pub time: f64,
    pub width: usize,
    pub height: usize,
    pub pos_x: Vec<f64>,
    pub pos_y: Vec<f64>,
    pub energy_density: Vec<f64>,
    pub em_real: Vec<f64>,
    pub em_imag: Vec<f64>,
    pub is_annealing: Vec<bool>,
    pub annealing_temperature: Vec<f64>,
    pub stability_history: Vec<u32>,
    pub particles: Vec<ParticleView>,
}

impl LatticeSnapshot {
    pub fn capture(step: u64, time: f64, state: &LatticeState, particles: &[ParticlePattern]) -> Self {
        let particles = particles
            .iter()
            .map(|p| ParticleView {
                id: p.id(),
                center_index: p.center_index(),
                members: p.members().iter().copied().collect(),
                total_energy: p.total_energy(),
                stability: p.stability(),
                age: p.age(),
                packing: p.packing(),
                center_of_mass: p.center_of_mass(state),
            })
            .collect();

        Self {
            step,
            time,
            width: state.width(),
            height: state.height(),
            pos_x: state.pos_x.clone(),
            pos_y: state.pos_y.clone(),
            energy_density: state.energy_density.clone(),
            em_real: state.em_real.clone(),
            em_imag: state.em_imag.clone(),
            is_annealing: state.is_annealing.clone(),
            annealing_temperature: state.annealing_temperature.clone(),
            stability_history: state.stability_history.clone(),
            particles,
        }
    }

    pub fn len(&self) -> usize {
        self.pos_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos_x.is_empty()
    }

    pub fn em_amplitude(&self, index: usize) -> f64 {
        self.em_real[index].hypot(self.em_imag[index])
    }
}

/// Latest-snapshot slot shared between the stepping thread and readers.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCell {
    inner: Arc<RwLock<Option<Arc<LatticeSnapshot>>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: LatticeSnapshot) {
        *self.inner.write() = Some(Arc::new(snapshot));
    }

    /// Most recently published snapshot, if any.
    pub fn latest(&self) -> Option<Arc<LatticeSnapshot>> {
        self.inner.read().clone()
    }

    pub fn latest_step(&self) -> Option<u64> {
        self.inner.read().as_ref().map(|s| s.step)
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }
}
