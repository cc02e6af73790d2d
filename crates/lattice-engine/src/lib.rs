// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Simulation loop for the Planck lattice: fixed-order physics stepping
//! with cadence-driven annealing and particle detection, plus read-only
//! snapshot publication for external consumers.

pub mod engine;
pub mod snapshot;

pub use engine::{EngineConfig, SimulationLoop, StepLog};
pub use snapshot::{LatticeSnapshot, ParticleView, SnapshotCell};

pub use lattice_emergence as emergence;
pub use lattice_physics as physics;
pub use lattice_types as types;
