// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Physics Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Planck lattice physics: structure-of-arrays site state, spring and
//! linear-gravity forces, symplectic Euler integration, damped EM wave
//! relaxation, and the distance-based neighbour cache.

pub mod forces;
pub mod integrator;
pub mod neighbors;
pub mod state;
pub mod wave;

pub use forces::ForceField;
pub use integrator::Integrator;
pub use neighbors::NeighborIndex;
pub use state::LatticeState;
pub use wave::WaveRelaxer;
