// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration, packing classification, and error hierarchy for the
//! Planck lattice kernel.

pub mod config;
pub mod error;
pub mod packing;

pub use config::{AnnealingParams, CoordinationTable, LatticeConfig, ParticleParams, PhysicsParams};
pub use error::{LatticeError, LatticeResult};
pub use packing::PackingType;
