// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Emergence
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Emergent structure on the Planck lattice: Metropolis annealing of
//! high-energy regions and detection of self-sustaining particles.

pub mod annealing;
pub mod classifier;
pub mod pattern;

pub use annealing::{AnnealingOptimizer, MoveOutcome, SweepStats};
pub use classifier::{DetectionReport, ParticleClassifier};
pub use pattern::ParticlePattern;
