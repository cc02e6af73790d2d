// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for lattice construction and configuration failures.
///
/// The stepping hot path never returns these; NaN/Inf propagate silently
/// through the arithmetic and are detected after the fact.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// Grid dimensions or spacing unusable for a lattice.
    #[error("invalid dimensions: {0}")]
    Dimensions(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

pub type LatticeResult<T> = Result<T, LatticeError>;
