// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Packing Classification
// ─────────────────────────────────────────────────────────────────────
//! Geometric packing arrangements a cluster of sites can settle into.
//!
//! Each arrangement carries its ideal coordination number and the
//! structural energy bonus (negative = favourable) it contributes to the
//! annealing landscape.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackingType {
    SimpleCubic,
    /// Face-centred cubic.
    Fcc,
    /// Hexagonal close-packed.
    Hcp,
    BodyCentered,
    Hexagonal2D,
    Square2D,
    /// Anything that does not match a known coordination.
    Custom,
}

impl PackingType {
    pub const ALL: [PackingType; 7] = [
        PackingType::SimpleCubic,
        PackingType::Fcc,
        PackingType::Hcp,
        PackingType::BodyCentered,
        PackingType::Hexagonal2D,
        PackingType::Square2D,
        PackingType::Custom,
    ];

    /// Number of nearest neighbours in the ideal arrangement.
    pub fn ideal_coordination(self) -> u32 {
        match self {
            PackingType::SimpleCubic => 6,
            PackingType::Fcc | PackingType::Hcp => 12,
            PackingType::BodyCentered => 8,
            PackingType::Hexagonal2D => 6,
            PackingType::Square2D => 4,
            PackingType::Custom => 0,
        }
    }

    /// Structural energy contribution of this arrangement.
    pub fn energy_bonus(self) -> f64 {
        match self {
            PackingType::SimpleCubic => 0.0,
            PackingType::Fcc | PackingType::Hcp => -1.0,
            PackingType::BodyCentered => -0.5,
            PackingType::Hexagonal2D => -0.8,
            PackingType::Square2D => 0.0,
            PackingType::Custom => 0.5,
        }
    }

    /// Classify a (rounded) coordination number.
    ///
    /// 6 maps to the planar hexagonal packing, not simple cubic: the
    /// lattice is two-dimensional.
    pub fn from_coordination(coordination: u32) -> Self {
        match coordination {
            4 => PackingType::Square2D,
            6 => PackingType::Hexagonal2D,
            8 => PackingType::BodyCentered,
            12 => PackingType::Fcc,
            _ => PackingType::Custom,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PackingType::SimpleCubic => "SIMPLE_CUBIC",
            PackingType::Fcc => "FCC",
            PackingType::Hcp => "HCP",
            PackingType::BodyCentered => "BODY_CENTERED",
            PackingType::Hexagonal2D => "HEXAGONAL_2D",
            PackingType::Square2D => "SQUARE_2D",
            PackingType::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for PackingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
