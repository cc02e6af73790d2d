// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice State
// ─────────────────────────────────────────────────────────────────────
//! Structure-of-arrays container for every per-site quantity of a
//! toroidal W×H lattice.
//!
//! Site `i` sits at grid coordinate `(i % W, i / W)`; all arrays have
//! exactly `W·H` entries for the lifetime of the state. Fields are public
//! so the stepping components can borrow them disjointly; their lengths
//! must not be changed.

use std::f64::consts::TAU;

use lattice_types::{LatticeError, LatticeResult};

/// Distances at or below this are treated as coincident sites.
pub const MIN_DISTANCE: f64 = 1e-4;

/// The four axial neighbour offsets: right, left, down, up.
pub const AXIAL_OFFSETS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone)]
pub struct LatticeState {
    width: usize,
    height: usize,
    spacing: f64,

    pub pos_x: Vec<f64>,
    pub pos_y: Vec<f64>,
    pub vel_x: Vec<f64>,
    pub vel_y: Vec<f64>,
    /// Force accumulator; cleared once per step.
    pub force_x: Vec<f64>,
    pub force_y: Vec<f64>,

    pub energy_density: Vec<f64>,

    /// Complex EM-like field.
    pub em_real: Vec<f64>,
    pub em_imag: Vec<f64>,

    /// 0 means the site has never annealed.
    pub annealing_temperature: Vec<f64>,
    pub is_annealing: Vec<bool>,
    /// Run of consecutive downhill annealing moves.
    pub stability_history: Vec<u32>,
    /// Local energy recorded at the last accepted annealing move.
    pub structural_energy: Vec<f64>,
}

impl LatticeState {
    /// Allocate a `width × height` lattice with sites on the regular grid
    /// `(x·spacing, y·spacing)` and every other quantity zeroed.
    pub fn new(width: usize, height: usize, spacing: f64) -> LatticeResult<Self> {
        if width == 0 || height == 0 {
            return Err(LatticeError::Dimensions(format!(
                "grid must be at least 1×1, got {width}×{height}"
            )));
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(LatticeError::Dimensions(format!(
                "spacing must be finite and > 0, got {spacing}"
            )));
        }
        let n = width.checked_mul(height).ok_or_else(|| {
            LatticeError::Dimensions(format!("{width}×{height} overflows the site count"))
        })?;

        let mut state = Self {
            width,
            height,
            spacing,
            pos_x: vec![0.0; n],
            pos_y: vec![0.0; n],
            vel_x: vec![0.0; n],
            vel_y: vec![0.0; n],
            force_x: vec![0.0; n],
            force_y: vec![0.0; n],
            energy_density: vec![0.0; n],
            em_real: vec![0.0; n],
            em_imag: vec![0.0; n],
            annealing_temperature: vec![0.0; n],
            is_annealing: vec![false; n],
            stability_history: vec![0; n],
            structural_energy: vec![0.0; n],
        };
        state.place_on_grid();
        Ok(state)
    }

    fn place_on_grid(&mut self) {
        for i in 0..self.len() {
            self.pos_x[i] = self.grid_x(i) as f64 * self.spacing;
            self.pos_y[i] = self.grid_y(i) as f64 * self.spacing;
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Initial grid spacing, also the periodic cell size.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn grid_x(&self, index: usize) -> usize {
        index % self.width
    }

    #[inline]
    pub fn grid_y(&self, index: usize) -> usize {
        index / self.width
    }

    /// Index of the site at `(x+dx, y+dy)`, wrapping both axes.
    #[inline]
    pub fn neighbor(&self, x: usize, y: usize, dx: i64, dy: i64) -> usize {
        let w = self.width as i64;
        let h = self.height as i64;
        let nx = (x as i64 + dx).rem_euclid(w) as usize;
        let ny = (y as i64 + dy).rem_euclid(h) as usize;
        self.index(nx, ny)
    }

    /// The four toroidal axial neighbours of `index`, in
    /// [`AXIAL_OFFSETS`] order. Entries may equal `index` on 1-wide grids.
    #[inline]
    pub fn axial_neighbors(&self, index: usize) -> [usize; 4] {
        let x = self.grid_x(index);
        let y = self.grid_y(index);
        AXIAL_OFFSETS.map(|(dx, dy)| self.neighbor(x, y, dx, dy))
    }

    /// Extent of the periodic box, `(W·d0, H·d0)`.
    #[inline]
    pub fn box_size(&self) -> (f64, f64) {
        (
            self.width as f64 * self.spacing,
            self.height as f64 * self.spacing,
        )
    }

    /// Fold a raw displacement once into `[-L/2, L/2]` per axis.
    #[inline]
    pub fn minimum_image(&self, mut dx: f64, mut dy: f64) -> (f64, f64) {
        let (lx, ly) = self.box_size();
        if dx > 0.5 * lx {
            dx -= lx;
        } else if dx < -0.5 * lx {
            dx += lx;
        }
        if dy > 0.5 * ly {
            dy -= ly;
        } else if dy < -0.5 * ly {
            dy += ly;
        }
        (dx, dy)
    }

    /// Minimum-image vector pointing from site `from` to site `to`.
    #[inline]
    pub fn displacement(&self, from: usize, to: usize) -> (f64, f64) {
        self.minimum_image(
            self.pos_x[to] - self.pos_x[from],
            self.pos_y[to] - self.pos_y[from],
        )
    }

    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        let (dx, dy) = self.displacement(a, b);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn clear_forces(&mut self) {
        self.force_x.fill(0.0);
        self.force_y.fill(0.0);
    }

    /// Overwrite the EM field with a Gaussian-enveloped radial wave centred
    /// at world position `(cx, cy)`.
    pub fn add_em_pulse(&mut self, cx: f64, cy: f64, amplitude: f64, sigma: f64, wavelength: f64) {
        let k = TAU / wavelength;
        let sigma_sq = sigma * sigma;
        for i in 0..self.len() {
            let dx = self.pos_x[i] - cx;
            let dy = self.pos_y[i] - cy;
            let dist_sq = dx * dx + dy * dy;
            let envelope = amplitude * (-dist_sq / sigma_sq).exp();
            let phase = k * dist_sq.sqrt();
            self.em_real[i] = envelope * phase.cos();
            self.em_imag[i] = envelope * phase.sin();
        }
    }

    /// Add a Gaussian bump of energy density centred at world `(cx, cy)`.
    pub fn add_mass_concentration(&mut self, cx: f64, cy: f64, mass: f64, radius: f64) {
        let radius_sq = radius * radius;
        for i in 0..self.len() {
            let dx = self.pos_x[i] - cx;
            let dy = self.pos_y[i] - cy;
            let dist_sq = dx * dx + dy * dy;
            self.energy_density[i] += mass * (-dist_sq / radius_sq).exp();
        }
    }

    /// Right and down neighbour pairs, each spring counted once. Pairs that
    /// wrap onto the site itself are skipped.
    pub fn spring_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len()).flat_map(move |i| {
            let x = self.grid_x(i);
            let y = self.grid_y(i);
            [self.neighbor(x, y, 1, 0), self.neighbor(x, y, 0, 1)]
                .into_iter()
                .filter(move |&j| j != i)
                .map(move |j| (i, j))
        })
    }

    /// Mean spring length; 0 for a 1×1 lattice.
    pub fn average_spacing(&self) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for (i, j) in self.spring_pairs() {
            total += self.distance(i, j);
            count += 1;
        }
        if count > 0 {
            total / count as f64
        } else {
            0.0
        }
    }

    /// Shortest and longest spring, `(0, 0)` for a 1×1 lattice.
    pub fn spacing_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = 0.0_f64;
        for (i, j) in self.spring_pairs() {
            let d = self.distance(i, j);
            min = min.min(d);
            max = max.max(d);
        }
        if min.is_finite() {
            (min, max)
        } else {
            (0.0, 0.0)
        }
    }

    pub fn total_energy(&self) -> f64 {
        self.energy_density.iter().sum()
    }

    #[inline]
    pub fn em_amplitude(&self, index: usize) -> f64 {
        self.em_real[index].hypot(self.em_imag[index])
    }

    #[inline]
    pub fn em_phase(&self, index: usize) -> f64 {
        self.em_imag[index].atan2(self.em_real[index])
    }

    pub fn max_em_amplitude(&self) -> f64 {
        (0..self.len())
            .map(|i| self.em_amplitude(i))
            .fold(0.0, f64::max)
    }

    /// First site carrying NaN or ±Inf in position, velocity or EM field.
    pub fn first_non_finite(&self) -> Option<usize> {
        (0..self.len()).find(|&i| {
            !(self.pos_x[i].is_finite()
                && self.pos_y[i].is_finite()
                && self.vel_x[i].is_finite()
                && self.vel_y[i].is_finite()
                && self.em_real[i].is_finite()
                && self.em_imag[i].is_finite())
        })
    }

    /// Return sites to the grid and zero velocities, forces and the EM
    /// field. Energy density and annealing bookkeeping are kept.
    pub fn reset_dynamics(&mut self) {
        self.place_on_grid();
        self.vel_x.fill(0.0);
        self.vel_y.fill(0.0);
        self.clear_forces();
        self.em_real.fill(0.0);
        self.em_imag.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_places_sites_on_grid() {
        let s = LatticeState::new(4, 3, 2.0).unwrap();
        assert_eq!(s.len(), 12);
        let i = s.index(3, 2);
        assert_eq!(i, 11);
        assert_eq!((s.pos_x[i], s.pos_y[i]), (6.0, 4.0));
        assert!(s.energy_density.iter().all(|&e| e == 0.0));
        assert!(s.annealing_temperature.iter().all(|&t| t == 0.0));
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(matches!(
            LatticeState::new(0, 5, 1.0),
            Err(LatticeError::Dimensions(_))
        ));
        assert!(LatticeState::new(5, 0, 1.0).is_err());
        assert!(LatticeState::new(5, 5, 0.0).is_err());
        assert!(LatticeState::new(5, 5, f64::NAN).is_err());
    }

    #[test]
    fn test_neighbor_wraps() {
        let s = LatticeState::new(4, 3, 1.0).unwrap();
        assert_eq!(s.neighbor(3, 0, 1, 0), s.index(0, 0));
        assert_eq!(s.neighbor(0, 0, -1, 0), s.index(3, 0));
        assert_eq!(s.neighbor(1, 0, 0, -1), s.index(1, 2));
        assert_eq!(s.neighbor(1, 2, 0, 1), s.index(1, 0));
    }

    #[test]
    fn test_minimum_image_across_seam() {
        let s = LatticeState::new(6, 4, 1.0).unwrap();
        let a = s.index(5, 0);
        let b = s.index(0, 0);
        let (dx, dy) = s.displacement(a, b);
        assert!((dx - 1.0).abs() < 1e-12, "dx={dx} should be 1.0");
        assert_eq!(dy, 0.0);
        let c = s.index(0, 3);
        let (_, dy) = s.displacement(b, c);
        assert!((dy + 1.0).abs() < 1e-12, "dy={dy} should be -1.0");
    }

    #[test]
    fn test_average_spacing_regular_grid() {
        let s = LatticeState::new(5, 5, 1.0).unwrap();
        assert!((s.average_spacing() - 1.0).abs() < 1e-12);
        let (lo, hi) = s.spacing_range();
        assert!((lo - 1.0).abs() < 1e-12 && (hi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_spring_pairs_skip_self_on_ring() {
        let s = LatticeState::new(6, 1, 1.0).unwrap();
        assert_eq!(s.spring_pairs().count(), 6);
        let single = LatticeState::new(1, 1, 1.0).unwrap();
        assert_eq!(single.spring_pairs().count(), 0);
        assert_eq!(single.average_spacing(), 0.0);
        assert_eq!(single.spacing_range(), (0.0, 0.0));
    }

    #[test]
    fn test_em_pulse_centre_value() {
        let mut s = LatticeState::new(9, 9, 1.0).unwrap();
        s.add_em_pulse(4.0, 4.0, 2.0, 3.0, 5.0);
        let c = s.index(4, 4);
        assert!((s.em_real[c] - 2.0).abs() < 1e-12);
        assert!(s.em_imag[c].abs() < 1e-12);
        assert!((s.max_em_amplitude() - 2.0).abs() < 1e-12);
        let r = s.index(5, 4);
        let expected = 2.0 * (-1.0_f64 / 9.0).exp();
        assert!((s.em_amplitude(r) - expected).abs() < 1e-12);
        assert!((s.em_phase(r) - (TAU / 5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_em_pulse_overwrites() {
        let mut s = LatticeState::new(5, 5, 1.0).unwrap();
        s.add_em_pulse(2.0, 2.0, 1.0, 2.0, 4.0);
        s.add_em_pulse(2.0, 2.0, 1.0, 2.0, 4.0);
        assert!((s.em_real[s.index(2, 2)] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mass_concentration_accumulates() {
        let mut s = LatticeState::new(5, 5, 1.0).unwrap();
        s.add_mass_concentration(2.0, 2.0, 10.0, 1.0);
        s.add_mass_concentration(2.0, 2.0, 10.0, 1.0);
        assert!((s.energy_density[s.index(2, 2)] - 20.0).abs() < 1e-12);
        let e = s.energy_density[s.index(3, 2)];
        assert!((e - 20.0 * (-1.0_f64).exp()).abs() < 1e-12);
        assert!(s.total_energy() > 20.0);
    }

    #[test]
    fn test_first_non_finite() {
        let mut s = LatticeState::new(3, 3, 1.0).unwrap();
        assert_eq!(s.first_non_finite(), None);
        s.vel_y[5] = f64::NAN;
        assert_eq!(s.first_non_finite(), Some(5));
    }

    #[test]
    fn test_reset_dynamics_keeps_energy_density() {
        let mut s = LatticeState::new(3, 3, 1.0).unwrap();
        s.pos_x[4] = 7.0;
        s.vel_x[4] = 1.0;
        s.em_real[4] = 1.0;
        s.energy_density[4] = 3.0;
        s.reset_dynamics();
        assert_eq!(s.pos_x[4], 1.0);
        assert_eq!(s.vel_x[4], 0.0);
        assert_eq!(s.em_real[4], 0.0);
        assert_eq!(s.energy_density[4], 3.0);
    }
}
