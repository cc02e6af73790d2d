// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Wave Relaxer
// ─────────────────────────────────────────────────────────────────────
//! Damped discrete relaxation of the complex EM field.
//!
//! Strict Jacobi update: every site reads only previous-step values of
//! its four axial neighbours. New values go to owned scratch buffers that
//! are swapped into the state after the full sweep.

use lattice_types::PhysicsParams;

use crate::state::LatticeState;

/// Multiplier applied inside the absorbing border.
pub const BOUNDARY_ABSORPTION: f64 = 0.9;

/// Amplitudes at or below this are ignored by [`WaveRelaxer::wave_center`].
pub const WAVE_CENTER_CUTOFF: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct WaveRelaxer {
    pub damping: f64,
    next_real: Vec<f64>,
    next_imag: Vec<f64>,
}

impl WaveRelaxer {
    pub fn new(params: &PhysicsParams) -> Self {
        Self {
            damping: params.em_damping,
            next_real: Vec::new(),
            next_imag: Vec::new(),
        }
    }

    /// One relaxation sweep:
    /// `new = mean(4 neighbours' previous) − damping · previous(site)`.
    pub fn relax(&mut self, state: &mut LatticeState) {
        let n = state.len();
        self.next_real.resize(n, 0.0);
        self.next_imag.resize(n, 0.0);

        for i in 0..n {
            let mut sum_re = 0.0;
            let mut sum_im = 0.0;
            for j in state.axial_neighbors(i) {
                sum_re += state.em_real[j];
                sum_im += state.em_imag[j];
            }
            self.next_real[i] = 0.25 * sum_re - self.damping * state.em_real[i];
            self.next_imag[i] = 0.25 * sum_im - self.damping * state.em_imag[i];
        }

        std::mem::swap(&mut state.em_real, &mut self.next_real);
        std::mem::swap(&mut state.em_imag, &mut self.next_imag);
    }

    /// Σ (re² + im²).
    pub fn energy(state: &LatticeState) -> f64 {
        state
            .em_real
            .iter()
            .zip(&state.em_imag)
            .map(|(re, im)| re * re + im * im)
            .sum()
    }

    /// Amplitude-weighted centroid of site positions, `(0, 0)` when no
    /// site carries a noticeable amplitude.
    pub fn wave_center(state: &LatticeState) -> (f64, f64) {
        let mut total = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..state.len() {
            let amplitude = state.em_amplitude(i);
            if amplitude > WAVE_CENTER_CUTOFF {
                cx += state.pos_x[i] * amplitude;
                cy += state.pos_y[i] * amplitude;
                total += amplitude;
            }
        }
        if total > 0.0 {
            (cx / total, cy / total)
        } else {
            (0.0, 0.0)
        }
    }

    /// Attenuate the field on every site within `border_width` grid cells
    /// of an edge. The grid is toroidal; this still treats the index-space
    /// edges as a frame.
    pub fn apply_absorbing_boundaries(state: &mut LatticeState, border_width: usize) {
        let w = state.width();
        let h = state.height();
        for i in 0..state.len() {
            let x = state.grid_x(i);
            let y = state.grid_y(i);
            let near_edge = x < border_width
                || x + border_width >= w
                || y < border_width
                || y + border_width >= h;
            if near_edge {
                state.em_real[i] *= BOUNDARY_ABSORPTION;
                state.em_imag[i] *= BOUNDARY_ABSORPTION;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relaxer() -> WaveRelaxer {
        WaveRelaxer::new(&PhysicsParams::default())
    }

    #[test]
    fn test_zero_field_stays_zero() {
        let mut s = LatticeState::new(7, 5, 1.0).unwrap();
        let mut r = relaxer();
        for _ in 0..20 {
            r.relax(&mut s);
        }
        assert!(s.em_real.iter().chain(s.em_imag.iter()).all(|&v| v == 0.0));
        assert_eq!(WaveRelaxer::energy(&s), 0.0);
    }

    #[test]
    fn test_relax_uses_previous_values_only() {
        let mut s = LatticeState::new(5, 5, 1.0).unwrap();
        let c = s.index(2, 2);
        s.em_real[c] = 1.0;
        s.em_imag[c] = -2.0;
        let mut r = relaxer();
        r.relax(&mut s);

        assert!((s.em_real[c] + r.damping).abs() < 1e-15);
        assert!((s.em_imag[c] - 2.0 * r.damping).abs() < 1e-15);
        for j in [s.index(3, 2), s.index(1, 2), s.index(2, 3), s.index(2, 1)] {
            assert_eq!(s.em_real[j], 0.25);
            assert_eq!(s.em_imag[j], -0.5);
        }
        // Diagonal sites would be non-zero under an in-place sweep.
        assert_eq!(s.em_real[s.index(3, 3)], 0.0);
    }

    #[test]
    fn test_uniform_field_decays_by_damping() {
        let mut s = LatticeState::new(4, 4, 1.0).unwrap();
        s.em_real.fill(1.0);
        let mut r = relaxer();
        r.relax(&mut s);
        for &v in &s.em_real {
            assert!((v - (1.0 - r.damping)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_wave_center() {
        let mut s = LatticeState::new(5, 5, 1.0).unwrap();
        assert_eq!(WaveRelaxer::wave_center(&s), (0.0, 0.0));
        let (a, b, faint) = (s.index(1, 1), s.index(3, 1), s.index(4, 4));
        s.em_real[a] = 1.0;
        s.em_imag[b] = 1.0;
        s.em_real[faint] = 1e-4;
        let (cx, cy) = WaveRelaxer::wave_center(&s);
        assert!((cx - 2.0).abs() < 1e-12 && (cy - 1.0).abs() < 1e-12, "({cx}, {cy})");
    }

    #[test]
    fn test_absorbing_boundaries_frame() {
        let mut s = LatticeState::new(6, 6, 1.0).unwrap();
        s.em_real.fill(1.0);
        WaveRelaxer::apply_absorbing_boundaries(&mut s, 2);
        for i in 0..s.len() {
            let (x, y) = (s.grid_x(i), s.grid_y(i));
            let edge = x < 2 || x >= 4 || y < 2 || y >= 4;
            let expected = if edge { BOUNDARY_ABSORPTION } else { 1.0 };
            assert_eq!(s.em_real[i], expected, "site ({x}, {y})");
        }
    }

    #[test]
    fn test_absorbing_zero_width_is_noop() {
        let mut s = LatticeState::new(3, 3, 1.0).unwrap();
        s.em_imag.fill(2.0);
        WaveRelaxer::apply_absorbing_boundaries(&mut s, 0);
        assert!(s.em_imag.iter().all(|&v| v == 2.0));
    }
}
