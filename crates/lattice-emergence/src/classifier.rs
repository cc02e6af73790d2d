// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Particle Classifier
// ─────────────────────────────────────────────────────────────────────
//! Detection, classification, and lifecycle of emergent particles.
//!
//! A detection pass seeds at energetic sites whose annealing history is
//! long enough, grows each seed over the neighbour graph by breadth-first
//! flood fill, classifies the resulting cluster by its internal
//! coordination, and keeps it only if it is self-sustaining. The tracked
//! list is then aged and replaced wholesale by the new result.

use std::collections::{BTreeSet, VecDeque};

use lattice_physics::{LatticeState, NeighborIndex};
use lattice_types::{PackingType, ParticleParams};

use crate::pattern::ParticlePattern;

/// Counters of one [`ParticleClassifier::detect`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionReport {
    /// Sites that qualified as flood-fill seeds.
    pub seeds: usize,
    /// Components smaller than the minimum particle size.
    pub discarded_small: usize,
    /// Components large enough to be classified.
    pub candidates: usize,
    /// Candidates that passed the self-sustaining gate.
    pub retained: usize,
}

#[derive(Debug, Clone)]
pub struct ParticleClassifier {
    params: ParticleParams,
    next_id: u64,
    particles: Vec<ParticlePattern>,
}

impl ParticleClassifier {
    pub fn new(params: &ParticleParams) -> Self {
        Self {
            params: params.clone(),
            next_id: 1,
            particles: Vec::new(),
        }
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    /// Currently tracked particles.
    pub fn particles(&self) -> &[ParticlePattern] {
        &self.particles
    }

    pub fn total_particle_sites(&self) -> usize {
        self.particles.iter().map(ParticlePattern::size).sum()
    }

    /// Full pass: find candidates, keep the self-sustaining ones, then
    /// age and replace the tracked list.
    pub fn detect(&mut self, state: &LatticeState, neighbors: &NeighborIndex) -> DetectionReport {
        let (candidates, mut report) = self.scan(state, neighbors);
        let retained: Vec<ParticlePattern> = candidates
            .into_iter()
            .filter(ParticlePattern::is_self_sustaining)
            .collect();
        report.retained = retained.len();
        if report.retained > 0 {
            log::info!(
                "Retained {} particle(s) from {} candidate cluster(s)",
                report.retained,
                report.candidates
            );
        }
        self.update_particle_list(retained);
        report
    }

    /// All clusters of at least `min_size` sites, before the
    /// self-sustaining gate. Patterns are freshly created, so the caller
    /// owns their aging.
    pub fn find_candidates(
        &mut self,
        state: &LatticeState,
        neighbors: &NeighborIndex,
    ) -> Vec<ParticlePattern> {
        self.scan(state, neighbors).0
    }

    fn scan(
        &mut self,
        state: &LatticeState,
        neighbors: &NeighborIndex,
    ) -> (Vec<ParticlePattern>, DetectionReport) {
        let n = state.len();
        let threshold = self.params.threshold;
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();
        let mut candidates = Vec::new();
        let mut report = DetectionReport::default();

        for seed in 0..n {
            if visited[seed] {
                continue;
            }
            if !(state.energy_density[seed] > threshold
                && state.stability_history[seed] > self.params.stability_threshold)
            {
                continue;
            }
            report.seeds += 1;

            let mut members = BTreeSet::new();
            members.insert(seed);
            visited[seed] = true;
            queue.push_back(seed);
            while let Some(current) = queue.pop_front() {
                for &j in neighbors.neighbors(current) {
                    if !visited[j] && state.energy_density[j] > threshold {
                        visited[j] = true;
                        members.insert(j);
                        queue.push_back(j);
                    }
                }
            }

            if members.len() < self.params.min_size {
                report.discarded_small += 1;
                continue;
            }
            report.candidates += 1;
            candidates.push(self.build_pattern(seed, members, state, neighbors));
        }

        (candidates, report)
    }

    fn build_pattern(
        &mut self,
        seed: usize,
        members: BTreeSet<usize>,
        state: &LatticeState,
        neighbors: &NeighborIndex,
    ) -> ParticlePattern {
        let total_energy: f64 = members.iter().map(|&i| state.energy_density[i]).sum();

        let mut internal_links = 0usize;
        let mut boundary_energy = 0.0;
        let mut boundary_count = 0usize;
        for &site in &members {
            let mut on_boundary = false;
            for j in neighbors.neighbors(site) {
                if members.contains(j) {
                    internal_links += 1;
                } else {
                    on_boundary = true;
                }
            }
            if on_boundary {
                boundary_energy += state.energy_density[site];
                boundary_count += 1;
            }
        }

        let mean_coordination = (internal_links as f64 / members.len() as f64).round();
        let packing = PackingType::from_coordination(mean_coordination as u32);
        let stability = if boundary_count == 0 {
            f64::INFINITY
        } else {
            boundary_energy / boundary_count as f64
        };

        let id = self.next_id;
        self.next_id += 1;
        ParticlePattern::new(id, seed, members, total_energy, stability, packing)
    }

    /// Age every tracked particle once, then replace the tracked list with
    /// `next`. Returns the aged, retired list.
    pub fn update_particle_list(&mut self, next: Vec<ParticlePattern>) -> Vec<ParticlePattern> {
        for p in &mut self.particles {
            p.age_one_timestep();
        }
        std::mem::replace(&mut self.particles, next)
    }

    /// Pull each member's EM field toward the mean phase of its internal
    /// neighbours. Updates are applied in place, in ascending site order.
    pub fn propagate_internal_resonance(&self, state: &mut LatticeState, neighbors: &NeighborIndex) {
        let strength = self.params.resonance_strength;
        for particle in &self.particles {
            for &site in particle.members() {
                let mut phase_sum = 0.0;
                let mut internal = 0usize;
                for &j in neighbors.neighbors(site) {
                    if particle.contains(j) {
                        phase_sum += state.em_phase(j);
                        internal += 1;
                    }
                }
                if internal == 0 {
                    continue;
                }
                let avg_phase = phase_sum / internal as f64;
                let coupling = strength * state.em_amplitude(site);
                state.em_real[site] += coupling * avg_phase.cos();
                state.em_imag[site] += coupling * avg_phase.sin();
            }
        }
    }

    pub fn log_statistics(&self, state: &LatticeState) {
        if self.particles.is_empty() {
            return;
        }
        log::info!(
            "Particles detected: {} ({} sites)",
            self.particles.len(),
            self.total_particle_sites()
        );
        for p in &self.particles {
            match p.center_of_mass(state) {
                Some((cx, cy)) => log::info!("  {p}, COM: ({cx:.2}, {cy:.2})"),
                None => log::info!("  {p}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────

    fn lattice(w: usize, h: usize) -> (LatticeState, NeighborIndex) {
        let state = LatticeState::new(w, h, 1.0).unwrap();
        let mut idx = NeighborIndex::new(1.5);
        idx.rebuild(&state);
        (state, idx)
    }

    fn classifier() -> ParticleClassifier {
        ParticleClassifier::new(&ParticleParams::default())
    }

    /// Energise a `size × size` block with its corner at `(x0, y0)` and
    /// mark `(sx, sy)` as a stable seed.
    fn block(state: &mut LatticeState, x0: usize, y0: usize, size: usize, seed: (usize, usize)) {
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                let i = state.index(x, y);
                state.energy_density[i] = 5.0;
            }
        }
        let s = state.index(seed.0, seed.1);
        state.stability_history[s] = 101;
    }

    // ── Detection ─────────────────────────────────────────────────────

    #[test]
    fn test_block_candidate_properties() {
        let (mut s, idx) = lattice(7, 7);
        block(&mut s, 2, 2, 3, (3, 3));
        let mut c = classifier();
        let found = c.find_candidates(&s, &idx);
        assert_eq!(found.len(), 1);
        let p = &found[0];
        assert_eq!(p.size(), 9);
        assert_eq!(p.center_index(), s.index(3, 3));
        assert!((p.total_energy() - 45.0).abs() < 1e-12);
        // Corners 3, edges 5, centre 8 → 40/9 ≈ 4.44 → 4.
        assert_eq!(p.packing(), PackingType::Square2D);
        // Eight boundary members, each at 5.0.
        assert!((p.stability() - 5.0).abs() < 1e-12);
        assert_eq!(p.age(), 0);
    }

    #[test]
    fn test_seed_requires_stability_history() {
        let (mut s, idx) = lattice(7, 7);
        block(&mut s, 2, 2, 3, (3, 3));
        let seed = s.index(3, 3);
        s.stability_history[seed] = 100;
        let mut c = classifier();
        assert!(c.find_candidates(&s, &idx).is_empty());
    }

    #[test]
    fn test_small_components_discarded() {
        let (mut s, idx) = lattice(8, 8);
        // Two-site cluster.
        let a = s.index(1, 1);
        let b = s.index(2, 1);
        s.energy_density[a] = 5.0;
        s.energy_density[b] = 5.0;
        s.stability_history[a] = 200;
        s.stability_history[b] = 200;
        // Isolated single site.
        let lone = s.index(5, 5);
        s.energy_density[lone] = 5.0;
        s.stability_history[lone] = 200;

        let mut c = classifier();
        let report = c.detect(&s, &idx);
        assert_eq!(report.seeds, 2);
        assert_eq!(report.discarded_small, 2);
        assert_eq!(report.candidates, 0);
        assert!(c.particles().is_empty());
    }

    #[test]
    fn test_isolated_cluster_has_infinite_stability() {
        // 3×3 block on a 3×3 torus: every neighbour is inside.
        let (mut s, idx) = lattice(3, 3);
        block(&mut s, 0, 0, 3, (1, 1));
        let mut c = classifier();
        let found = c.find_candidates(&s, &idx);
        assert_eq!(found.len(), 1);
        assert!(found[0].stability().is_infinite());
        assert_eq!(found[0].packing(), PackingType::BodyCentered);
    }

    #[test]
    fn test_fresh_candidates_not_retained() {
        let (mut s, idx) = lattice(7, 7);
        block(&mut s, 2, 2, 3, (3, 3));
        let mut c = classifier();
        let report = c.detect(&s, &idx);
        assert_eq!(report.candidates, 1);
        assert_eq!(report.retained, 0);
        assert!(c.particles().is_empty());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let (mut s, idx) = lattice(12, 6);
        block(&mut s, 1, 1, 3, (2, 2));
        block(&mut s, 7, 1, 3, (8, 2));
        let mut c = classifier();
        let first = c.find_candidates(&s, &idx);
        let second = c.find_candidates(&s, &idx);
        let ids: Vec<u64> = first.iter().chain(&second).map(ParticlePattern::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────

    #[test]
    fn test_update_ages_then_replaces() {
        let mut c = classifier();
        let p = ParticlePattern::new(9, 0, [0, 1, 2], 10.0, 10.0, PackingType::Custom);
        let retired = c.update_particle_list(vec![p]);
        assert!(retired.is_empty());
        assert_eq!(c.particles().len(), 1);
        assert_eq!(c.total_particle_sites(), 3);

        let retired = c.update_particle_list(Vec::new());
        assert_eq!(retired.len(), 1);
        assert_eq!(retired[0].age(), 1);
        assert!(c.particles().is_empty());
    }

    #[test]
    fn test_resonance_aligns_phase() {
        let (mut s, idx) = lattice(5, 5);
        let (a, b, d) = (s.index(0, 0), s.index(1, 0), s.index(2, 0));
        s.em_imag[a] = 1.0;
        s.em_imag[b] = 2.0;
        s.em_imag[d] = 1.0;
        let mut c = classifier();
        c.update_particle_list(vec![ParticlePattern::new(
            1,
            b,
            [a, b, d],
            10.0,
            1.0,
            PackingType::Custom,
        )]);
        c.propagate_internal_resonance(&mut s, &idx);

        for (site, expected) in [(a, 1.1), (b, 2.2), (d, 1.1)] {
            assert!((s.em_imag[site] - expected).abs() < 1e-12, "site {site}: {}", s.em_imag[site]);
            assert!(s.em_real[site].abs() < 1e-12);
        }
        // Non-members untouched.
        assert_eq!(s.em_imag[s.index(3, 0)], 0.0);
    }

    #[test]
    fn test_repeated_resonance_grows_amplitude() {
        let (mut s, idx) = lattice(5, 5);
        let members = [s.index(0, 0), s.index(1, 0), s.index(2, 0)];
        for &i in &members {
            s.em_imag[i] = 1.0;
        }
        let mut c = classifier();
        c.update_particle_list(vec![ParticlePattern::new(
            1,
            members[1],
            members,
            10.0,
            1.0,
            PackingType::Custom,
        )]);

        // In-phase members are not renormalised: each pass adds 10%.
        let mut expected = 1.0;
        for _ in 0..5 {
            c.propagate_internal_resonance(&mut s, &idx);
            expected *= 1.1;
            for &i in &members {
                let amp = s.em_amplitude(i);
                assert!((amp - expected).abs() < 1e-9, "site {i}: |E|={amp} expected {expected}");
            }
        }
        assert!(s.em_amplitude(members[1]) > 1.6);
    }

    #[test]
    fn test_resonance_without_particles_is_noop() {
        let (mut s, idx) = lattice(4, 4);
        s.em_real.fill(0.5);
        classifier().propagate_internal_resonance(&mut s, &idx);
        assert!(s.em_real.iter().all(|&v| v == 0.5));
    }
}
