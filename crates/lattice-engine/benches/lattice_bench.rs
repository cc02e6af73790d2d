// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the lattice hot paths.
//!
//! Covers:
//!   - Force accumulation (spacing, gravity, clamp)
//!   - Integration and damping
//!   - EM wave relaxation
//!   - Neighbour index rebuild (O(N²))
//!   - Annealing sweep and particle detection
//!   - Full simulation step

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lattice_emergence::{AnnealingOptimizer, ParticleClassifier};
use lattice_engine::{EngineConfig, SimulationLoop};
use lattice_physics::{ForceField, Integrator, LatticeState, NeighborIndex, WaveRelaxer};
use lattice_types::LatticeConfig;

const SIDE: usize = 64;

// ── Helpers ───────────────────────────────────────────────────────────

fn make_state() -> LatticeState {
    let mut s = LatticeState::new(SIDE, SIDE, 1.0).unwrap();
    let c = SIDE as f64 / 2.0;
    s.add_mass_concentration(c, c, 5.0, 6.0);
    s.add_em_pulse(c, c, 5.0, 8.0, 3.0);
    for i in 0..s.len() {
        s.pos_x[i] += (i as f64 * 0.37).sin() * 0.05;
        s.pos_y[i] += (i as f64 * 0.91).cos() * 0.05;
    }
    s
}

fn make_index(state: &LatticeState) -> NeighborIndex {
    let mut idx = NeighborIndex::new(LatticeConfig::default().physics.neighbor_radius);
    idx.rebuild(state);
    idx
}

// ── Physics benchmarks ───────────────────────────────────────────────

fn bench_spacing_forces(c: &mut Criterion) {
    let cfg = LatticeConfig::default();
    let field = ForceField::new(&cfg.physics);
    let mut s = make_state();
    c.bench_function("spacing_forces_64x64", |b| {
        b.iter(|| {
            s.clear_forces();
            field.spacing_forces(black_box(&mut s));
        })
    });
}

fn bench_gravity_forces(c: &mut Criterion) {
    let cfg = LatticeConfig::default();
    let field = ForceField::new(&cfg.physics);
    let mut s = make_state();
    c.bench_function("gravity_forces_64x64", |b| {
        b.iter(|| {
            s.clear_forces();
            field.gravity_forces(black_box(&mut s));
        })
    });
}

fn bench_normalize_forces(c: &mut Criterion) {
    let mut s = make_state();
    for (i, f) in s.force_x.iter_mut().enumerate() {
        *f = (i % 37) as f64;
    }
    c.bench_function("normalize_forces_64x64", |b| {
        b.iter(|| ForceField::normalize_forces(black_box(&mut s), 10.0))
    });
}

fn bench_integrate(c: &mut Criterion) {
    let cfg = LatticeConfig::default();
    let integ = Integrator::new(&cfg.physics);
    let mut s = make_state();
    c.bench_function("integrate_damp_64x64", |b| {
        b.iter(|| {
            integ.integrate(black_box(&mut s), 1e-6);
            Integrator::apply_damping(&mut s, 0.001);
        })
    });
}

fn bench_wave_relax(c: &mut Criterion) {
    let cfg = LatticeConfig::default();
    let mut relaxer = WaveRelaxer::new(&cfg.physics);
    let mut s = make_state();
    c.bench_function("wave_relax_64x64", |b| {
        b.iter(|| relaxer.relax(black_box(&mut s)))
    });
}

fn bench_neighbor_rebuild(c: &mut Criterion) {
    let s = make_state();
    let mut idx = NeighborIndex::new(1.5);
    c.bench_function("neighbor_rebuild_64x64", |b| {
        b.iter(|| idx.rebuild(black_box(&s)))
    });
}

// ── Emergence benchmarks ─────────────────────────────────────────────

fn bench_annealing_sweep(c: &mut Criterion) {
    let cfg = LatticeConfig::default();
    let mut s = make_state();
    let idx = make_index(&s);
    let mut opt = AnnealingOptimizer::new(&cfg);
    opt.identify_regions(&mut s);
    c.bench_function("annealing_sweep_64x64", |b| {
        b.iter(|| opt.sweep(black_box(&mut s), &idx))
    });
}

fn bench_particle_detect(c: &mut Criterion) {
    let cfg = LatticeConfig::default();
    let mut s = make_state();
    s.stability_history.fill(cfg.particles.stability_threshold + 1);
    let idx = make_index(&s);
    let mut classifier = ParticleClassifier::new(&cfg.particles);
    c.bench_function("particle_detect_64x64", |b| {
        b.iter(|| classifier.detect(black_box(&s), &idx))
    });
}

// ── Engine benchmarks ────────────────────────────────────────────────

fn bench_engine_step(c: &mut Criterion) {
    let mut sim =
        SimulationLoop::new(make_state(), LatticeConfig::default(), EngineConfig::physics_only())
            .unwrap();
    c.bench_function("engine_step_physics_64x64", |b| b.iter(|| sim.step()));
}

fn bench_engine_step_full(c: &mut Criterion) {
    let mut cfg = EngineConfig::default();
    cfg.neighbor_every = 0;
    let mut sim = SimulationLoop::new(make_state(), LatticeConfig::default(), cfg).unwrap();
    c.bench_function("engine_step_full_64x64", |b| b.iter(|| sim.step()));
}

criterion_group!(
    physics,
    bench_spacing_forces,
    bench_gravity_forces,
    bench_normalize_forces,
    bench_integrate,
    bench_wave_relax,
    bench_neighbor_rebuild,
);

criterion_group!(emergence, bench_annealing_sweep, bench_particle_detect,);

criterion_group!(engine, bench_engine_step, bench_engine_step_full,);

criterion_main!(physics, emergence, engine);
