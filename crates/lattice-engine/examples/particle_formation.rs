// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Planck Lattice Particle Formation Demo
// ─────────────────────────────────────────────────────────────────────
//! High-energy EM pulse plus a mass concentration at the centre of the
//! lattice; the hot core anneals and is scanned for particles.
//!
//! Run with `RUST_LOG=info` to see the periodic statistics.

use lattice_engine::{EngineConfig, SimulationLoop};
use lattice_physics::LatticeState;
use lattice_types::{LatticeConfig, LatticeResult};

const GRID: usize = 48;
const STEPS: usize = 500;
const REPORT_EVERY: usize = 25;

fn main() -> LatticeResult<()> {
    env_logger::init();

    let mut state = LatticeState::new(GRID, GRID, 1.0)?;
    let c = GRID as f64 / 2.0;
    state.add_em_pulse(c, c, 5.0, 8.0, 3.0);
    state.add_mass_concentration(c, c, 5.0, 10.0);

    let cfg = EngineConfig {
        velocity_damping: 0.005,
        ..EngineConfig::default()
    };
    let mut sim = SimulationLoop::new(state, LatticeConfig::default(), cfg)?;

    for step in 1..=STEPS {
        let log = sim.step();
        if step % REPORT_EVERY == 0 || step == STEPS {
            sim.log_statistics();
            log::info!(
                "  KE={:.5} PE={:.5} EM={:.3} annealing={} T̄={:.3} particles={}",
                log.kinetic_energy,
                log.potential_energy,
                log.em_energy,
                log.annealing_sites,
                log.average_temperature,
                log.particles
            );
        }
        if !log.finite {
            log::error!("Lattice went non-finite at step {step}; stopping");
            break;
        }
    }
    Ok(())
}
