//! Check the bin store invariants after concurrent stepping: no particle is
//! lost or duplicated across migrations, every slot points back at its
//! particle, and every particle sits in the cell its position maps to.

use binmd::runtime::SimulationBuilder;

const NUM_PARTICLES: usize = 300;
const NUM_WORKERS: usize = 4;
const SEED: u64 = 987654321;

fn run_and_verify(num_steps: usize) {
    let mut simulation = SimulationBuilder::new()
        .with_particles(NUM_PARTICLES)
        .with_workers(NUM_WORKERS)
        .with_steps(num_steps)
        .with_seed(SEED)
        .build()
        .unwrap();
    simulation.run().unwrap();
    simulation
        .check_invariants()
        .unwrap_or_else(|e| panic!("invariants broken after {} steps: {}", num_steps, e));
}

#[test]
fn bins_are_consistent_at_setup() {
    let mut simulation = SimulationBuilder::new()
        .with_particles(NUM_PARTICLES)
        .with_workers(NUM_WORKERS)
        .with_seed(SEED)
        .build()
        .unwrap();
    simulation.check_invariants().unwrap();
}

#[test]
fn bins_stay_consistent_under_migration() {
    for num_steps in [1, 2, 5, 10, 50, 200] {
        run_and_verify(num_steps);
    }
}

#[test]
fn bins_stay_consistent_with_one_worker() {
    let mut simulation = SimulationBuilder::new()
        .with_particles(NUM_PARTICLES)
        .with_workers(1)
        .with_steps(100)
        .with_seed(SEED)
        .build()
        .unwrap();
    simulation.run().unwrap();
    simulation.check_invariants().unwrap();
}

#[test]
fn bins_stay_consistent_with_uneven_partition() {
    // worker count that does not divide the particle count
    let mut simulation = SimulationBuilder::new()
        .with_particles(NUM_PARTICLES + 1)
        .with_workers(7)
        .with_steps(50)
        .with_seed(SEED)
        .build()
        .unwrap();
    simulation.run().unwrap();
    simulation.check_invariants().unwrap();
}
