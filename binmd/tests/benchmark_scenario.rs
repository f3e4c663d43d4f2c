//! Full benchmark scenario: 500 particles on 4 workers for 1000 steps with
//! diagnostics enabled. Verifies the physical sanity thresholds and the
//! shape of the snapshot and summary files.

use std::fs;
use std::path::PathBuf;

use binmd::output::append_summary;
use binmd::runtime::SimulationBuilder;

const NUM_PARTICLES: usize = 500;
const NUM_WORKERS: usize = 4;
const NUM_STEPS: usize = 1000;
const SAVE_INTERVAL: usize = 10;
const SEED: u64 = 12345678910;

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("binmd-scenario-{}-{}", std::process::id(), name));
    path
}

#[test]
fn benchmark_scenario() {
    let snapshot_path = temp_path("snapshot");
    let summary_path = temp_path("summary");
    let _ = fs::remove_file(&summary_path);

    let mut simulation = SimulationBuilder::new()
        .with_particles(NUM_PARTICLES)
        .with_workers(NUM_WORKERS)
        .with_steps(NUM_STEPS)
        .with_save_interval(SAVE_INTERVAL)
        .with_seed(SEED)
        .with_snapshot_path(&snapshot_path)
        .build()
        .unwrap();

    let stats = simulation.run().unwrap().expect("diagnostics are enabled");
    simulation.check_invariants().unwrap();

    // A healthy run keeps particles interacting without overlap: minimum
    // pair distance above 0.4 cutoffs, average above 0.8
    assert!(stats.min_norm > 0.0);
    assert!(
        stats.min_norm > 0.4,
        "minimum distance {} signals a broken neighbor search",
        stats.min_norm
    );
    assert!(
        stats.avg_norm > 0.8,
        "average distance {} signals particles not interacting",
        stats.avg_norm
    );

    // Snapshot: one header line, then one frame per save interval plus the
    // final frame, each of NUM_PARTICLES lines
    let snapshot = fs::read_to_string(&snapshot_path).unwrap();
    let lines = snapshot.lines().collect::<Vec<_>>();
    let frames = NUM_STEPS / SAVE_INTERVAL + 1;
    assert_eq!(lines.len(), 1 + frames * NUM_PARTICLES);
    let header = lines[0].split_whitespace().collect::<Vec<_>>();
    assert_eq!(header[0], "500");
    assert_eq!(header[1], "0.5");
    for line in &lines[1..] {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        assert_eq!(fields.len(), 2);
        for field in fields {
            let value = field.parse::<f64>().unwrap();
            assert!((0.0..=0.5).contains(&value));
        }
    }

    // Summary gains exactly one line "<n> <workers> <seconds>"
    append_summary(&summary_path, NUM_PARTICLES, NUM_WORKERS, 1.5).unwrap();
    let summary = fs::read_to_string(&summary_path).unwrap();
    let summary_lines = summary.lines().collect::<Vec<_>>();
    assert_eq!(summary_lines.len(), 1);
    let fields = summary_lines[0].split_whitespace().collect::<Vec<_>>();
    assert_eq!(fields[0], "500");
    assert_eq!(fields[1], "4");
    assert!(fields[2].parse::<f64>().is_ok());

    fs::remove_file(&snapshot_path).unwrap();
    fs::remove_file(&summary_path).unwrap();
}

#[test]
fn diagnostics_off_suppresses_stats_and_snapshots() {
    let snapshot_path = temp_path("no-output");
    let _ = fs::remove_file(&snapshot_path);

    let mut simulation = SimulationBuilder::new()
        .with_particles(100)
        .with_workers(2)
        .with_steps(20)
        .with_seed(SEED)
        .with_diagnostics(false)
        .with_snapshot_path(&snapshot_path)
        .build()
        .unwrap();

    assert!(simulation.run().unwrap().is_none());
    assert!(!snapshot_path.exists());
}
