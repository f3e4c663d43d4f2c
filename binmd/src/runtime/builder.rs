//! Simulation builder

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::output::SnapshotWriter;

use super::{
    particle::seed_particles, stats::StatsAggregator, BinGrid, BinStore, Domain, ParticleStore,
    Simulation,
};

/// Default placement seed; override for independent runs.
pub const DEFAULT_SEED: u64 = 12345678910;

/// Builder for [`Simulation`] with benchmark default values.
pub struct SimulationBuilder {
    num_particles: usize,
    num_workers: usize,
    num_steps: usize,
    save_interval: usize,
    seed: u64,
    diagnostics: bool,
    snapshot_path: Option<PathBuf>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self {
            num_particles: 1000,
            num_workers: 2,
            num_steps: 1000,
            save_interval: 10,
            seed: DEFAULT_SEED,
            diagnostics: true,
            snapshot_path: None,
        }
    }

    pub fn with_particles(mut self, num_particles: usize) -> Self {
        self.num_particles = num_particles;
        self
    }

    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    pub fn with_save_interval(mut self, save_interval: usize) -> Self {
        self.save_interval = save_interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Disabling diagnostics turns off distance statistics and snapshot
    /// output; the computed trajectory is unaffected.
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_snapshot_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Seed the particles, size the grid and bin everything for step 0.
    pub fn build(self) -> Result<Simulation> {
        if self.num_particles == 0 {
            return Err(anyhow!("particle count must be positive"));
        }
        if self.num_workers == 0 {
            return Err(anyhow!("worker count must be positive"));
        }
        if self.save_interval == 0 {
            return Err(anyhow!("save interval must be positive"));
        }

        let domain = Domain::for_particle_count(self.num_particles);
        let grid = BinGrid::new(&domain);
        log::debug!(
            "domain size {}, {} cells per row",
            domain.size(),
            grid.cells_per_row()
        );

        let particles = seed_particles(self.num_particles, &domain, self.seed);
        let bins = BinStore::new(grid.num_cells(), self.num_particles);
        for (handle, p) in particles.iter().enumerate() {
            bins.add(grid.cell_id(p.x, p.y), handle);
        }

        // A snapshot file that cannot be opened disables snapshots, nothing
        // else; the simulation result does not depend on it
        let snapshot = match self.snapshot_path {
            Some(path) if self.diagnostics => match SnapshotWriter::create(&path) {
                Ok(writer) => Some(Mutex::new(writer)),
                Err(error) => {
                    log::warn!("cannot open snapshot file {}: {}", path.display(), error);
                    None
                }
            },
            _ => None,
        };

        Ok(Simulation {
            domain,
            grid,
            store: ParticleStore::new(particles),
            bins,
            num_workers: self.num_workers,
            num_steps: self.num_steps,
            save_interval: self.save_interval,
            diagnostics: self.diagnostics,
            snapshot,
            stats: StatsAggregator::new(),
        })
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
