//! All things related to running binmd simulations

use std::sync::{Barrier, Mutex};

use anyhow::{anyhow, Context, Result};

mod bins;
mod builder;
mod domain;
mod grid;
mod particle;
mod physics;
mod stats;
mod store;
mod worker;

pub use bins::*;
pub use builder::*;
pub use domain::*;
pub use grid::*;
pub use particle::*;
pub use stats::RunStats;
pub use store::*;

use crate::output::SnapshotWriter;
use worker::{Worker, WorkerContext};

/// A fully set up simulation run: the single owner of all shared state the
/// workers touch. Construct via [`SimulationBuilder`].
pub struct Simulation {
    pub(crate) domain: Domain,
    pub(crate) grid: BinGrid,
    pub(crate) store: ParticleStore,
    pub(crate) bins: BinStore,
    pub(crate) num_workers: usize,
    pub(crate) num_steps: usize,
    pub(crate) save_interval: usize,
    pub(crate) diagnostics: bool,
    pub(crate) snapshot: Option<Mutex<SnapshotWriter>>,
    pub(crate) stats: stats::StatsAggregator,
}

impl Simulation {
    pub fn num_particles(&self) -> usize {
        self.store.len()
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn grid(&self) -> &BinGrid {
        &self.grid
    }

    /// Current particle states (setup order; handles are indices).
    pub fn particles(&mut self) -> &[Particle] {
        self.store.as_slice()
    }

    /// Run the configured number of steps to completion.
    ///
    /// One long-lived task per worker is spawned on a pool of exactly
    /// `num_workers` threads; the tasks rendezvous at a shared barrier twice
    /// per step. Returns the merged distance diagnostics, or `None` when
    /// diagnostics are disabled.
    pub fn run(&mut self) -> Result<Option<RunStats>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_workers)
            .build()
            .context("cannot create worker thread pool")?;
        let barrier = Barrier::new(self.num_workers);

        log::info!(
            "running {} particles on {} workers for {} steps ({} cells)",
            self.store.len(),
            self.num_workers,
            self.num_steps,
            self.grid.num_cells()
        );

        let ctx = WorkerContext {
            grid: &self.grid,
            bins: &self.bins,
            store: &self.store,
            domain: &self.domain,
            barrier: &barrier,
            stats: &self.stats,
            snapshot: self.snapshot.as_ref(),
            num_steps: self.num_steps,
            save_interval: self.save_interval,
            diagnostics: self.diagnostics,
        };
        let num_particles = self.store.len();
        let num_workers = self.num_workers;

        // One task per pool thread; every task blocks on the barrier each
        // step, so the pool never multiplexes two workers onto one thread
        pool.scope(|s| {
            for id in 0..num_workers {
                s.spawn(move |_| {
                    Worker::new(id, num_particles, num_workers).run(&ctx);
                });
            }
        });

        if self.diagnostics {
            Ok(Some(self.stats.finish(self.num_workers)))
        } else {
            Ok(None)
        }
    }

    /// Verify the bin store invariants; cheap enough to call between test
    /// steps, not meant for the hot loop.
    ///
    /// Checks, for the current state:
    /// - conservation: the cell populations sum to the particle count and no
    ///   handle appears twice;
    /// - slot consistency: every recorded slot points back at its handle;
    /// - membership: every particle sits in the cell its position maps to.
    pub fn check_invariants(&mut self) -> Result<()> {
        let num_particles = self.store.len();
        let mut seen = vec![false; num_particles];
        let mut total = 0usize;
        for cell in 0..self.bins.num_cells() {
            for (idx, handle) in self.bins.cell_members(cell).into_iter().enumerate() {
                total += 1;
                if seen[handle] {
                    return Err(anyhow!("particle {} is binned more than once", handle));
                }
                seen[handle] = true;
                let slot = self.bins.slot_of(handle);
                if slot != idx {
                    return Err(anyhow!(
                        "particle {} has slot {} but sits at index {} of cell {}",
                        handle,
                        slot,
                        idx,
                        cell
                    ));
                }
                let p = &self.store.as_slice()[handle];
                if !self.domain.contains(p.x, p.y) {
                    return Err(anyhow!(
                        "particle {} escaped the domain: ({}, {})",
                        handle,
                        p.x,
                        p.y
                    ));
                }
                let mapped = self.grid.cell_id(p.x, p.y);
                if mapped != cell {
                    return Err(anyhow!(
                        "particle {} at ({}, {}) maps to cell {} but is binned in cell {}",
                        handle,
                        p.x,
                        p.y,
                        mapped,
                        cell
                    ));
                }
            }
        }
        if total != num_particles {
            return Err(anyhow!(
                "bins hold {} particles, expected {}",
                total,
                num_particles
            ));
        }
        Ok(())
    }
}
