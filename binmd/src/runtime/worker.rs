//! Per-worker timestep loop
//!
//! Every worker owns a static contiguous range of the particle index space
//! and drives it through the three phases of each step:
//!
//! 1. force phase: read-only scan of the 3x3 bin neighborhood of every owned
//!    particle, accumulating accelerations (no locks taken);
//! 2. barrier A, then integration and migration: advance owned particles and
//!    move the ones that changed cell between the lock-guarded bins;
//! 3. barrier B: the next step's force phase is guaranteed a fully migrated,
//!    quiescent bin store.
//!
//! The partition never changes during a run, so the trajectory for a given
//! seed is independent of the worker count up to floating-point summation
//! order.

use std::ops::Range;
use std::sync::{Barrier, Mutex};

use crate::output::SnapshotWriter;

use super::bins::BinStore;
use super::domain::Domain;
use super::grid::BinGrid;
use super::physics;
use super::stats::{LocalStats, StatsAggregator};
use super::store::ParticleStore;

/// Everything a worker needs to borrow from the simulation, bundled so the
/// spawn closures stay compact.
#[derive(Clone, Copy)]
pub(crate) struct WorkerContext<'a> {
    pub grid: &'a BinGrid,
    pub bins: &'a BinStore,
    pub store: &'a ParticleStore,
    pub domain: &'a Domain,
    pub barrier: &'a Barrier,
    pub stats: &'a StatsAggregator,
    pub snapshot: Option<&'a Mutex<SnapshotWriter>>,
    pub num_steps: usize,
    pub save_interval: usize,
    pub diagnostics: bool,
}

/// Contiguous index range owned by one worker: `ceil(n / workers)` particles
/// each, the last range truncated at `n`.
pub(crate) fn partition(num_particles: usize, num_workers: usize, id: usize) -> Range<usize> {
    let per_worker = (num_particles + num_workers - 1) / num_workers;
    let first = (id * per_worker).min(num_particles);
    let last = ((id + 1) * per_worker).min(num_particles);
    first..last
}

pub(crate) struct Worker {
    id: usize,
    range: Range<usize>,
}

impl Worker {
    pub(crate) fn new(id: usize, num_particles: usize, num_workers: usize) -> Self {
        Self {
            id,
            range: partition(num_particles, num_workers, id),
        }
    }

    /// Worker 0 performs the periodic snapshot writes.
    fn is_leader(&self) -> bool {
        self.id == 0
    }

    pub(crate) fn run(&self, ctx: &WorkerContext) {
        let mut local = LocalStats::new();

        for step in 0..ctx.num_steps {
            let mut step_min = 1.0;
            let mut step_sum = 0.0;
            let mut step_pairs = 0usize;

            // Force phase. Positions are stable until barrier A, so bin
            // reads take no locks and neighbor positions are copied freely.
            for i in self.range.clone() {
                // Safety: no position writes are in flight in this phase
                let (px, py) = unsafe { ctx.store.position(i) };
                let mut ax = 0.0;
                let mut ay = 0.0;
                let cell = ctx.grid.cell_id(px, py);
                for neighbor_cell in ctx.grid.neighborhood(cell) {
                    // Safety: no bin writer is active until barrier A
                    for &j in unsafe { ctx.bins.members(neighbor_cell) } {
                        let (nx, ny) = unsafe { ctx.store.position(j) };
                        if let Some(f) = physics::pair_force(px, py, nx, ny) {
                            ax += f.ax;
                            ay += f.ay;
                            if ctx.diagnostics {
                                if let Some(d) = f.dist_norm {
                                    if d < step_min {
                                        step_min = d;
                                    }
                                    step_sum += d;
                                    step_pairs += 1;
                                }
                            }
                        }
                    }
                }
                // Safety: this worker owns particle i
                unsafe { ctx.store.set_accel(i, ax, ay) };
            }

            // All accelerations of this step are complete before any
            // position moves
            ctx.barrier.wait();

            if ctx.diagnostics {
                local.fold_step(step_min, step_sum, step_pairs);
            }

            // Integration and migration phase: owned particles only; the
            // bin locks serialize concurrent migrations into the same cell
            for i in self.range.clone() {
                // Safety: this worker owns particle i and readers are held
                // back until barrier B
                let p = unsafe { ctx.store.particle_mut(i) };
                let old_cell = ctx.grid.cell_id(p.x, p.y);
                physics::integrate(p, ctx.domain);
                let new_cell = ctx.grid.cell_id(p.x, p.y);
                if old_cell != new_cell {
                    ctx.bins.remove(old_cell, i);
                    ctx.bins.add(new_cell, i);
                }
            }

            // All migrations complete before the next step reads any cell
            ctx.barrier.wait();

            if self.is_leader() && step % ctx.save_interval == 0 {
                self.write_snapshot(ctx);
            }
        }

        // Final frame so the run always ends with its last state on disk
        if self.is_leader() {
            self.write_snapshot(ctx);
        }

        if ctx.diagnostics {
            ctx.stats.merge(&local);
        }
    }

    /// Leader-only periodic snapshot.
    ///
    /// Runs outside both barriers, concurrent with the other workers' next
    /// force phase. That phase writes accelerations only; the next position
    /// write sits behind barrier A of the next step, which this thread has
    /// not reached yet, so every serialized position is stable.
    fn write_snapshot(&self, ctx: &WorkerContext) {
        if let Some(snapshot) = ctx.snapshot {
            let positions = (0..ctx.store.len())
                // Safety: see above; no position writer can be active
                .map(|i| unsafe { ctx.store.position(i) })
                .collect::<Vec<_>>();
            let mut writer = snapshot.lock().unwrap();
            if let Err(error) = writer.write_frame(ctx.domain, &positions) {
                log::warn!("snapshot write failed, output may be truncated: {}", error);
            }
        }
    }
}
