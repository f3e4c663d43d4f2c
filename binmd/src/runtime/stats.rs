//! Interaction distance diagnostics
//!
//! Each worker folds its per-step distance samples into a `LocalStats` and
//! merges once into the shared aggregator when its last step is done, so the
//! mutex is touched exactly once per worker per run. Diagnostics never feed
//! back into the dynamics; a run with them disabled computes the exact same
//! trajectory.

use std::sync::Mutex;

/// Per-worker running diagnostics, accumulated across all steps the worker
/// participates in. Distances are in units of the cutoff.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LocalStats {
    /// Smallest pair distance seen so far.
    min_norm: f64,
    /// Sum of per-step average distances.
    avg_sum: f64,
    /// Number of steps that had at least one interacting pair.
    steps_with_pairs: usize,
}

impl LocalStats {
    pub(crate) fn new() -> Self {
        Self {
            min_norm: 1.0,
            avg_sum: 0.0,
            steps_with_pairs: 0,
        }
    }

    /// Fold one finished step: `step_min` is the smallest sample of the step,
    /// `step_sum`/`step_pairs` the sum and count of all samples.
    pub(crate) fn fold_step(&mut self, step_min: f64, step_sum: f64, step_pairs: usize) {
        if step_pairs > 0 {
            self.avg_sum += step_sum / step_pairs as f64;
            self.steps_with_pairs += 1;
        }
        if step_min < self.min_norm {
            self.min_norm = step_min;
        }
    }

    /// Average of the per-step averages.
    fn avg_norm(&self) -> f64 {
        if self.steps_with_pairs > 0 {
            self.avg_sum / self.steps_with_pairs as f64
        } else {
            0.0
        }
    }
}

/// Final merged diagnostics of a run.
#[derive(Clone, Copy, Debug)]
pub struct RunStats {
    /// Minimum pair distance over the whole run, in units of the cutoff.
    /// Values below 0.4 indicate a broken neighbor search or force law.
    pub min_norm: f64,
    /// Mean observed pair distance, in units of the cutoff. Healthy runs sit
    /// around 0.95; values below 0.8 mean most particles never interact.
    pub avg_norm: f64,
}

/// Shared sink the workers merge their local stats into.
pub(crate) struct StatsAggregator {
    inner: Mutex<(f64, f64)>, // (global min, sum of per-worker averages)
}

impl StatsAggregator {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new((1.0, 0.0)),
        }
    }

    /// Merge one worker's accumulated stats. Called once per worker.
    pub(crate) fn merge(&self, local: &LocalStats) {
        let mut inner = self.inner.lock().unwrap();
        if local.min_norm < inner.0 {
            inner.0 = local.min_norm;
        }
        inner.1 += local.avg_norm();
    }

    /// Final result; the average is the mean over all workers' averages.
    pub(crate) fn finish(&self, num_workers: usize) -> RunStats {
        let inner = self.inner.lock().unwrap();
        RunStats {
            min_norm: inner.0,
            avg_norm: inner.1 / num_workers as f64,
        }
    }
}
