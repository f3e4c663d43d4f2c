//! binmd - short-range pairwise particle dynamics on a uniform bin grid
//!
//! The simulation advances a fixed set of 2D particles through a fixed number
//! of timesteps. Interactions are cut off at a fixed radius, and a uniform
//! grid with cell side equal to the cutoff reduces the neighbor search to the
//! 3x3 cell neighborhood of each particle. The per-step work is carried by a
//! fixed pool of worker threads that rendezvous at two barriers per step, so
//! that all force reads of step t see the bin state left behind by step t-1
//! and all migrations of step t are complete before step t+1 reads.

pub mod output;
pub mod runtime;
