//! Simulation domain and the physical constants of the benchmark model

/// Particles per unit area; fixes the domain size for a given particle count.
pub const DENSITY: f64 = 0.0005;
/// Mass of every particle.
pub const MASS: f64 = 0.01;
/// Interaction cutoff radius (also the bin side length).
pub const CUTOFF: f64 = 0.01;
/// Lower clamp on the pair distance inside the force kernel.
pub const MIN_R: f64 = CUTOFF / 100.0;
/// Timestep length.
pub const DT: f64 = 0.0005;

/// Square simulation domain `[0, size] x [0, size]` with reflective walls.
///
/// Immutable for the lifetime of a run.
#[derive(Clone, Copy, Debug)]
pub struct Domain {
    size: f64,
}

impl Domain {
    /// Size the domain so that `n` particles sit at the configured density.
    pub fn for_particle_count(n: usize) -> Self {
        Self {
            size: (DENSITY * n as f64).sqrt(),
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    #[inline(always)]
    pub(crate) fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.size && y >= 0.0 && y <= self.size
    }
}
