//! Particle state and initial placement

use rand::Rng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;

use super::domain::Domain;

/// Handle identifying a particle for the lifetime of a run.
///
/// Handles are indices into the particle store and never change, which is
/// what lets the bin store track membership without holding references.
pub type ParticleHandle = usize;

/// Full state of a single particle.
#[derive(Clone, Copy, Debug, Default)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub ax: f64,
    pub ay: f64,
}

/// Place `n` particles on a jittered-free lattice with random velocities.
///
/// Particles occupy distinct sites of an `sx` by `sy` lattice spanning the
/// domain, with the site assignment shuffled so that particle index carries
/// no spatial meaning. Velocities are uniform in `[-1, 1)`. Fully
/// deterministic for a given seed.
pub fn seed_particles(n: usize, domain: &Domain, seed: u64) -> Vec<Particle> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let size = domain.size();

    let sx = (n as f64).sqrt().ceil() as usize;
    let sy = (n + sx - 1) / sx;

    // Partial Fisher-Yates: draw n distinct lattice sites in random order
    let mut shuffle = (0..n).collect::<Vec<_>>();
    let velocity = Uniform::new(-1.0, 1.0);
    (0..n)
        .map(|i| {
            let j = rng.gen_range(0..n - i);
            let k = shuffle[j];
            shuffle[j] = shuffle[n - i - 1];
            Particle {
                x: size * (1.0 + (k % sx) as f64) / (1.0 + sx as f64),
                y: size * (1.0 + (k / sx) as f64) / (1.0 + sy as f64),
                vx: velocity.sample(&mut rng),
                vy: velocity.sample(&mut rng),
                ax: 0.0,
                ay: 0.0,
            }
        })
        .collect()
}
