//! Pair force kernel and the per-particle integrator

use super::domain::{Domain, CUTOFF, DT, MASS, MIN_R};
use super::particle::Particle;

/// One pairwise interaction sample.
pub(crate) struct PairForce {
    /// Acceleration contribution on the target particle.
    pub ax: f64,
    pub ay: f64,
    /// Pair distance in units of the cutoff, for the diagnostics path.
    /// `None` for the degenerate self-pair (zero separation).
    pub dist_norm: Option<f64>,
}

/// Short-range repulsive force of `neighbor` at `(nx, ny)` on a target
/// particle at `(px, py)`. Returns `None` beyond the cutoff.
///
/// Positions are taken by value: during the force phase the target particle
/// is enumerated as a member of its own cell, so the kernel must not hold a
/// reference into the particle store.
#[inline(always)]
pub(crate) fn pair_force(px: f64, py: f64, nx: f64, ny: f64) -> Option<PairForce> {
    let dx = nx - px;
    let dy = ny - py;
    let r2 = dx * dx + dy * dy;
    if r2 > CUTOFF * CUTOFF {
        return None;
    }
    let dist_norm = if r2 != 0.0 {
        Some(r2.sqrt() / CUTOFF)
    } else {
        None
    };
    // Very short-range repulsion; clamp r to keep the coefficient finite
    let r2 = r2.max(MIN_R * MIN_R);
    let r = r2.sqrt();
    let coef = (1.0 - CUTOFF / r) / r2 / MASS;
    Some(PairForce {
        ax: coef * dx,
        ay: coef * dy,
        dist_norm,
    })
}

/// Advance one particle by one timestep from its accumulated acceleration,
/// reflecting it off the domain walls.
///
/// Symplectic Euler: the velocity update feeds the position update of the
/// same step, which conserves energy well enough for this model.
pub(crate) fn integrate(p: &mut Particle, domain: &Domain) {
    let size = domain.size();
    p.vx += p.ax * DT;
    p.vy += p.ay * DT;
    p.x += p.vx * DT;
    p.y += p.vy * DT;
    while p.x < 0.0 || p.x > size {
        p.x = if p.x < 0.0 { -p.x } else { 2.0 * size - p.x };
        p.vx = -p.vx;
    }
    while p.y < 0.0 || p.y > size {
        p.y = if p.y < 0.0 { -p.y } else { 2.0 * size - p.y };
        p.vy = -p.vy;
    }
}
