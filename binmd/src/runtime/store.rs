//! Root owner of all particle state
//!
//! The store hands out mutable access to disjoint index ranges across worker
//! threads, which the borrow checker cannot express directly. Safety rests on
//! the phase protocol enforced by the step barriers:
//!
//! - every particle has exactly one owning worker for the whole run;
//! - only the owner ever writes a particle, and it writes positions and
//!   velocities only in the migration phase (between barrier A and barrier B);
//! - non-owners read only positions, and only by value, in phases where no
//!   position write can be in flight.

use std::cell::UnsafeCell;

use super::particle::{Particle, ParticleHandle};

pub struct ParticleStore {
    particles: Box<[UnsafeCell<Particle>]>,
}

// Access across threads is fenced by the barrier protocol above.
unsafe impl Sync for ParticleStore {}

impl ParticleStore {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self {
            particles: particles
                .into_iter()
                .map(UnsafeCell::new)
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read a particle's position by value.
    ///
    /// Reads go through the raw pointer without forming a reference, so they
    /// may overlap with concurrent [`Self::set_accel`] writes to the same
    /// particle (disjoint fields).
    ///
    /// # Safety
    /// No write to this particle's position may be concurrent, i.e. the
    /// caller must be in the force phase or be the particle's owner.
    #[inline(always)]
    pub(crate) unsafe fn position(&self, handle: ParticleHandle) -> (f64, f64) {
        let p = self.particles[handle].get();
        ((*p).x, (*p).y)
    }

    /// Store the force-phase result for an owned particle.
    ///
    /// Goes through a raw pointer instead of `&mut` so that concurrent
    /// by-value position reads of the same particle (the self-pair, other
    /// workers scanning a shared cell) race with nothing: only the
    /// acceleration bytes are written.
    ///
    /// # Safety
    /// The caller must be the particle's owning worker, and no concurrent
    /// access to this particle's acceleration may exist.
    #[inline(always)]
    pub(crate) unsafe fn set_accel(&self, handle: ParticleHandle, ax: f64, ay: f64) {
        let p = self.particles[handle].get();
        (*p).ax = ax;
        (*p).ay = ay;
    }

    /// Mutable access to an owned particle.
    ///
    /// # Safety
    /// The caller must be the particle's owning worker, and no other access
    /// to this particle may be live (in the force phase, readers may touch
    /// any particle, so owners must go through [`Self::position`] and write
    /// results back only after all reads of the particle are done).
    #[inline(always)]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn particle_mut(&self, handle: ParticleHandle) -> &mut Particle {
        &mut *self.particles[handle].get()
    }

    /// Whole-store view for setup, serialization checks and tests.
    /// Exclusive access makes this safe; UnsafeCell is repr(transparent).
    pub fn as_slice(&mut self) -> &[Particle] {
        unsafe {
            std::slice::from_raw_parts(self.particles.as_ptr() as *const Particle, self.particles.len())
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        unsafe {
            std::slice::from_raw_parts_mut(
                self.particles.as_mut_ptr() as *mut Particle,
                self.particles.len(),
            )
        }
    }
}
