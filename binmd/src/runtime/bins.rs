//! Concurrent bin membership store
//!
//! One lock-guarded handle container per grid cell, plus a slot table mapping
//! every particle handle to its current index inside its cell's container.
//! The slot makes removal O(1): the container's last handle is swapped into
//! the vacated position.
//!
//! Concurrency contract: `add` and `remove` take the cell's mutex and may be
//! called concurrently from any worker. `members` takes no lock at all; it is
//! only sound while no writer is active, which the step barriers guarantee
//! for the whole force phase. Two workers contend on a cell lock only when
//! both migrate particles into or out of that cell in the same step.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crossbeam::utils::CachePadded;

use super::particle::ParticleHandle;

struct CellBin {
    lock: Mutex<()>,
    members: UnsafeCell<Vec<ParticleHandle>>,
}

// The member list is only touched under `lock`, or lock-free in phases where
// the barrier protocol rules out writers.
unsafe impl Sync for CellBin {}

impl CellBin {
    fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            members: UnsafeCell::new(Vec::new()),
        }
    }
}

pub struct BinStore {
    /// Cache-padded so that migrations into adjacent cells do not bounce the
    /// same cache line between workers.
    cells: Box<[CachePadded<CellBin>]>,
    /// Slot of each particle inside its current cell's member list.
    ///
    /// A slot entry is always written under the mutex of the cell that holds
    /// the particle, but that mutex changes as the particle migrates, so the
    /// entries are atomics (relaxed is enough under the locks).
    slots: Box<[AtomicUsize]>,
}

impl BinStore {
    pub fn new(num_cells: usize, num_particles: usize) -> Self {
        Self {
            cells: (0..num_cells)
                .map(|_| CachePadded::new(CellBin::new()))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
            slots: (0..num_particles)
                .map(|_| AtomicUsize::new(0))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Append a particle to a cell and record its slot. O(1) amortized.
    pub fn add(&self, cell: usize, handle: ParticleHandle) {
        let bin = &self.cells[cell];
        let _guard = bin.lock.lock().unwrap();
        let members = unsafe { &mut *bin.members.get() };
        members.push(handle);
        self.slots[handle].store(members.len() - 1, Ordering::Relaxed);
    }

    /// Remove a particle from a cell via its slot. O(1), order-destroying:
    /// the last member takes over the vacated slot.
    pub fn remove(&self, cell: usize, handle: ParticleHandle) {
        let bin = &self.cells[cell];
        let _guard = bin.lock.lock().unwrap();
        let members = unsafe { &mut *bin.members.get() };
        let slot = self.slots[handle].load(Ordering::Relaxed);
        if let Some(last) = members.pop() {
            if last != handle {
                members[slot] = last;
                self.slots[last].store(slot, Ordering::Relaxed);
            }
        }
    }

    /// Borrow a cell's member list without locking.
    ///
    /// # Safety
    /// No concurrent `add`/`remove` on any cell may be in flight, i.e. the
    /// caller must be in a barrier-quiescent phase (the force phase, or
    /// single-threaded sections).
    #[inline(always)]
    pub unsafe fn members(&self, cell: usize) -> &[ParticleHandle] {
        &*self.cells[cell].members.get()
    }

    /// Locked member count of one cell, for validation and tests.
    pub fn cell_len(&self, cell: usize) -> usize {
        let bin = &self.cells[cell];
        let _guard = bin.lock.lock().unwrap();
        unsafe { &*bin.members.get() }.len()
    }

    /// Locked copy of one cell's members, for validation and tests.
    pub fn cell_members(&self, cell: usize) -> Vec<ParticleHandle> {
        let bin = &self.cells[cell];
        let _guard = bin.lock.lock().unwrap();
        unsafe { &*bin.members.get() }.clone()
    }

    /// Current slot of a particle, for validation and tests.
    pub fn slot_of(&self, handle: ParticleHandle) -> usize {
        self.slots[handle].load(Ordering::Relaxed)
    }
}
