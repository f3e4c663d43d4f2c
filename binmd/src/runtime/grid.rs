//! Uniform bin grid: mapping from continuous positions to cell ids

use num::Integer;

use super::domain::{Domain, CUTOFF};

/// Geometry of the uniform bin grid covering the domain.
///
/// The cell side length equals the interaction cutoff, so all partners of a
/// particle are found in the 3x3 block of cells around its own. All methods
/// are pure and callable concurrently without synchronization.
#[derive(Clone, Copy, Debug)]
pub struct BinGrid {
    cells_per_row: usize,
}

impl BinGrid {
    pub fn new(domain: &Domain) -> Self {
        Self {
            cells_per_row: (domain.size() / CUTOFF).ceil() as usize,
        }
    }

    pub fn cells_per_row(&self) -> usize {
        self.cells_per_row
    }

    pub fn num_cells(&self) -> usize {
        self.cells_per_row * self.cells_per_row
    }

    /// Cell id for a position: `col + cells_per_row * row`.
    ///
    /// Both coordinates are clamped to the last row/column, so a particle
    /// sitting exactly on the high domain boundary (reflection can produce
    /// `x == size`) still maps to a valid cell.
    #[inline(always)]
    pub fn cell_id(&self, x: f64, y: f64) -> usize {
        let col = ((x / CUTOFF).floor() as usize).min(self.cells_per_row - 1);
        let row = ((y / CUTOFF).floor() as usize).min(self.cells_per_row - 1);
        col + self.cells_per_row * row
    }

    /// Enumerate the 3x3 neighborhood of a cell, clipped at the grid edges.
    ///
    /// Yields between 4 (corner) and 9 (interior) cell ids, the center cell
    /// included; every id is in `[0, num_cells())`.
    pub fn neighborhood(&self, cell: usize) -> impl Iterator<Item = usize> {
        let n = self.cells_per_row as isize;
        let (row, col) = (cell as isize).div_rem(&n);
        (-1..=1).flat_map(move |dr| {
            (-1..=1).filter_map(move |dc| {
                let (r, c) = (row + dr, col + dc);
                if r >= 0 && r < n && c >= 0 && c < n {
                    Some((c + n * r) as usize)
                } else {
                    None
                }
            })
        })
    }
}
