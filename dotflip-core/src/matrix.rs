//! Dot-matrix snapshots
//!
//! A snapshot stores one `u32` column bitmask per (row, module) pair; bit
//! `k` set means column `k` of that module shows the "set" face. Storage is
//! a fixed-capacity row-major buffer sized once from the configuration and
//! updated in place afterwards.

use core::fmt;

use heapless::Vec;

use crate::config::{ModuleConfig, MAX_MODULES, MAX_ROWS};
use crate::tables::bit_is_set;

/// Capacity of a snapshot in (row, module) cells
pub const MAX_CELLS: usize = MAX_ROWS * MAX_MODULES;

/// Snapshot shape errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixError {
    /// Requested shape exceeds [`MAX_ROWS`] × [`MAX_MODULES`]
    TooLarge,
    /// Rows have differing lengths or shapes do not match
    DimensionMismatch,
}

/// Row-major grid of per-module column bitmasks
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DotMatrix {
    rows: usize,
    modules: usize,
    cells: Vec<u32, MAX_CELLS>,
}

impl DotMatrix {
    /// Create an all-zero snapshot
    pub fn new(rows: usize, modules: usize) -> Result<Self, MatrixError> {
        if rows > MAX_ROWS || modules > MAX_MODULES {
            return Err(MatrixError::TooLarge);
        }
        let mut cells = Vec::new();
        cells
            .resize(rows * modules, 0)
            .map_err(|_| MatrixError::TooLarge)?;
        Ok(Self {
            rows,
            modules,
            cells,
        })
    }

    /// Build a snapshot from row slices, e.g. `&[[5], [0]]`
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let modules = rows.first().map_or(0, |r| r.as_ref().len());
        let mut matrix = Self::new(rows.len(), modules)?;
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != modules {
                return Err(MatrixError::DimensionMismatch);
            }
            matrix.row_mut(index).copy_from_slice(row);
        }
        Ok(matrix)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of modules per row
    pub fn modules(&self) -> usize {
        self.modules
    }

    /// True when `other` has the same shape
    pub fn same_shape(&self, other: &DotMatrix) -> bool {
        self.rows == other.rows && self.modules == other.modules
    }

    /// Column mask of one module in one row
    pub fn get(&self, row: usize, module: usize) -> u32 {
        self.cells[row * self.modules + module]
    }

    /// Replace the column mask of one module in one row
    pub fn set(&mut self, row: usize, module: usize, mask: u32) {
        self.cells[row * self.modules + module] = mask;
    }

    /// State of a single dot
    pub fn is_set(&self, row: usize, module: usize, column: usize) -> bool {
        bit_is_set(self.get(row, module), column)
    }

    /// Masks of every module in `row`
    pub fn row(&self, row: usize) -> &[u32] {
        &self.cells[row * self.modules..(row + 1) * self.modules]
    }

    fn row_mut(&mut self, row: usize) -> &mut [u32] {
        &mut self.cells[row * self.modules..(row + 1) * self.modules]
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Set every module of every row to `mask(module)`
    pub fn fill_with(&mut self, mut mask: impl FnMut(usize) -> u32) {
        for row in 0..self.rows {
            for module in 0..self.modules {
                self.set(row, module, mask(module));
            }
        }
    }

    /// Copy `other` into this snapshot without reallocating
    pub fn copy_from(&mut self, other: &DotMatrix) -> Result<(), MatrixError> {
        if !self.same_shape(other) {
            return Err(MatrixError::DimensionMismatch);
        }
        self.cells.copy_from_slice(&other.cells);
        Ok(())
    }

    /// Render as `*`/space per column for the given module widths
    pub fn view<'a>(&'a self, modules: &'a [ModuleConfig]) -> DotView<'a> {
        DotView {
            matrix: self,
            modules,
        }
    }
}

/// Text rendering of a snapshot, one line per row
pub struct DotView<'a> {
    matrix: &'a DotMatrix,
    modules: &'a [ModuleConfig],
}

impl fmt::Display for DotView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.matrix.rows() {
            for (module, config) in self.modules.iter().enumerate().take(self.matrix.modules()) {
                for column in 0..config.columns as usize {
                    let c = if self.matrix.is_set(row, module, column) {
                        '*'
                    } else {
                        ' '
                    };
                    write!(f, "{}", c)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
