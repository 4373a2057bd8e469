//! Validated binary grids.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::color::ColorClass;

/// Error type for grid construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Grid has no rows or no columns.
    #[error("Grid is empty")]
    Empty,
    /// Data length does not match `width * height`.
    #[error("Size mismatch: expected {expected} cells, got {actual}")]
    SizeMismatch {
        /// Expected number of cells.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
    /// A row has a different length than the first one.
    #[error("Ragged grid: row {row} has {actual} cells, expected {expected}")]
    Ragged {
        /// Offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A cell holds something other than 0 or 1.
    #[error("Non-binary value {value} at ({row}, {col})")]
    NonBinary {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// Offending value.
        value: u8,
    },
    /// Unrecognised character while parsing text.
    #[error("Unexpected character {ch:?} at line {line}")]
    BadChar {
        /// Line (row) of the character.
        line: usize,
        /// Offending character.
        ch: char,
    },
}

/// Rectangular, row-major grid of 0/1 cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl BinaryGrid {
    /// Build a grid from row-major data.
    pub fn from_vec(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        let expected = width.checked_mul(height).ok_or(GridError::SizeMismatch {
            expected: usize::MAX,
            actual: cells.len(),
        })?;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        if let Some(pos) = cells.iter().position(|&v| v > 1) {
            return Err(GridError::NonBinary {
                row: pos / width,
                col: pos % width,
                value: cells[pos],
            });
        }
        Ok(Self { width, height, cells })
    }

    /// Build a grid from nested rows.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::Ragged {
                row,
                expected: width,
                actual: r.len(),
            });
        }
        Self::from_vec(width, height, rows.into_iter().flatten().collect())
    }

    /// Grid of the given size with every cell set to `color`.
    pub fn filled(width: usize, height: usize, color: ColorClass) -> Result<Self, GridError> {
        Self::from_vec(width, height, vec![color.value(); width.saturating_mul(height)])
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw row-major cells.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// One row of cells.
    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    /// Raw value at `(row, col)`, or `None` out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Color at `(row, col)`, or `None` out of bounds.
    pub fn color_at(&self, row: usize, col: usize) -> Option<ColorClass> {
        self.get(row, col).and_then(ColorClass::from_value)
    }

    /// Copy of this grid surrounded by one ring of zeros.
    pub fn bordered(&self) -> Self {
        let width = self.width + 2;
        let height = self.height + 2;
        let mut cells = vec![0u8; width * height];
        for r in 0..self.height {
            let dst = (r + 1) * width + 1;
            cells[dst..dst + self.width].copy_from_slice(self.row(r));
        }
        Self { width, height, cells }
    }

    /// Count of cells equal to `color`.
    pub fn count(&self, color: ColorClass) -> usize {
        let v = color.value();
        self.cells.iter().filter(|&&c| c == v).count()
    }
}

/// Parse a grid from text, one row per line.
///
/// `0` and `.` are LOW, `1` and `#` are HIGH. Whitespace inside a line and
/// blank lines are ignored.
impl FromStr for BinaryGrid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (line, text) in s.lines().enumerate() {
            let mut row = Vec::new();
            for ch in text.chars() {
                match ch {
                    '0' | '.' => row.push(0),
                    '1' | '#' => row.push(1),
                    c if c.is_whitespace() => {}
                    c => return Err(GridError::BadChar { line, ch: c }),
                }
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Self::from_rows(rows)
    }
}
