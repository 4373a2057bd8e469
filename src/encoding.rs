//! Bitmap encoder: the bordered, column-doubled grid the scan consumes.
//!
//! ## Layout
//!
//! The source image is first wrapped in one ring of zeros. Each wrapped row
//! of width `W` is then expanded to `2W + 1` cells:
//!
//! ```text
//! encoded[2k + 1] = pixel[k]
//! encoded[2k]     = pixel[k - 1] | pixel[k]      (out-of-range pixels are 0)
//! ```
//!
//! Only odd columns carry real pixels. The even padding columns widen every
//! HIGH run by one cell on each side, so diagonally touching HIGH pixels
//! become edge-connected while LOW regions stay four-connected. The border
//! guarantees that every region other than the outer background is enclosed.

use crate::types::{BinaryGrid, ColorClass};

/// Width of the zero ring added around the source image.
pub const BORDER: usize = 1;

/// Error type for grids that do not satisfy the encoding contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// Encoded rows must have odd width.
    #[error("Encoded width must be odd, got {0}")]
    EvenWidth(usize),
    /// Grid is too small to hold a border and one real pixel.
    #[error("Encoded grid {width}x{height} is too small")]
    TooSmall {
        /// Encoded width.
        width: usize,
        /// Encoded height.
        height: usize,
    },
    /// A border cell is not LOW.
    #[error("Border cell ({row}, {col}) is not 0")]
    OpenBorder {
        /// Row of the cell.
        row: usize,
        /// Encoded column of the cell.
        col: usize,
    },
    /// A padding cell disagrees with its neighbouring pixels.
    #[error("Padding cell ({row}, {col}) is {actual}, expected {expected}")]
    PaddingMismatch {
        /// Row of the cell.
        row: usize,
        /// Encoded column of the cell.
        col: usize,
        /// Value implied by the neighbouring pixels.
        expected: u8,
        /// Value found.
        actual: u8,
    },
}

/// A grid that satisfies the bordering and doubling contract.
///
/// The only ways to obtain one are [`encode`] and
/// [`EncodedGrid::from_prepared`], so the scan can rely on the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedGrid {
    grid: BinaryGrid,
    source_width: usize,
    source_height: usize,
}

impl EncodedGrid {
    /// Validate a grid that was encoded elsewhere.
    pub fn from_prepared(grid: BinaryGrid) -> Result<Self, EncodingError> {
        let width = grid.width();
        let height = grid.height();
        if width % 2 == 0 {
            return Err(EncodingError::EvenWidth(width));
        }
        // Border ring plus at least one real pixel in each direction.
        if width < 7 || height < 3 {
            return Err(EncodingError::TooSmall { width, height });
        }

        for &row in &[0, height - 1] {
            if let Some(col) = grid.row(row).iter().position(|&v| v != 0) {
                return Err(EncodingError::OpenBorder { row, col });
            }
        }
        for row in 0..height {
            for &col in &[1, width - 2] {
                if grid.row(row)[col] != 0 {
                    return Err(EncodingError::OpenBorder { row, col });
                }
            }
        }

        for row in 0..height {
            let cells = grid.row(row);
            for col in (0..width).step_by(2) {
                let left = if col > 0 { cells[col - 1] } else { 0 };
                let right = if col + 1 < width { cells[col + 1] } else { 0 };
                let expected = left | right;
                if cells[col] != expected {
                    tracing::warn!(row, col, expected, actual = cells[col], "Rejecting prepared grid");
                    return Err(EncodingError::PaddingMismatch {
                        row,
                        col,
                        expected,
                        actual: cells[col],
                    });
                }
            }
        }

        let wrapped_width = (width - 1) / 2;
        Ok(Self {
            grid,
            source_width: wrapped_width - 2 * BORDER,
            source_height: height - 2 * BORDER,
        })
    }

    /// The encoded cells.
    pub fn grid(&self) -> &BinaryGrid {
        &self.grid
    }

    /// Encoded width (`2W + 1`).
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Encoded height (source height plus the border).
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Width of the source image.
    pub fn source_width(&self) -> usize {
        self.source_width
    }

    /// Height of the source image.
    pub fn source_height(&self) -> usize {
        self.source_height
    }

    /// Number of cells that carry a real pixel (odd columns), border included.
    pub fn real_cell_count(&self) -> u64 {
        (self.height() * (self.width() / 2)) as u64
    }

    /// Colors in scan order (row-major).
    pub fn colors(&self) -> impl Iterator<Item = ColorClass> + '_ {
        self.grid
            .cells()
            .iter()
            .map(|&v| if v == 0 { ColorClass::Low } else { ColorClass::High })
    }
}

/// Border and double a source image.
pub fn encode(image: &BinaryGrid) -> EncodedGrid {
    let wrapped = image.bordered();
    let w = wrapped.width();
    let out_width = 2 * w + 1;
    let mut cells = Vec::with_capacity(out_width * wrapped.height());

    for r in 0..wrapped.height() {
        let row = wrapped.row(r);
        let pixel = |k: isize| -> u8 {
            if k < 0 || k as usize >= w { 0 } else { row[k as usize] }
        };
        for c in 0..out_width {
            let k = (c / 2) as isize;
            let v = if c % 2 == 1 { pixel(k) } else { pixel(k - 1) | pixel(k) };
            cells.push(v);
        }
    }

    let grid = match BinaryGrid::from_vec(out_width, wrapped.height(), cells) {
        Ok(grid) => grid,
        // Dimensions and values are derived from a valid grid.
        Err(e) => unreachable!("encoding produced an invalid grid: {e}"),
    };

    EncodedGrid {
        grid,
        source_width: image.width(),
        source_height: image.height(),
    }
}
