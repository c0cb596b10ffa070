//! Block grid
//!
//! A rectangular field of optional colors built once from a pixel buffer.
//! Index layout is row-major: `col + row * cols`.

use thiserror::Error;

/// Errors building a grid from pixels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Grid dimensions must be positive, got {cols}x{rows}")]
    ZeroSized { cols: usize, rows: usize },

    #[error("Pixel buffer length {len} does not match a {cols}x{rows} grid")]
    DimensionMismatch { cols: usize, rows: usize, len: usize },
}

/// Only the RGB bits decide solidity
pub const RGB_MASK: u32 = 0x00FF_FFFF;

/// Block color packed as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Color of a pixel, or `None` if its RGB bits are all zero
    #[inline]
    pub fn from_pixel(pixel: u32) -> Option<Self> {
        let rgb = pixel & RGB_MASK;
        (rgb != 0).then_some(Self(rgb))
    }

    #[inline]
    pub fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub fn b(self) -> u8 {
        self.0 as u8
    }

    /// Channels as `[r, g, b]` floats in `[0, 1]`
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }
}

/// Immutable grid of solid (colored) and empty cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Option<Rgb>>,
}

impl BlockGrid {
    /// Build a grid from `cols * rows` pixels, one `u32` per pixel
    ///
    /// Fails fast on a zero dimension or a buffer of the wrong length.
    pub fn from_pixels(cols: usize, rows: usize, pixels: &[u32]) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::ZeroSized { cols, rows });
        }
        if pixels.len() != cols * rows {
            return Err(GridError::DimensionMismatch {
                cols,
                rows,
                len: pixels.len(),
            });
        }

        let cells = pixels.iter().map(|&p| Rgb::from_pixel(p)).collect();
        Ok(Self { cols, rows, cells })
    }

    /// Build a grid from a per-cell predicate, mostly for hand-made layouts
    pub fn from_fn(
        cols: usize,
        rows: usize,
        mut f: impl FnMut(usize, usize) -> Option<Rgb>,
    ) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::ZeroSized { cols, rows });
        }
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(col, row).map(|c| Rgb(c.0 & RGB_MASK)).filter(|c| c.0 != 0));
            }
        }
        Ok(Self { cols, rows, cells })
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major cell slice
    pub fn cells(&self) -> &[Option<Rgb>] {
        &self.cells
    }

    /// Cell color, or `None` when empty or out of range
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<Rgb> {
        if col < self.cols && row < self.rows {
            self.cells[col + row * self.cols]
        } else {
            None
        }
    }

    #[inline]
    pub fn is_solid(&self, col: usize, row: usize) -> bool {
        self.get(col, row).is_some()
    }

    /// Number of solid cells
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
