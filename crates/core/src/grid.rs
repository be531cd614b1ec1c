//! Flat row-major grid buffers.
//!
//! A `ScalarGrid` stores `width * height` f64 values; a `MaskGrid` stores the
//! same layout of booleans. Both index with signed coordinates and treat
//! out-of-bounds access as absent (`None` / `false`) rather than wrapping:
//! the plate edge is a free edge, not a torus, and callers decide what a
//! missing neighbor means.

use crate::error::CoreError;

/// A 2D scalar field stored as a single flat buffer.
#[derive(Debug, Clone, Default)]
pub struct ScalarGrid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl ScalarGrid {
    /// Creates a zero-filled grid of the given dimensions.
    ///
    /// Returns `CoreError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, CoreError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Value at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: isize, y: isize) -> Option<f64> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Sets the value at `(x, y)`. Writes outside the grid are ignored.
    pub fn set(&mut self, x: isize, y: isize, value: f64) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = value;
        }
    }

    /// Iterates over all cells yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }
}

/// A 2D boolean grid with the same layout as [`ScalarGrid`].
///
/// `get` outside the bounds returns `false`: off the grid is off the plate
/// by definition.
#[derive(Debug, Clone, Default)]
pub struct MaskGrid {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl MaskGrid {
    /// Creates an all-`false` mask of the given dimensions.
    ///
    /// Returns `CoreError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, CoreError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![false; len],
        })
    }

    /// Mask width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Whether `(x, y)` is set; `false` outside the grid.
    pub fn get(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return false;
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Sets the bit at `(x, y)`. Writes outside the grid are ignored.
    pub fn set(&mut self, x: isize, y: isize, value: bool) {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return;
        }
        self.data[y as usize * self.width + x as usize] = value;
    }

    /// Number of set cells.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, CoreError> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(CoreError::InvalidDimensions)
}
