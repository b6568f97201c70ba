use crate::error::CoreError;

/// RGB sample, one byte per channel.
pub type Rgb = (u8, u8, u8);

/// Fill color used for padding.
pub const WHITE: Rgb = (255, 255, 255);

/// Read-only rectangular grid of color samples.
///
/// Coordinates are `(row, col)`, row-major. Implemented by `PixelBuffer`,
/// `PaddedImage` and `TileView`.
///
/// # Example
/// ```
/// use lg_core::frame::{PixelBuffer, PixelSource};
/// let buf = PixelBuffer::filled(4, 2, (10, 20, 30)).unwrap();
/// assert_eq!(buf.width(), 4);
/// assert_eq!(buf.pixel(1, 3), (10, 20, 30));
/// ```
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Sample at `(row, col)`. Callers stay within `height × width`.
    fn pixel(&self, row: u32, col: u32) -> Rgb;
}

impl<S: PixelSource + ?Sized> PixelSource for &S {
    #[inline(always)]
    fn width(&self) -> u32 {
        (**self).width()
    }

    #[inline(always)]
    fn height(&self) -> u32 {
        (**self).height()
    }

    #[inline(always)]
    fn pixel(&self, row: u32, col: u32) -> Rgb {
        (**self).pixel(row, col)
    }
}

/// Owned pixel grid. Stores RGB row-major, 3 bytes per pixel.
///
/// Immutable once built: every constructor validates the dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Wrap raw RGB bytes.
    ///
    /// # Errors
    /// `InvalidImage` if a dimension is zero or `data` has the wrong length.
    ///
    /// # Example
    /// ```
    /// use lg_core::frame::PixelBuffer;
    /// let buf = PixelBuffer::from_raw(1, 1, vec![1, 2, 3]).unwrap();
    /// assert!(PixelBuffer::from_raw(2, 1, vec![1, 2, 3]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize * 3 {
            return Err(CoreError::InvalidImage { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Uniform buffer.
    ///
    /// # Errors
    /// `InvalidImage` if a dimension is zero.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Result<Self, CoreError> {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Build a buffer by evaluating `f(row, col)` for every pixel.
    ///
    /// # Errors
    /// `InvalidImage` if a dimension is zero.
    ///
    /// # Example
    /// ```
    /// use lg_core::frame::{PixelBuffer, PixelSource};
    /// let buf = PixelBuffer::from_fn(3, 2, |row, col| (row as u8, col as u8, 0)).unwrap();
    /// assert_eq!(buf.pixel(1, 2), (1, 2, 0));
    /// ```
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Rgb,
    ) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidImage { width, height });
        }
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for row in 0..height {
            for col in 0..width {
                let (r, g, b) = f(row, col);
                data.extend_from_slice(&[r, g, b]);
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }
}

impl PixelSource for PixelBuffer {
    #[inline(always)]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn pixel(&self, row: u32, col: u32) -> Rgb {
        debug_assert!(row < self.height && col < self.width, "pixel out of bounds");
        let idx = (row as usize * self.width as usize + col as usize) * 3;
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }
}

/// Square monochrome glyph bitmap. `true` marks an ink cell.
///
/// # Example
/// ```
/// use lg_core::frame::GlyphBitmap;
/// let mut bm = GlyphBitmap::blank(4);
/// bm.set(0, 0, true);
/// assert_eq!(bm.ink_count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    cells: Vec<bool>,
    side: u32,
}

impl GlyphBitmap {
    /// Empty bitmap of `side × side`.
    #[must_use]
    pub fn blank(side: u32) -> Self {
        Self {
            cells: vec![false; side as usize * side as usize],
            side,
        }
    }

    /// Side length in cells.
    #[must_use]
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Mark a cell.
    #[inline]
    pub fn set(&mut self, row: u32, col: u32, ink: bool) {
        self.cells[row as usize * self.side as usize + col as usize] = ink;
    }

    /// Read a cell.
    #[inline]
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> bool {
        self.cells[row as usize * self.side as usize + col as usize]
    }

    /// Number of ink cells.
    #[must_use]
    pub fn ink_count(&self) -> usize {
        self.cells.iter().filter(|&&ink| ink).count()
    }
}

/// Output character grid, row-major. Every row has `cols` characters.
///
/// # Example
/// ```
/// use lg_core::frame::CharGrid;
/// let grid = CharGrid::from_cells(2, 3, "abcdef".chars().collect()).unwrap();
/// assert_eq!(grid.get(1, 0), 'd');
/// assert_eq!(grid.row_string(0), "abc");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharGrid {
    cells: Vec<char>,
    rows: u32,
    cols: u32,
}

impl CharGrid {
    /// Build a grid from row-major cells.
    ///
    /// # Errors
    /// `InvalidImage` if `cells.len() != rows * cols`.
    pub fn from_cells(rows: u32, cols: u32, cells: Vec<char>) -> Result<Self, CoreError> {
        if cells.len() != rows as usize * cols as usize {
            return Err(CoreError::InvalidImage {
                width: cols,
                height: rows,
            });
        }
        Ok(Self { cells, rows, cols })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Character at `(row, col)`.
    #[inline]
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> char {
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[char]> {
        // chunks_exact panics on 0; an empty grid has no rows anyway.
        self.cells.chunks_exact(self.cols.max(1) as usize)
    }

    /// A row collected into a `String`.
    #[must_use]
    pub fn row_string(&self, row: u32) -> String {
        let start = row as usize * self.cols as usize;
        self.cells[start..start + self.cols as usize].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::filled(0, 3, WHITE),
            Err(CoreError::InvalidImage { width: 0, height: 3 })
        ));
        assert!(PixelBuffer::from_fn(3, 0, |_, _| WHITE).is_err());
    }

    #[test]
    fn buffer_is_row_major() {
        let buf = PixelBuffer::from_fn(2, 2, |row, col| (row as u8, col as u8, 9)).unwrap();
        assert_eq!(buf.pixel(0, 1), (0, 1, 9));
        assert_eq!(buf.pixel(1, 0), (1, 0, 9));
        assert_eq!(buf.pixel(1, 1), (1, 1, 9));
    }

    #[test]
    fn grid_rows_have_equal_length() {
        let grid = CharGrid::from_cells(3, 2, "abcdef".chars().collect()).unwrap();
        let rows: Vec<String> = grid.iter_rows().map(|r| r.iter().collect()).collect();
        assert_eq!(rows, ["ab", "cd", "ef"]);
        assert!(CharGrid::from_cells(2, 2, vec!['a']).is_err());
    }
}
