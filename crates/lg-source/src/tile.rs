use std::iter::FusedIterator;

use lg_core::error::CoreError;
use lg_core::frame::{PixelSource, Rgb};

/// Square read-only window into a pixel source.
///
/// Holds a borrow of the source plus an offset; pixels are never copied.
///
/// # Example
/// ```
/// use lg_core::frame::{PixelBuffer, PixelSource};
/// use lg_source::tile::TileView;
///
/// let src = PixelBuffer::from_fn(4, 4, |row, col| (row as u8, col as u8, 0)).unwrap();
/// let tile = TileView::new(&src, 2, 2, 2).unwrap();
/// assert_eq!(tile.pixel(1, 0), (3, 2, 0));
/// ```
pub struct TileView<'a, S: ?Sized> {
    source: &'a S,
    row: u32,
    col: u32,
    size: u32,
}

impl<S: ?Sized> Clone for TileView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for TileView<'_, S> {}

impl<'a, S: PixelSource + ?Sized> TileView<'a, S> {
    /// Window of `size × size` at `(row, col)`.
    ///
    /// # Errors
    /// `InvalidTileSize` if `size` is zero or the window leaves the source.
    pub fn new(source: &'a S, row: u32, col: u32, size: u32) -> Result<Self, CoreError> {
        let fits =
            |offset: u32, extent: u32| offset.checked_add(size).is_some_and(|end| end <= extent);
        if size == 0 || !fits(row, source.height()) || !fits(col, source.width()) {
            return Err(CoreError::InvalidTileSize {
                tile: size,
                width: source.width(),
                height: source.height(),
            });
        }
        Ok(Self {
            source,
            row,
            col,
            size,
        })
    }

    /// Top-left corner in source coordinates, `(row, col)`.
    #[must_use]
    pub fn offset(&self) -> (u32, u32) {
        (self.row, self.col)
    }

    /// Side length in pixels.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }
}

impl<S: PixelSource + ?Sized> PixelSource for TileView<'_, S> {
    #[inline(always)]
    fn width(&self) -> u32 {
        self.size
    }

    #[inline(always)]
    fn height(&self) -> u32 {
        self.size
    }

    #[inline(always)]
    fn pixel(&self, row: u32, col: u32) -> Rgb {
        debug_assert!(row < self.size && col < self.size, "pixel out of tile");
        self.source.pixel(self.row + row, self.col + col)
    }
}

/// Lazy row-major walk over the tiles of a source.
///
/// Advances column-first, wraps at the source width, ends at the source
/// height. Single pass; call [`tiles`] again to restart.
pub struct TileIter<'a, S: ?Sized> {
    source: &'a S,
    size: u32,
    row: u32,
    col: u32,
}

/// Tiles of side `size` covering `source`.
///
/// # Errors
/// `InvalidTileSize` if `size` is zero or does not divide both dimensions.
///
/// # Example
/// ```
/// use lg_core::frame::PixelBuffer;
/// use lg_source::tile::tiles;
///
/// let src = PixelBuffer::filled(8, 4, (0, 0, 0)).unwrap();
/// let offsets: Vec<_> = tiles(&src, 4).unwrap().map(|t| t.offset()).collect();
/// assert_eq!(offsets, [(0, 0), (0, 4)]);
/// assert!(tiles(&src, 3).is_err());
/// ```
pub fn tiles<S: PixelSource + ?Sized>(source: &S, size: u32) -> Result<TileIter<'_, S>, CoreError> {
    let (width, height) = (source.width(), source.height());
    if size == 0 || width % size != 0 || height % size != 0 {
        return Err(CoreError::InvalidTileSize {
            tile: size,
            width,
            height,
        });
    }
    Ok(TileIter {
        source,
        size,
        row: 0,
        col: 0,
    })
}

impl<S: PixelSource + ?Sized> TileIter<'_, S> {
    /// Shape of the tile grid, `(rows, cols)`.
    #[must_use]
    pub fn grid_size(&self) -> (u32, u32) {
        (
            self.source.height() / self.size,
            self.source.width() / self.size,
        )
    }
}

impl<'a, S: PixelSource + ?Sized> Iterator for TileIter<'a, S> {
    type Item = TileView<'a, S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.source.height() {
            return None;
        }
        let tile = TileView {
            source: self.source,
            row: self.row,
            col: self.col,
            size: self.size,
        };
        self.col += self.size;
        if self.col >= self.source.width() {
            self.col = 0;
            self.row += self.size;
        }
        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (rows, cols) = self.grid_size();
        let done = (self.row / self.size) * cols + self.col / self.size;
        let left = (rows * cols).saturating_sub(done) as usize;
        (left, Some(left))
    }
}

impl<S: PixelSource + ?Sized> ExactSizeIterator for TileIter<'_, S> {}

impl<S: PixelSource + ?Sized> FusedIterator for TileIter<'_, S> {}
