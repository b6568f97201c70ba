use lg_core::error::CoreError;
use lg_core::frame::{PixelBuffer, PixelSource, Rgb, WHITE};

/// Image padded to power-of-two dimensions, original centered.
///
/// Built once at load time, never mutated afterwards. Padding cells hold
/// the fill color; the leading margin on each axis is half the total margin
/// (rounded down), the remainder goes to the trailing edge.
///
/// # Example
/// ```
/// use lg_core::frame::{PixelBuffer, PixelSource, WHITE};
/// use lg_source::padded::PaddedImage;
///
/// let src = PixelBuffer::filled(3, 5, (0, 0, 0)).unwrap();
/// let padded = PaddedImage::new(&src).unwrap();
/// assert_eq!((padded.width(), padded.height()), (4, 8));
/// assert_eq!(padded.offset(), (1, 0));
/// assert_eq!(padded.pixel(0, 0), WHITE);
/// assert_eq!(padded.pixel(1, 0), (0, 0, 0));
/// ```
#[derive(Clone, Debug)]
pub struct PaddedImage {
    buffer: PixelBuffer,
    original: (u32, u32),
    offset: (u32, u32),
}

impl PaddedImage {
    /// Pad `source` with white.
    ///
    /// # Errors
    /// `InvalidImage` if a dimension is zero or cannot be rounded up to a
    /// power of two within `u32`.
    pub fn new<S: PixelSource + ?Sized>(source: &S) -> Result<Self, CoreError> {
        Self::with_fill(source, WHITE)
    }

    /// Pad `source` with an explicit fill color.
    ///
    /// # Errors
    /// Same as [`PaddedImage::new`].
    pub fn with_fill<S: PixelSource + ?Sized>(source: &S, fill: Rgb) -> Result<Self, CoreError> {
        let (width, height) = (source.width(), source.height());
        let invalid = CoreError::InvalidImage { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let (Some(padded_w), Some(padded_h)) = (
            width.checked_next_power_of_two(),
            height.checked_next_power_of_two(),
        ) else {
            return Err(invalid);
        };

        let top = (padded_h - height) / 2;
        let left = (padded_w - width) / 2;

        let buffer = PixelBuffer::from_fn(padded_w, padded_h, |row, col| {
            let inside = (top..top + height).contains(&row) && (left..left + width).contains(&col);
            if inside {
                source.pixel(row - top, col - left)
            } else {
                fill
            }
        })?;

        log::debug!("Image {width}×{height} paddée en {padded_w}×{padded_h}");

        Ok(Self {
            buffer,
            original: (width, height),
            offset: (top, left),
        })
    }

    /// Dimensions of the source before padding, `(width, height)`.
    #[must_use]
    pub fn original_size(&self) -> (u32, u32) {
        self.original
    }

    /// Leading margins, `(top, left)`.
    #[must_use]
    pub fn offset(&self) -> (u32, u32) {
        self.offset
    }
}

impl PixelSource for PaddedImage {
    #[inline(always)]
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    #[inline(always)]
    fn height(&self) -> u32 {
        self.buffer.height()
    }

    #[inline(always)]
    fn pixel(&self, row: u32, col: u32) -> Rgb {
        self.buffer.pixel(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |row, col| (row as u8, col as u8, 7)).unwrap()
    }

    #[test]
    fn dimensions_round_up_to_powers_of_two() {
        for (w, h) in [(1, 1), (2, 3), (5, 8), (17, 9), (100, 33), (64, 64)] {
            let padded = PaddedImage::new(&gradient(w, h)).unwrap();
            assert_eq!(padded.width(), w.next_power_of_two(), "width for {w}×{h}");
            assert_eq!(padded.height(), h.next_power_of_two(), "height for {w}×{h}");
            assert_eq!(padded.original_size(), (w, h));
        }
    }

    #[test]
    fn centered_region_matches_source_and_border_is_fill() {
        let (w, h) = (5, 3);
        let src = gradient(w, h);
        let padded = PaddedImage::new(&src).unwrap();
        let (top, left) = padded.offset();
        assert_eq!((top, left), (0, 1));

        for row in 0..padded.height() {
            for col in 0..padded.width() {
                let inside = row >= top && row < top + h && col >= left && col < left + w;
                let expected = if inside {
                    src.pixel(row - top, col - left)
                } else {
                    WHITE
                };
                assert_eq!(padded.pixel(row, col), expected, "at ({row}, {col})");
            }
        }
    }

    #[test]
    fn odd_margin_puts_extra_cell_on_trailing_edge() {
        // 8 - 5 = 3: one leading row, two trailing rows.
        let padded = PaddedImage::new(&gradient(1, 5)).unwrap();
        assert_eq!(padded.offset(), (1, 0));
        assert_eq!(padded.pixel(0, 0), WHITE);
        assert_eq!(padded.pixel(1, 0), (0, 0, 7));
        assert_eq!(padded.pixel(5, 0), (4, 0, 7));
        assert_eq!(padded.pixel(6, 0), WHITE);
        assert_eq!(padded.pixel(7, 0), WHITE);
    }

    #[test]
    fn custom_fill_color() {
        let padded = PaddedImage::with_fill(&gradient(3, 4), (9, 9, 9)).unwrap();
        assert_eq!(padded.pixel(0, 3), (9, 9, 9));
    }

    #[test]
    fn power_of_two_source_is_unchanged() {
        let src = gradient(8, 4);
        let padded = PaddedImage::new(&src).unwrap();
        assert_eq!(padded.offset(), (0, 0));
        assert_eq!(padded.pixel(3, 7), src.pixel(3, 7));
    }

    struct Empty;
    impl PixelSource for Empty {
        fn width(&self) -> u32 {
            0
        }
        fn height(&self) -> u32 {
            4
        }
        fn pixel(&self, _: u32, _: u32) -> Rgb {
            WHITE
        }
    }

    #[test]
    fn zero_dimension_is_invalid() {
        assert!(matches!(
            PaddedImage::new(&Empty),
            Err(CoreError::InvalidImage { width: 0, height: 4 })
        ));
    }
}
