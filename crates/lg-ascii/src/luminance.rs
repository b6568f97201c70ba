use lg_core::frame::{GlyphBitmap, PixelSource};

/// BT.709 luma weights.
const WEIGHT_R: f64 = 0.2126;
const WEIGHT_G: f64 = 0.7152;
const WEIGHT_B: f64 = 0.0722;

/// Mean perceptual luminance of a region, scaled to [0.0, 1.0].
///
/// Used as-is as the target brightness of a tile.
///
/// # Example
/// ```
/// use lg_core::frame::PixelBuffer;
/// use lg_ascii::luminance::region_brightness;
///
/// let white = PixelBuffer::filled(2, 2, (255, 255, 255)).unwrap();
/// let black = PixelBuffer::filled(2, 2, (0, 0, 0)).unwrap();
/// assert!((region_brightness(&white) - 1.0).abs() < 1e-6);
/// assert_eq!(region_brightness(&black), 0.0);
/// ```
#[must_use]
pub fn region_brightness<S: PixelSource + ?Sized>(region: &S) -> f32 {
    let (width, height) = (region.width(), region.height());
    let count = u64::from(width) * u64::from(height);
    if count == 0 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    for row in 0..height {
        for col in 0..width {
            let (r, g, b) = region.pixel(row, col);
            sum += f64::from(r) * WEIGHT_R + f64::from(g) * WEIGHT_G + f64::from(b) * WEIGHT_B;
        }
    }
    ((sum / count as f64) / 255.0).clamp(0.0, 1.0) as f32
}

/// Share of ink cells in a glyph bitmap, in [0.0, 1.0].
///
/// # Example
/// ```
/// use lg_core::frame::GlyphBitmap;
/// use lg_ascii::luminance::glyph_coverage;
///
/// let mut bm = GlyphBitmap::blank(2);
/// bm.set(0, 1, true);
/// assert_eq!(glyph_coverage(&bm), 0.25);
/// ```
#[must_use]
pub fn glyph_coverage(bitmap: &GlyphBitmap) -> f32 {
    let side = bitmap.side();
    if side == 0 {
        return 0.0;
    }
    bitmap.ink_count() as f32 / (side * side) as f32
}
