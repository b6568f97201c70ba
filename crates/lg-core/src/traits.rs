use crate::error::CoreError;
use crate::frame::{CharGrid, GlyphBitmap};

/// Renders one character of a named font into a square monochrome bitmap.
///
/// Implemented by `FontRasterizer` (lg-glyph).
///
/// CONTRACT: deterministic for a given `(ch, resolution, font)` triple.
///
/// # Example
/// ```
/// use lg_core::traits::GlyphRasterizer;
/// use lg_core::frame::GlyphBitmap;
/// use lg_core::CoreError;
///
/// struct Solid;
/// impl GlyphRasterizer for Solid {
///     fn rasterize(&self, _ch: char, resolution: u32, _font: &str)
///         -> Result<GlyphBitmap, CoreError> {
///         Ok(GlyphBitmap::blank(resolution))
///     }
/// }
/// ```
pub trait GlyphRasterizer {
    /// Returns a `resolution × resolution` bitmap of `ch` in `font`.
    ///
    /// # Errors
    /// `CoreError::Rasterization` when the font or glyph cannot be produced.
    fn rasterize(&self, ch: char, resolution: u32, font: &str) -> Result<GlyphBitmap, CoreError>;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &R {
    fn rasterize(&self, ch: char, resolution: u32, font: &str) -> Result<GlyphBitmap, CoreError> {
        (**self).rasterize(ch, resolution, font)
    }
}

/// Destination of a rendered character grid.
///
/// Implemented by `ConsoleSink` and `HtmlSink` (lg-render).
pub trait GridSink {
    /// Serialize the whole grid.
    ///
    /// # Errors
    /// `CoreError::Output` on I/O failure.
    fn output(&mut self, grid: &CharGrid) -> Result<(), CoreError>;

    /// Short name used in user-facing messages and logs.
    fn name(&self) -> &'static str;
}
