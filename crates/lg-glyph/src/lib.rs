//! Glyph rasterization for lumaglyph.
//!
//! Renders single characters of TrueType/OpenType fonts into monochrome
//! bitmaps, the input of character brightness.

pub mod rasterizer;

pub use rasterizer::{FontRasterizer, FontRegistry};
