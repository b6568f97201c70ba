//! Configuration, types, and shared traits for lumaglyph.
//!
//! This crate contains all shared types, traits, and configuration logic
//! used across the lumaglyph workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::CharSet;
pub use config::AppConfig;
pub use error::CoreError;
pub use frame::{CharGrid, GlyphBitmap, PixelBuffer, PixelSource, Rgb};
pub use traits::{GlyphRasterizer, GridSink};
