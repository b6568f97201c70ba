//! Pixel sources for lumaglyph: file loading, padding and tiling.

pub mod image;
pub mod padded;
pub mod tile;

pub use padded::PaddedImage;
pub use tile::{TileIter, TileView, tiles};
