//! Brightness matching engine for lumaglyph.
//!
//! Converts pixel sources to character grids by tile brightness.

pub mod engine;
pub mod luminance;

pub use engine::BrightnessEngine;
