use thiserror::Error;

/// Errors originating from the core pipeline and its collaborators.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Image with zero (or otherwise unusable) dimensions.
    #[error("Invalid image dimensions: {width}×{height}")]
    InvalidImage {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Tile side that does not evenly divide the source.
    #[error("Tile size {tile} does not evenly divide {width}×{height}")]
    InvalidTileSize {
        /// Requested tile side, in pixels.
        tile: u32,
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },

    /// Render attempted with no active characters.
    #[error("Character set is empty")]
    EmptyCharacterSet,

    /// The image file could not be read or decoded.
    #[error("Cannot load image {path}: {reason}")]
    ImageLoad {
        /// Path of the offending file.
        path: String,
        /// Decoder or I/O message.
        reason: String,
    },

    /// The glyph rasterizer failed for a character/font pair.
    #[error("Cannot rasterize {ch:?} in font '{font}': {reason}")]
    Rasterization {
        /// Requested character.
        ch: char,
        /// Requested font name.
        font: String,
        /// Rasterizer message.
        reason: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An output sink failed to write.
    #[error("Cannot write to {target}")]
    Output {
        /// Sink description (path or "terminal").
        target: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Shorthand for a rasterization failure.
    pub fn rasterization(ch: char, font: &str, reason: impl Into<String>) -> Self {
        Self::Rasterization {
            ch,
            font: font.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let e = CoreError::InvalidTileSize {
            tile: 3,
            width: 8,
            height: 4,
        };
        assert_eq!(e.to_string(), "Tile size 3 does not evenly divide 8×4");

        let e = CoreError::rasterization('x', "Courier New", "font not found");
        assert!(e.to_string().contains("'x'"));
        assert!(e.to_string().contains("Courier New"));
    }

    #[test]
    fn output_error_exposes_source() {
        use std::error::Error as _;
        let e = CoreError::Output {
            target: "out.html".into(),
            source: std::io::Error::other("disk full"),
        };
        assert!(e.source().is_some());
    }
}
