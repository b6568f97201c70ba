use std::path::Path;

use lg_core::error::CoreError;
use lg_core::frame::PixelBuffer;

/// Load an image file from disk as an RGB pixel buffer.
///
/// Any format enabled in the workspace `image` features (PNG, JPEG, BMP,
/// GIF) is accepted. Alpha is dropped.
///
/// # Errors
/// `ImageLoad` if the file cannot be read or decoded, `InvalidImage` if it
/// decodes to an empty picture.
///
/// # Example
/// ```no_run
/// use lg_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("board.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer, CoreError> {
    let img = image::open(path).map_err(|e| CoreError::ImageLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    log::info!("Image chargée : {} ({width}×{height})", path.display());
    PixelBuffer::from_raw(width, height, rgb.into_raw())
}
