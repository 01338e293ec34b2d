//! Drawing a surface at a different size.
//!
//! This stands in for drawing an `<img>` onto a canvas of the target size:
//! one fixed bilinear filter, a new surface out, the source untouched.

use super::DecodeError;
use crate::surface::PixelSurface;

/// Resample filter used for every draw.
const DRAW_FILTER: image::imageops::FilterType = image::imageops::FilterType::Triangle;

/// Draw a surface at exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either dimension is zero, and
/// `DecodeError::CorruptedFile` if the source buffer cannot be viewed as an image.
pub fn draw(surface: &PixelSurface, width: u32, height: u32) -> Result<PixelSurface, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    if surface.dimensions() == (width, height) {
        return Ok(surface.clone());
    }

    let rgba = surface
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    let resized = image::imageops::resize(&rgba, width, height, DRAW_FILTER);

    Ok(PixelSurface::from_rgba_image(resized))
}

/// Dimensions of `width` x `height` scaled by `scale`, floored, at least 1x1.
///
/// Products within float noise of an integer count as that integer, so
/// `80 * 0.7` is 56 rather than 55.
///
/// `scale` is expected in (0, 1]; values outside are clamped so the result
/// never exceeds the original size.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let scale = if scale.is_finite() { scale.clamp(0.0, 1.0) } else { 1.0 };
    let w = ((width as f64) * scale + 1e-9).floor() as u32;
    let h = ((height as f64) * scale + 1e-9).floor() as u32;
    (w.clamp(1, width.max(1)), h.clamp(1, height.max(1)))
}
