//! JPEG and PNG encoding of pixel surfaces.
//!
//! Quality follows the browser canvas convention: a number in `[0.0, 1.0]`,
//! where anything outside that range falls back to the default of 0.92.
//! PNG output is lossless and ignores quality.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::format::ImageFormat;
use crate::surface::PixelSurface;

/// Quality used when the requested quality is not a number in `[0.0, 1.0]`.
pub const DEFAULT_QUALITY: f64 = 0.92;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed { format: ImageFormat, message: String },
}

/// Encode a surface in the given format.
///
/// # Arguments
///
/// * `surface` - Pixels to encode
/// * `format` - Output container format
/// * `quality` - Encoder quality in `[0.0, 1.0]`; only JPEG uses it
///
/// # Returns
///
/// The encoded file bytes.
///
/// # Example
///
/// ```
/// use sizefit_core::encode::encode_surface;
/// use sizefit_core::{ImageFormat, PixelSurface};
///
/// let surface = PixelSurface::filled(16, 16, [128, 128, 128, 255]);
/// let jpeg = encode_surface(&surface, ImageFormat::Jpeg, 0.9).unwrap();
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_surface(
    surface: &PixelSurface,
    format: ImageFormat,
    quality: f64,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = surface.dimensions();
    if surface.is_empty() {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    match format {
        ImageFormat::Jpeg => encode_jpeg(surface, quality),
        ImageFormat::Png => encode_png(surface),
    }
}

/// Map a `[0.0, 1.0]` quality to the JPEG encoder's 1-100 scale.
pub fn jpeg_quality(quality: f64) -> u8 {
    let quality = if (0.0..=1.0).contains(&quality) {
        quality
    } else {
        DEFAULT_QUALITY
    };
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn encode_jpeg(surface: &PixelSurface, quality: f64) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = surface.dimensions();
    let rgb = flatten_onto_black(surface.pixels());

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality))
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

fn encode_png(surface: &PixelSurface) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = surface.dimensions();

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(surface.pixels(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Png,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// JPEG has no alpha; a canvas export composites transparency onto black.
fn flatten_onto_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u16;
        for &c in &px[..3] {
            rgb.push(((c as u16 * a + 127) / 255) as u8);
        }
    }
    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================
