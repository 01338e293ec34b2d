//! Sharpness estimation for fitted images.
//!
//! The score is the population variance of per-pixel luma. Callers refer to
//! it as a "variance of Laplacian" sharpness score, but no Laplacian kernel
//! is applied: the statistic is plain luma variance over the whole surface.
//! It is cheap, single-pass, and only loosely tracks focus or detail.

use thiserror::Error;

use crate::luminance::luma;
use crate::surface::{PixelSurface, SurfaceError, BYTES_PER_PIXEL};

/// Errors that can occur while estimating sharpness.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SharpnessError {
    /// The surface has no pixels to measure.
    #[error("Invalid surface: {width}x{height} has no pixels")]
    InvalidSurface { width: u32, height: u32 },

    /// A raw pixel buffer did not match its declared dimensions.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Estimate the sharpness of a surface as the variance of its luma.
///
/// Alpha is ignored. Accumulation is done in `f64` and the result is clamped
/// at zero, since `E[L²] - E[L]²` can come out as a tiny negative number on
/// flat images.
///
/// # Errors
///
/// Returns `SharpnessError::InvalidSurface` for a zero-area surface.
///
/// # Example
/// ```
/// use sizefit_core::{estimate_sharpness, PixelSurface};
///
/// let flat = PixelSurface::filled(8, 8, [90, 90, 90, 255]);
/// assert_eq!(estimate_sharpness(&flat).unwrap(), 0.0);
/// ```
pub fn estimate_sharpness(surface: &PixelSurface) -> Result<f64, SharpnessError> {
    if surface.is_empty() {
        return Err(SharpnessError::InvalidSurface {
            width: surface.width(),
            height: surface.height(),
        });
    }

    Ok(luma_variance(surface.pixels()))
}

/// Estimate sharpness directly from an RGBA8 buffer, such as canvas `ImageData`.
///
/// # Errors
///
/// Returns `SharpnessError::Surface` if the buffer length is not
/// `width * height * 4`, and `SharpnessError::InvalidSurface` for zero area.
pub fn estimate_sharpness_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<f64, SharpnessError> {
    let surface = PixelSurface::new(width, height, pixels.to_vec())?;
    estimate_sharpness(&surface)
}

fn luma_variance(pixels: &[u8]) -> f64 {
    let mut chunks = pixels.chunks_exact(BYTES_PER_PIXEL);
    let Some(first) = chunks.next() else {
        return 0.0;
    };

    // Sums are taken relative to the first sample so a flat image yields an
    // exact zero instead of cancellation noise.
    let shift = luma(first[0], first[1], first[2]);
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut n = 1u64;

    for px in chunks {
        let d = luma(px[0], px[1], px[2]) - shift;
        sum += d;
        sum_sq += d * d;
        n += 1;
    }

    let n = n as f64;
    let mean = sum / n;
    let variance = sum_sq / n - mean * mean;
    variance.max(0.0)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
