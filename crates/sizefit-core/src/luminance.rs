//! Luma calculation using ITU-R BT.601 coefficients.
//!
//! The sharpness estimator works on the same weighting a browser canvas
//! grayscale conversion would use, so these are the Rec. 601 weights rather
//! than the Rec. 709 ones.

/// ITU-R BT.601 coefficient for the red channel.
pub const LUMA_R: f64 = 0.299;

/// ITU-R BT.601 coefficient for the green channel.
pub const LUMA_G: f64 = 0.587;

/// ITU-R BT.601 coefficient for the blue channel.
pub const LUMA_B: f64 = 0.114;

/// Calculate luma from u8 RGB values.
///
/// # Arguments
/// * `r` - Red channel value (0-255)
/// * `g` - Green channel value (0-255)
/// * `b` - Blue channel value (0-255)
///
/// # Returns
/// Unrounded luma in the range 0.0 to 255.0
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}
