//! Sharpness WASM binding.
//!
//! Scores canvas `ImageData` directly, so a page can rate a preview without
//! a round trip through an encoded file.

use sizefit_core::sharpness;
use wasm_bindgen::prelude::*;

/// Luma variance of an RGBA8 buffer.
///
/// # Arguments
///
/// * `rgba` - Pixel data, 4 bytes per pixel, as in `ImageData.data`
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Errors
///
/// Returns an error if the buffer length is not `width * height * 4` or the
/// image has no pixels.
///
/// # Example
///
/// ```typescript
/// const data = ctx.getImageData(0, 0, canvas.width, canvas.height);
/// const score = estimate_sharpness(new Uint8Array(data.data.buffer), data.width, data.height);
/// ```
#[wasm_bindgen]
pub fn estimate_sharpness(rgba: &[u8], width: u32, height: u32) -> Result<f64, JsValue> {
    sharpness::estimate_sharpness_rgba(rgba, width, height)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
