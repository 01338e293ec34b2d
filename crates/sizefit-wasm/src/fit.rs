//! Size fitting WASM bindings.
//!
//! # Functions
//!
//! - [`fit_to_size`] - Fit an image into a threshold given in KB or MB
//! - [`fit_to_size_with_config`] - Same, with a byte target and a custom schedule
//!
//! # Example
//!
//! ```typescript
//! import { fit_to_size_with_config } from '@sizefit/wasm';
//!
//! const result = fit_to_size_with_config(bytes, 250_000, {
//!   qualityFloor: 0.3,
//!   scaleFloor: 0.25,
//!   unattainable: 'fail',
//! });
//! console.log(`${result.width}x${result.height} at q=${result.quality}`);
//! ```

use sizefit_core::{units, FitConfig, FitError, FitResult, RasterCodec, SizeFitter, SizeUnit};
use wasm_bindgen::prelude::*;

/// Completion text when the result fits the threshold.
pub const COMPLETE_MESSAGE: &str = "Image processing is complete!";

/// Completion text when the smallest attempt was still too large.
pub const TARGET_MISSED_MESSAGE: &str = "Processing completed, but the resized image could not meet the requested file size. This may be due to quality or aspect ratio limits being reached.";

/// Shown when the image had to be drawn smaller.
pub const DIMENSIONS_REDUCED_MESSAGE: &str =
    "The aspect ratio of the image was reduced to meet the file size requirements.";

/// The outcome of a fit, ready for a download link and status text.
///
/// The encoded file stays in WASM memory until `bytes` is read, which copies
/// it into a new `Uint8Array`.
#[wasm_bindgen]
pub struct JsFitResult {
    inner: FitResult,
}

#[wasm_bindgen]
impl JsFitResult {
    /// Encoded file bytes as a `Uint8Array` (a copy).
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.inner.candidate.bytes.as_slice())
    }

    /// Encoded size in bytes.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.inner.candidate.size() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.candidate.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.candidate.height
    }

    /// Encoder quality of the returned file (0.0 to 1.0).
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f64 {
        self.inner.candidate.quality
    }

    /// MIME type for a `Blob`, `"image/jpeg"` or `"image/png"`.
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.candidate.format.mime_type().to_string()
    }

    /// Whether any attempt was drawn smaller than the original.
    #[wasm_bindgen(getter)]
    pub fn dimensions_reduced(&self) -> bool {
        self.inner.dimensions_reduced
    }

    /// Whether the returned file is smaller than the original in either axis.
    #[wasm_bindgen(getter)]
    pub fn candidate_reduced(&self) -> bool {
        self.inner.candidate_reduced()
    }

    #[wasm_bindgen(getter)]
    pub fn met_target(&self) -> bool {
        self.inner.met_target
    }

    #[wasm_bindgen(getter)]
    pub fn sharpness_score(&self) -> f64 {
        self.inner.sharpness_score
    }

    /// Number of encodes the search performed.
    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> u32 {
        self.inner.iterations() as u32
    }

    /// Text for the completion alert.
    pub fn status_message(&self) -> String {
        if self.inner.met_target {
            COMPLETE_MESSAGE.to_string()
        } else {
            TARGET_MISSED_MESSAGE.to_string()
        }
    }

    /// Text for the aspect ratio feedback line, empty when the returned
    /// image kept its original dimensions.
    pub fn aspect_ratio_feedback(&self) -> String {
        if self.inner.candidate_reduced() {
            DIMENSIONS_REDUCED_MESSAGE.to_string()
        } else {
            String::new()
        }
    }
}

/// Fit an image into a threshold entered in the page's units.
///
/// # Arguments
///
/// * `bytes` - The original JPEG or PNG file as a `Uint8Array`
/// * `threshold` - Maximum size, in `unit`
/// * `unit` - `"KB"` or `"MB"` (multiples of 1024)
///
/// # Errors
///
/// Returns an error if the unit or threshold is invalid, or if the image
/// cannot be decoded or encoded. A target that cannot be reached is not an
/// error; check `met_target`.
#[wasm_bindgen]
pub fn fit_to_size(bytes: &[u8], threshold: f64, unit: &str) -> Result<JsFitResult, JsValue> {
    let unit: SizeUnit = unit
        .parse()
        .map_err(|e: units::UnitError| JsValue::from_str(&e.to_string()))?;
    let target =
        units::target_bytes(threshold, unit).map_err(|e| JsValue::from_str(&e.to_string()))?;

    run_fit(bytes, target, FitConfig::default()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Fit an image into `target_bytes` bytes with a custom schedule.
///
/// `config` is a plain object with any of `initialQuality`, `qualityStep`,
/// `qualityFloor`, `scaleStep`, `scaleFloor` and `unattainable`
/// (`"bestEffort"` or `"fail"`). Missing fields keep their defaults;
/// `undefined` or `null` means the default schedule.
///
/// # Errors
///
/// Returns an error if the target is below one byte, the config is malformed,
/// the image cannot be processed, or `unattainable` is `"fail"` and no
/// attempt fit.
#[wasm_bindgen]
pub fn fit_to_size_with_config(
    bytes: &[u8],
    target_bytes: f64,
    config: JsValue,
) -> Result<JsFitResult, JsValue> {
    let config: FitConfig = if config.is_undefined() || config.is_null() {
        FitConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid fit config: {}", e)))?
    };

    let target = whole_bytes(target_bytes)
        .ok_or_else(|| JsValue::from_str(&FitError::InvalidTarget.to_string()))?;

    run_fit(bytes, target, config).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Floor a JS number to a byte count, rejecting anything below one byte.
fn whole_bytes(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 1.0 && value <= u64::MAX as f64 {
        Some(value.floor() as u64)
    } else {
        None
    }
}

fn run_fit(bytes: &[u8], target: u64, config: FitConfig) -> Result<JsFitResult, FitError> {
    let result = SizeFitter::new(RasterCodec).with_config(config).fit(bytes, target)?;
    Ok(JsFitResult { inner: result })
}
