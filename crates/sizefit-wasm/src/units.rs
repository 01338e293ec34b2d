//! Threshold and display helper bindings.

use sizefit_core::units::{self, SizeUnit};
use sizefit_core::ImageFormat;
use wasm_bindgen::prelude::*;

/// Convert a threshold in `"KB"` or `"MB"` to whole bytes.
///
/// # Errors
///
/// Returns an error for an unknown unit or a threshold below one byte.
#[wasm_bindgen]
pub fn target_bytes(threshold: f64, unit: &str) -> Result<f64, JsValue> {
    let unit: SizeUnit = unit
        .parse()
        .map_err(|e: units::UnitError| JsValue::from_str(&e.to_string()))?;
    units::target_bytes(threshold, unit)
        .map(|bytes| bytes as f64)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Format a byte count as `"12.34 KB"`.
#[wasm_bindgen]
pub fn format_kilobytes(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 {
        bytes as u64
    } else {
        0
    };
    units::format_kilobytes(bytes)
}

/// Name for the download link, `resized-image.<original extension>`.
///
/// `mime_type` (the result's `mime_type`, or `File.type`) supplies the
/// extension when the original name has none.
#[wasm_bindgen]
pub fn download_file_name(original_name: &str, mime_type: &str) -> String {
    units::download_file_name(original_name, ImageFormat::from_mime_type(mime_type))
}
