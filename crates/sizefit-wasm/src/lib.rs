//! SizeFit WASM - WebAssembly bindings for SizeFit
//!
//! This crate exposes the sizefit-core fitter to a browser page, typically
//! from inside a Web Worker so the search does not block the UI thread.
//!
//! # Module Structure
//!
//! - `fit` - Fit an uploaded image into a size threshold
//! - `sharpness` - Sharpness score for canvas `ImageData`
//! - `units` - Threshold conversion and display helpers
//!
//! `init` routes the core's `log` records to the browser console, so every
//! fit attempt shows up at the console's verbose level.
//!
//! # Usage
//!
//! ```typescript
//! import init, { fit_to_size, format_kilobytes, download_file_name } from '@sizefit/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = fit_to_size(bytes, 100, 'KB');
//! sizeLabel.textContent = format_kilobytes(result.size);
//! statusLabel.textContent = result.status_message();
//! link.download = download_file_name(file.name, result.mime_type);
//! link.href = URL.createObjectURL(new Blob([result.bytes], { type: result.mime_type }));
//! ```

use wasm_bindgen::prelude::*;

mod fit;
mod logger;
mod sharpness;
mod units;

pub use fit::{fit_to_size, fit_to_size_with_config, JsFitResult};
pub use sharpness::estimate_sharpness;
pub use units::{download_file_name, format_kilobytes, target_bytes};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Debug);
    log::debug!("sizefit-wasm {} loaded", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
