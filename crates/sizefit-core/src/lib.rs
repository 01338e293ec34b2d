//! SizeFit Core - Image size fitting library
//!
//! This crate re-encodes JPEG and PNG images until they fit a byte budget,
//! lowering encoder quality first and pixel dimensions second, and reports a
//! sharpness score for the result.

pub mod codec;
pub mod decode;
pub mod encode;
pub mod fit;
pub mod format;
pub mod luminance;
pub mod sharpness;
pub mod surface;
pub mod units;

pub use codec::{EncodeRequest, ImageCodec, RasterCodec};
pub use fit::{
    fit, EncodedCandidate, FitAttempt, FitConfig, FitError, FitResult, SizeFitter,
    UnattainablePolicy,
};
pub use format::ImageFormat;
pub use sharpness::{estimate_sharpness, estimate_sharpness_rgba, SharpnessError};
pub use surface::{PixelSurface, SurfaceError};
pub use units::{download_file_name, format_kilobytes, target_bytes, SizeUnit, UnitError};
