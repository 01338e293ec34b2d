//! Fitting an encoded image into a byte budget.
//!
//! [`SizeFitter`] decodes the source once, then re-encodes it at decreasing
//! quality and, if that is not enough, at decreasing pixel dimensions until a
//! candidate is no larger than the target. The schedule is described by
//! [`FitConfig`].
//!
//! # Examples
//!
//! ```ignore
//! use sizefit_core::fit::{FitConfig, SizeFitter};
//! use sizefit_core::RasterCodec;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let fitter = SizeFitter::new(RasterCodec).with_config(FitConfig::new().strict());
//! let result = fitter.fit(&bytes, 200 * 1024).unwrap();
//! std::fs::write("out.jpg", &result.candidate.bytes).unwrap();
//! ```

mod config;
mod fitter;
mod types;

pub use config::{ConfigError, FitConfig, UnattainablePolicy, MAX_STEPS_PER_AXIS};
pub use fitter::{fit, SizeFitter};
pub use types::{EncodedCandidate, FitAttempt, FitError, FitResult};
