//! Image encoding for SizeFit.
//!
//! This module provides functionality for:
//! - Encoding surfaces to JPEG with a canvas-style `[0.0, 1.0]` quality
//! - Encoding surfaces to lossless PNG
//!
//! # Examples
//!
//! ```ignore
//! use sizefit_core::encode::encode_surface;
//! use sizefit_core::{ImageFormat, PixelSurface};
//!
//! let surface = PixelSurface::filled(100, 100, [128, 128, 128, 255]);
//! let jpeg_bytes = encode_surface(&surface, ImageFormat::Jpeg, 0.9).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod raster;

pub use raster::{encode_surface, jpeg_quality, EncodeError, DEFAULT_QUALITY};
