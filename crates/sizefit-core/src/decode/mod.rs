//! Image decoding for SizeFit.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG bytes into an RGBA [`PixelSurface`](crate::PixelSurface)
//! - Applying EXIF orientation so the surface matches what a browser displays
//! - Drawing a surface at a reduced size
//!
//! # Architecture
//!
//! All operations are synchronous and single-threaded within WASM. They are
//! wrapped by [`RasterCodec`](crate::RasterCodec) for use by the fitter.
//!
//! # Examples
//!
//! ```ignore
//! use sizefit_core::decode::{decode_image, draw};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let source = decode_image(&bytes).unwrap();
//! let half = draw(&source.surface, source.surface.width() / 2, source.surface.height() / 2).unwrap();
//! ```

mod draw;
mod source;
mod types;

pub use draw::{draw, scaled_dimensions};
pub use source::{decode_image, read_orientation};
pub use types::{DecodeError, DecodedSource, Orientation};
