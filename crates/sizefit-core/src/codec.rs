//! Decode, draw and encode capabilities used by the fitter.
//!
//! The [`ImageCodec`] trait is the seam between the search loop and the
//! pixel work. Each call is an atomic unit for the fitter: it issues the
//! request, gets a value or a terminal error back, and only then decides what
//! to try next. Nothing is retried at this level.
//!
//! The production implementation is [`RasterCodec`], built on the `image`
//! crate. Tests use a synthetic codec with a size model they control.

use crate::decode::{self, DecodeError, DecodedSource};
use crate::encode::{self, EncodeError};
use crate::format::ImageFormat;
use crate::surface::PixelSurface;

/// A single encode: a surface already drawn at its target size, plus the
/// quality and output format to use.
#[derive(Debug, Clone, Copy)]
pub struct EncodeRequest<'a> {
    surface: &'a PixelSurface,
    quality: f64,
    format: ImageFormat,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(surface: &'a PixelSurface, quality: f64, format: ImageFormat) -> Self {
        Self {
            surface,
            quality,
            format,
        }
    }

    pub fn surface(&self) -> &'a PixelSurface {
        self.surface
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

/// Capabilities the fitter needs from its host.
pub trait ImageCodec {
    /// Turn file bytes into a display-oriented surface and its format.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedSource, DecodeError>;

    /// Draw a surface at the given size. Must not modify `surface`.
    fn draw(&self, surface: &PixelSurface, width: u32, height: u32)
        -> Result<PixelSurface, DecodeError>;

    /// Encode a drawn surface, returning the output file bytes.
    fn encode(&self, request: &EncodeRequest<'_>) -> Result<Vec<u8>, EncodeError>;
}

/// [`ImageCodec`] backed by the `image` crate (JPEG and PNG).
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedSource, DecodeError> {
        decode::decode_image(bytes)
    }

    fn draw(
        &self,
        surface: &PixelSurface,
        width: u32,
        height: u32,
    ) -> Result<PixelSurface, DecodeError> {
        decode::draw(surface, width, height)
    }

    fn encode(&self, request: &EncodeRequest<'_>) -> Result<Vec<u8>, EncodeError> {
        encode::encode_surface(request.surface(), request.format(), request.quality())
    }
}
