//! Image container formats handled by the fitter.
//!
//! The output is always written in the source's format; there is no format
//! conversion.

use serde::{Deserialize, Serialize};

/// A supported image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossy JPEG; quality controls output size.
    Jpeg,
    /// Lossless PNG; quality is ignored by the encoder.
    Png,
}

impl ImageFormat {
    /// MIME type, as the browser reports it for an uploaded file.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    /// Whether the encoder's quality parameter affects output size.
    pub fn is_lossy(self) -> bool {
        matches!(self, ImageFormat::Jpeg)
    }

    /// Map from the image crate's format, if supported.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// Map from a MIME type such as `image/jpeg`.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}
