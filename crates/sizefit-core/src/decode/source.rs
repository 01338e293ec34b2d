//! Source image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedSource, Orientation};
use crate::format::ImageFormat;
use crate::surface::PixelSurface;

/// Decode image bytes into a display-oriented RGBA surface.
///
/// The container format is sniffed from the magic bytes. EXIF orientation is
/// applied so the surface has the same shape a browser shows for the file.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognizable image.
/// Returns `DecodeError::UnsupportedFormat` for formats other than JPEG and PNG.
/// Returns `DecodeError::CorruptedFile` if decoding fails part way.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedSource, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let detected = reader.format().ok_or(DecodeError::InvalidFormat)?;
    let format = ImageFormat::from_image_format(detected)
        .ok_or_else(|| DecodeError::UnsupportedFormat(format!("{:?}", detected)))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, read_orientation(bytes));

    Ok(DecodedSource {
        surface: PixelSurface::from_rgba_image(oriented.into_rgba8()),
        format,
    })
}

/// Read the EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if there is no EXIF block or no
/// orientation tag.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
