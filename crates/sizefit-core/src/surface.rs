//! Immutable RGBA pixel surface.
//!
//! A `PixelSurface` is what the decoder hands to the rest of the pipeline.
//! It is never mutated: drawing at another size produces a new surface.

use thiserror::Error;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Error returned when a pixel buffer does not describe the requested grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// Pixel data length doesn't match width * height * 4.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    BufferMismatch { expected: usize, actual: usize },
}

/// A decoded image with RGBA8 pixel data in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    /// Create a surface from raw RGBA8 data.
    ///
    /// Zero-area surfaces are accepted here; consumers that need pixels
    /// (such as the sharpness estimator) reject them.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SurfaceError> {
        let expected = expected_len(width, height);
        if pixels.len() != expected {
            return Err(SurfaceError::BufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a surface filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * BYTES_PER_PIXEL).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a surface from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbaImage` for resampling or encoding.
    ///
    /// The pixel buffer is copied; the surface itself stays untouched.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Read a single pixel, or `None` when the coordinate is out of bounds.
    pub fn read(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.pixels[offset..offset + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height as a tuple.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if this surface has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn expected_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_creation() {
        let surface = PixelSurface::new(100, 50, vec![0u8; 100 * 50 * 4]).unwrap();

        assert_eq!(surface.width(), 100);
        assert_eq!(surface.height(), 50);
        assert_eq!(surface.pixel_count(), 5000);
        assert_eq!(surface.pixels().len(), 20000);
        assert!(!surface.is_empty());
    }

    #[test]
    fn test_surface_buffer_mismatch() {
        let err = PixelSurface::new(10, 10, vec![0u8; 10 * 10 * 3]).unwrap_err();
        assert_eq!(
            err,
            SurfaceError::BufferMismatch {
                expected: 400,
                actual: 300
            }
        );
    }

    #[test]
    fn test_surface_empty() {
        let surface = PixelSurface::new(0, 0, vec![]).unwrap();
        assert!(surface.is_empty());

        let surface = PixelSurface::new(0, 7, vec![]).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn test_read_pixel() {
        let pixels = vec![
            255, 0, 0, 255, // (0,0) red
            0, 255, 0, 128, // (1,0) green, half alpha
            0, 0, 255, 255, // (0,1) blue
            9, 9, 9, 0, // (1,1)
        ];
        let surface = PixelSurface::new(2, 2, pixels).unwrap();

        assert_eq!(surface.read(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(surface.read(1, 0), Some([0, 255, 0, 128]));
        assert_eq!(surface.read(0, 1), Some([0, 0, 255, 255]));
        assert_eq!(surface.read(1, 1), Some([9, 9, 9, 0]));
        assert_eq!(surface.read(2, 0), None);
        assert_eq!(surface.read(0, 2), None);
    }

    #[test]
    fn test_filled() {
        let surface = PixelSurface::filled(3, 2, [10, 20, 30, 40]);
        assert_eq!(surface.pixels().len(), 3 * 2 * 4);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(surface.read(x, y), Some([10, 20, 30, 40]));
            }
        }
    }

    #[test]
    fn test_rgba_image_roundtrip_keeps_dimensions() {
        let surface = PixelSurface::filled(4, 3, [1, 2, 3, 4]);
        let img = surface.to_rgba_image().unwrap();
        assert_eq!(img.dimensions(), (4, 3));

        let back = PixelSurface::from_rgba_image(img);
        assert_eq!(back, surface);
    }
}
