//! Core types for PNG encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Largest width or height a PNG header may carry (2^31 - 1).
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Error raised when a chunk cannot be represented in the container format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Chunk payload does not fit in the 32-bit length field.
    #[error("Chunk payload of {len} bytes exceeds the 32-bit length field")]
    PayloadTooLarge { len: usize },
}

/// Error types for PNG encoding operations.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero or out of range, or the pixel count is wrong.
    #[error("Invalid geometry: {width}x{height} image with {pixels} pixels")]
    InvalidGeometry { width: u32, height: u32, pixels: usize },

    /// Chunk payload does not fit in the 32-bit length field.
    #[error("Chunk payload of {len} bytes exceeds the 32-bit length field")]
    PayloadTooLarge { len: usize },

    /// An encoding step was invoked in the wrong state.
    #[error("Encoding step called out of order in state {state}")]
    OutOfOrder { state: EncoderState },

    /// The output sink rejected a write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FormatError> for EncodeError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::PayloadTooLarge { len } => EncodeError::PayloadTooLarge { len },
        }
    }
}

/// Progress of a single encode, in the order the container is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    /// Nothing written yet.
    Created,
    /// The 8-byte PNG signature is on the sink.
    SignatureWritten,
    /// `IHDR` is on the sink.
    HeaderChunkWritten,
    /// `IDAT` is on the sink.
    DataChunkWritten,
    /// `IEND` is on the sink; the file is complete.
    Terminated,
    /// A step failed; no further writes are attempted.
    Failed,
}

impl fmt::Display for EncoderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncoderState::Created => "Created",
            EncoderState::SignatureWritten => "SignatureWritten",
            EncoderState::HeaderChunkWritten => "HeaderChunkWritten",
            EncoderState::DataChunkWritten => "DataChunkWritten",
            EncoderState::Terminated => "Terminated",
            EncoderState::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Check that both dimensions fit a PNG header, i.e. lie in `1..=MAX_DIMENSION`.
///
/// Pixel sources call this before materializing anything, so an oversized
/// request fails fast instead of trying to allocate the buffer.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), EncodeError> {
    let in_range = |d: u32| (1..=MAX_DIMENSION).contains(&d);
    if !in_range(width) || !in_range(height) {
        return Err(EncodeError::InvalidGeometry {
            width,
            height,
            pixels: 0,
        });
    }
    Ok(())
}

/// An 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self([r, g, b])
    }
}

/// A true-color raster image ready to be encoded.
///
/// Pixels are stored row-major, `width * height` of them. Geometry is not
/// checked here; [`encode`](super::encode) validates it before writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Row-major pixel data.
    pub pixels: Vec<Rgb>,
}

impl RasterImage {
    /// Wrap an already materialized pixel sequence.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Materialize an image from a pixel source called as `f(row, col)`.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgb,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                pixels.push(f(row, col));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Check the geometry against the PNG header limits and the pixel count.
    pub fn validate(&self) -> Result<(), EncodeError> {
        let invalid = || EncodeError::InvalidGeometry {
            width: self.width,
            height: self.height,
            pixels: self.pixels.len(),
        };

        validate_dimensions(self.width, self.height).map_err(|_| invalid())?;

        let expected = self.width as u64 * self.height as u64;
        if self.pixels.len() as u64 != expected {
            return Err(invalid());
        }
        Ok(())
    }

    /// Bytes in one filtered scanline: the filter byte plus three per pixel.
    pub fn stride(&self) -> usize {
        1 + self.width as usize * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_is_row_major() {
        let image = RasterImage::from_fn(3, 2, |row, col| Rgb::new(row as u8, col as u8, 0));

        assert_eq!(image.pixels.len(), 6);
        assert_eq!(image.pixels[0], Rgb::new(0, 0, 0));
        assert_eq!(image.pixels[2], Rgb::new(0, 2, 0));
        assert_eq!(image.pixels[3], Rgb::new(1, 0, 0));
        assert_eq!(image.pixels[5], Rgb::new(1, 2, 0));
    }

    #[test]
    fn test_validate_ok() {
        let image = RasterImage::new(2, 1, vec![Rgb::new(10, 20, 30), Rgb::new(40, 50, 60)]);
        assert!(image.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_width() {
        let image = RasterImage::new(0, 5, vec![]);
        assert!(matches!(
            image.validate(),
            Err(EncodeError::InvalidGeometry { width: 0, height: 5, pixels: 0 })
        ));
    }

    #[test]
    fn test_validate_zero_height() {
        let image = RasterImage::new(5, 0, vec![]);
        assert!(matches!(image.validate(), Err(EncodeError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_validate_wrong_pixel_count() {
        let image = RasterImage::new(5, 5, vec![Rgb::default(); 12]);
        assert!(matches!(
            image.validate(),
            Err(EncodeError::InvalidGeometry { pixels: 12, .. })
        ));
    }

    #[test]
    fn test_validate_dimension_above_png_limit() {
        let image = RasterImage::new(MAX_DIMENSION + 1, 1, vec![]);
        assert!(matches!(image.validate(), Err(EncodeError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(validate_dimensions(1, 1).is_ok());
        assert!(validate_dimensions(MAX_DIMENSION, 1).is_ok());
        assert!(matches!(
            validate_dimensions(MAX_DIMENSION + 1, 1),
            Err(EncodeError::InvalidGeometry { pixels: 0, .. })
        ));
        assert!(validate_dimensions(1, 0).is_err());
        assert!(validate_dimensions(0, 1).is_err());
    }

    #[test]
    fn test_stride() {
        let image = RasterImage::new(4, 1, vec![Rgb::default(); 4]);
        assert_eq!(image.stride(), 13);
    }

    #[test]
    fn test_format_error_converts() {
        let err: EncodeError = FormatError::PayloadTooLarge { len: 7 }.into();
        assert!(matches!(err, EncodeError::PayloadTooLarge { len: 7 }));
    }

    #[test]
    fn test_rgb_from_tuple() {
        assert_eq!(Rgb::from((1, 2, 3)), Rgb::new(1, 2, 3));
    }
}
