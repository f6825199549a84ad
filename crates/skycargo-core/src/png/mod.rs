//! PNG encoding for generated raster assets.
//!
//! This module provides functionality for:
//! - CRC-32 checksums for chunk trailers
//! - Framing typed, length-prefixed chunks
//! - Assembling a complete 8-bit truecolor PNG file
//!
//! # Architecture
//!
//! Data flows one way: pixels → filtered scanlines → zlib stream → `IDAT`.
//! The container is always signature, `IHDR`, one `IDAT`, `IEND`. No other
//! chunk types, color modes or interlacing are produced.
//!
//! # Examples
//!
//! ```ignore
//! use skycargo_core::png::{encode_to_vec, RasterImage, Rgb};
//!
//! let image = RasterImage::from_fn(64, 64, |row, _| Rgb::new(row as u8, 0, 255));
//! let png_bytes = encode_to_vec(&image).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod chunk;
mod crc;
mod encoder;
mod types;

pub use chunk::{chunk_crc, frame, write_chunk, ChunkType, CHUNK_OVERHEAD};
pub use crc::{crc32, Crc32};
pub use encoder::{
    compress, encode, encode_to_vec, header_payload, scanlines, write_png, PngEncoder,
    PNG_SIGNATURE,
};
pub use types::{
    validate_dimensions, EncodeError, EncoderState, FormatError, RasterImage, Rgb, MAX_DIMENSION,
};
