//! PNG container assembly.
//!
//! Writes the signature, `IHDR`, a single `IDAT` and `IEND`, strictly in that
//! order. Bytes already written before a failure are left on the sink; the
//! caller owns the sink and decides whether to discard a partial file.

use super::chunk::{write_chunk, ChunkType};
use super::types::{EncodeError, EncoderState, RasterImage};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// The fixed 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Bits per sample.
pub const BIT_DEPTH: u8 = 8;

/// Truecolor without alpha.
pub const COLOR_TYPE_RGB: u8 = 2;

/// Filter type 0 ("None"), prepended to every scanline.
const FILTER_NONE: u8 = 0;

/// Build the 13-byte `IHDR` payload.
pub fn header_payload(width: u32, height: u32) -> [u8; 13] {
    let mut payload = [0u8; 13];
    payload[0..4].copy_from_slice(&width.to_be_bytes());
    payload[4..8].copy_from_slice(&height.to_be_bytes());
    payload[8] = BIT_DEPTH;
    payload[9] = COLOR_TYPE_RGB;
    // compression, filter and interlace methods stay 0
    payload
}

/// Lay the pixels out as filtered scanlines, filter byte 0 before each row.
///
/// The result is exactly `height * (1 + width * 3)` bytes.
pub fn scanlines(image: &RasterImage) -> Vec<u8> {
    let width = image.width as usize;
    if width == 0 {
        return Vec::new();
    }
    let mut buffer = Vec::with_capacity(image.stride() * image.height as usize);

    for row in image.pixels.chunks_exact(width) {
        buffer.push(FILTER_NONE);
        for pixel in row {
            buffer.extend_from_slice(&pixel.0);
        }
    }
    buffer
}

/// Deflate a buffer into a zlib stream at maximum compression.
pub fn compress(raw: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(raw)?;
    encoder.finish()
}

// ============================================================================
// Encoder State Machine
// ============================================================================

/// Step-by-step PNG writer over an exclusively owned sink.
///
/// Each step is valid in exactly one state and advances to the next one.
/// A failed step leaves the encoder in [`EncoderState::Failed`], and every
/// later call is rejected without touching the sink.
///
/// Only a failing step can move the encoder into `Failed`:
///
/// ```compile_fail
/// use skycargo_core::png::PngEncoder;
///
/// let mut encoder = PngEncoder::new(Vec::new());
/// encoder.fail();
/// ```
#[derive(Debug)]
pub struct PngEncoder<W: Write> {
    sink: W,
    state: EncoderState,
}

impl<W: Write> PngEncoder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: EncoderState::Created,
        }
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// Write the 8-byte file signature.
    pub fn write_signature(&mut self) -> Result<(), EncodeError> {
        self.advance(EncoderState::Created, EncoderState::SignatureWritten, |sink| {
            sink.write_all(&PNG_SIGNATURE)?;
            Ok(())
        })
    }

    /// Write the `IHDR` chunk.
    pub fn write_header(&mut self, width: u32, height: u32) -> Result<(), EncodeError> {
        self.advance(
            EncoderState::SignatureWritten,
            EncoderState::HeaderChunkWritten,
            |sink| write_chunk(sink, ChunkType::IHDR, &header_payload(width, height)).map(drop),
        )
    }

    /// Write the `IDAT` chunk from an already compressed payload.
    pub fn write_data(&mut self, compressed: &[u8]) -> Result<(), EncodeError> {
        self.advance(
            EncoderState::HeaderChunkWritten,
            EncoderState::DataChunkWritten,
            |sink| write_chunk(sink, ChunkType::IDAT, compressed).map(drop),
        )
    }

    /// Write the empty `IEND` chunk.
    pub fn write_end(&mut self) -> Result<(), EncodeError> {
        self.advance(
            EncoderState::DataChunkWritten,
            EncoderState::Terminated,
            |sink| write_chunk(sink, ChunkType::IEND, &[]).map(drop),
        )
    }

    /// Flush a completed stream and hand the sink back.
    pub fn finish(mut self) -> Result<W, EncodeError> {
        if self.state != EncoderState::Terminated {
            return Err(EncodeError::OutOfOrder { state: self.state });
        }
        self.sink.flush()?;
        Ok(self.sink)
    }

    /// Mark the encoder failed when a step outside the sink fails.
    fn fail(&mut self) {
        self.state = EncoderState::Failed;
    }

    fn advance<F>(
        &mut self,
        expected: EncoderState,
        next: EncoderState,
        step: F,
    ) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut W) -> Result<(), EncodeError>,
    {
        if self.state != expected {
            return Err(EncodeError::OutOfOrder { state: self.state });
        }
        match step(&mut self.sink) {
            Ok(()) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                self.state = EncoderState::Failed;
                Err(e)
            }
        }
    }
}

/// Encode an image as a PNG onto `sink`.
///
/// # Arguments
///
/// * `image` - Pixels and geometry; width and height must be in `1..=MAX_DIMENSION`
/// * `sink` - Output stream, owned by the encode for its whole duration
///
/// # Returns
///
/// `Ok(())` once signature, `IHDR`, `IDAT` and `IEND` are written and the
/// sink is flushed. The sink is dropped on every path.
///
/// # Errors
///
/// * [`EncodeError::InvalidGeometry`] before anything is written
/// * [`EncodeError::PayloadTooLarge`] if the compressed data exceeds a chunk
/// * [`EncodeError::Io`] if the sink rejects a write; bytes already written
///   are not rolled back
///
/// # Example
///
/// ```
/// use skycargo_core::png::{encode, RasterImage, Rgb, PNG_SIGNATURE};
///
/// let image = RasterImage::new(2, 1, vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);
/// let mut bytes = Vec::new();
/// encode(&image, &mut bytes).unwrap();
///
/// assert_eq!(&bytes[..8], &PNG_SIGNATURE);
/// assert_eq!(&bytes[bytes.len() - 8..bytes.len() - 4], b"IEND");
/// ```
pub fn encode<W: Write>(image: &RasterImage, sink: W) -> Result<(), EncodeError> {
    // Validate geometry before touching the sink
    image.validate()?;

    let mut encoder = PngEncoder::new(sink);
    encoder.write_signature()?;
    encoder.write_header(image.width, image.height)?;

    // Filter and deflate the pixel data
    let compressed = match compress(&scanlines(image)) {
        Ok(bytes) => bytes,
        Err(e) => {
            encoder.fail();
            return Err(e.into());
        }
    };
    encoder.write_data(&compressed)?;
    encoder.write_end()?;
    encoder.finish()?;

    tracing::debug!(
        width = image.width,
        height = image.height,
        idat_len = compressed.len(),
        "encoded png"
    );
    Ok(())
}

/// Encode an image into an in-memory PNG file.
///
/// Same contract as [`encode`], with a `Vec` as the sink.
pub fn encode_to_vec(image: &RasterImage) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::new();
    encode(image, &mut bytes)?;
    Ok(bytes)
}

/// Encode an image into a new file at `path`, replacing any existing file.
///
/// # Arguments
///
/// * `path` - Destination file; its parent directory must exist
/// * `image` - Pixels and geometry to encode
///
/// # Errors
///
/// Geometry is validated before the file is created, so an
/// [`EncodeError::InvalidGeometry`] leaves the filesystem untouched. Any other
/// error may leave a partial file behind; removing it is up to the caller.
///
/// # Example
///
/// ```no_run
/// use skycargo_core::{sky_icon, write_png, IconGeometry};
/// use std::path::Path;
///
/// let icon = sky_icon(IconGeometry::default()).unwrap();
/// write_png(Path::new("icon.png"), &icon).unwrap();
/// ```
pub fn write_png(path: &Path, image: &RasterImage) -> Result<(), EncodeError> {
    // Validate geometry before creating the file
    image.validate()?;
    let file = File::create(path)?;
    encode(image, BufWriter::new(file))?;
    tracing::info!(path = %path.display(), width = image.width, height = image.height, "wrote png");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::chunk::CHUNK_OVERHEAD;
    use crate::png::crc::crc32;
    use crate::png::types::Rgb;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    /// A chunk as found in an encoded file.
    struct RawChunk<'a> {
        tag: &'a [u8],
        payload: &'a [u8],
        crc: u32,
    }

    /// Split an encoded file into its chunks, after the signature.
    fn parse_chunks(bytes: &[u8]) -> Vec<RawChunk<'_>> {
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
        let mut chunks = Vec::new();
        let mut pos = 8;
        while pos < bytes.len() {
            let len = u32::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap()) as usize;
            let tag = &bytes[pos + 4..pos + 8];
            let payload = &bytes[pos + 8..pos + 8 + len];
            let crc = u32::from_be_bytes(bytes[pos + 8 + len..pos + 12 + len].try_into().unwrap());
            chunks.push(RawChunk { tag, payload, crc });
            pos += len + CHUNK_OVERHEAD;
        }
        assert_eq!(pos, bytes.len());
        chunks
    }

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    fn two_pixel_image() -> RasterImage {
        RasterImage::new(2, 1, vec![Rgb::new(10, 20, 30), Rgb::new(40, 50, 60)])
    }

    /// Sink that fails once a byte budget is spent.
    struct FailingSink {
        written: usize,
        budget: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written >= self.budget {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.budget - self.written);
            self.written += n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_header_payload() {
        let payload = header_payload(512, 256);
        assert_eq!(payload, [0, 0, 2, 0, 0, 0, 1, 0, 8, 2, 0, 0, 0]);
    }

    #[test]
    fn test_scanlines_two_pixels() {
        assert_eq!(scanlines(&two_pixel_image()), vec![0, 10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_scanlines_filter_byte_per_row() {
        let image = RasterImage::from_fn(2, 3, |row, _| Rgb::new(row as u8 + 1, 0, 0));
        let buffer = scanlines(&image);

        assert_eq!(buffer.len(), 3 * (1 + 2 * 3));
        for row in buffer.chunks_exact(7) {
            assert_eq!(row[0], 0);
        }
        assert_eq!(&buffer[7..14], &[0, 2, 0, 0, 2, 0, 0]);
    }

    #[test]
    fn test_compress_is_lossless() {
        let raw: Vec<u8> = (0..5000).map(|i| (i % 251) as u8).collect();
        assert_eq!(inflate(&compress(&raw).unwrap()), raw);
    }

    #[test]
    fn test_encode_two_pixel_scenario() {
        let bytes = encode_to_vec(&two_pixel_image()).unwrap();
        let chunks = parse_chunks(&bytes);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].tag, b"IHDR");
        assert_eq!(chunks[0].payload, &[0, 0, 0, 2, 0, 0, 0, 1, 8, 2, 0, 0, 0]);
        assert_eq!(chunks[1].tag, b"IDAT");
        assert_eq!(inflate(chunks[1].payload), vec![0, 10, 20, 30, 40, 50, 60]);
        assert_eq!(chunks[2].tag, b"IEND");
        assert!(chunks[2].payload.is_empty());
    }

    #[test]
    fn test_encode_chunk_checksums() {
        let bytes = encode_to_vec(&two_pixel_image()).unwrap();
        for chunk in parse_chunks(&bytes) {
            let mut covered = chunk.tag.to_vec();
            covered.extend_from_slice(chunk.payload);
            assert_eq!(chunk.crc, crc32(&covered));
        }
    }

    #[test]
    fn test_encode_ends_with_iend() {
        let bytes = encode_to_vec(&two_pixel_image()).unwrap();
        assert_eq!(
            &bytes[bytes.len() - 12..],
            &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_encode_zero_width() {
        let result = encode_to_vec(&RasterImage::new(0, 5, vec![]));
        assert!(matches!(result, Err(EncodeError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_encode_wrong_pixel_count() {
        let result = encode_to_vec(&RasterImage::new(5, 5, vec![Rgb::default(); 12]));
        assert!(matches!(result, Err(EncodeError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_invalid_geometry_writes_nothing() {
        let mut sink = Vec::new();
        let result = encode(&RasterImage::new(5, 5, vec![]), &mut sink);
        assert!(result.is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_io_failure_mid_stream() {
        // Room for the signature and part of IHDR
        let sink = FailingSink {
            written: 0,
            budget: 14,
        };
        let result = encode(&two_pixel_image(), sink);
        assert!(matches!(result, Err(EncodeError::Io(_))));
    }

    #[test]
    fn test_state_transitions() {
        let mut encoder = PngEncoder::new(Vec::new());
        assert_eq!(encoder.state(), EncoderState::Created);

        encoder.write_signature().unwrap();
        assert_eq!(encoder.state(), EncoderState::SignatureWritten);

        encoder.write_header(1, 1).unwrap();
        assert_eq!(encoder.state(), EncoderState::HeaderChunkWritten);

        encoder.write_data(&compress(&[0, 1, 2, 3]).unwrap()).unwrap();
        assert_eq!(encoder.state(), EncoderState::DataChunkWritten);

        encoder.write_end().unwrap();
        assert_eq!(encoder.state(), EncoderState::Terminated);

        let bytes = encoder.finish().unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_out_of_order_step_rejected() {
        let mut encoder = PngEncoder::new(Vec::new());
        let result = encoder.write_header(1, 1);

        assert!(matches!(
            result,
            Err(EncodeError::OutOfOrder { state: EncoderState::Created })
        ));
        // Rejected steps do not write or change state
        assert_eq!(encoder.state(), EncoderState::Created);
    }

    #[test]
    fn test_finish_before_terminated_rejected() {
        let mut encoder = PngEncoder::new(Vec::new());
        encoder.write_signature().unwrap();
        assert!(matches!(
            encoder.finish(),
            Err(EncodeError::OutOfOrder { state: EncoderState::SignatureWritten })
        ));
    }

    #[test]
    fn test_failed_state_is_terminal() {
        let mut encoder = PngEncoder::new(FailingSink {
            written: 0,
            budget: 4,
        });
        assert!(encoder.write_signature().is_err());
        assert_eq!(encoder.state(), EncoderState::Failed);

        assert!(matches!(
            encoder.write_signature(),
            Err(EncodeError::OutOfOrder { state: EncoderState::Failed })
        ));
        assert!(matches!(
            encoder.write_end(),
            Err(EncodeError::OutOfOrder { state: EncoderState::Failed })
        ));
    }

    #[test]
    fn test_fail_rejects_remaining_steps() {
        let mut bytes = Vec::new();
        let mut encoder = PngEncoder::new(&mut bytes);
        encoder.write_signature().unwrap();
        encoder.write_header(1, 1).unwrap();

        encoder.fail();

        assert_eq!(encoder.state(), EncoderState::Failed);
        assert!(matches!(
            encoder.write_data(&[]),
            Err(EncodeError::OutOfOrder { state: EncoderState::Failed })
        ));
        assert!(encoder.finish().is_err());
        assert_eq!(bytes.len(), PNG_SIGNATURE.len() + 13 + CHUNK_OVERHEAD);
    }

    #[test]
    fn test_deterministic_output() {
        let image = RasterImage::from_fn(16, 16, |row, col| Rgb::new(row as u8, col as u8, 7));
        assert_eq!(encode_to_vec(&image).unwrap(), encode_to_vec(&image).unwrap());
    }

    #[test]
    fn test_write_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        write_png(&path, &two_pixel_image()).unwrap();

        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk, encode_to_vec(&two_pixel_image()).unwrap());
    }

    #[test]
    fn test_write_png_invalid_geometry_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");

        assert!(write_png(&path, &RasterImage::new(0, 1, vec![])).is_err());
        assert!(!path.exists());
    }
}

// ============================================================================
// Decoder Interoperability Tests
// ============================================================================


// ============================================================================
// Property-Based Tests
// ============================================================================
