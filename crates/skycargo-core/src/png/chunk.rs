//! PNG chunk framing.
//!
//! Every chunk on disk is laid out as
//!
//! ```text
//! length (4, BE) | type (4) | payload (length) | crc32(type ‖ payload) (4, BE)
//! ```

use super::crc::Crc32;
use super::types::{EncodeError, FormatError};
use std::fmt;
use std::io::Write;

/// Length, type and CRC fields around every payload.
pub const CHUNK_OVERHEAD: usize = 12;

/// A 4-byte chunk type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Image header: geometry and color format.
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    /// Compressed image data.
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    /// End of the image stream.
    pub const IEND: ChunkType = ChunkType(*b"IEND");

    /// The four ASCII bytes of the type code, as written on the wire.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Checksum stored in the chunk trailer.
pub fn chunk_crc(chunk_type: ChunkType, payload: &[u8]) -> u32 {
    Crc32::new()
        .update(chunk_type.as_bytes())
        .update(payload)
        .finalize()
}

fn payload_len(payload: &[u8]) -> Result<u32, FormatError> {
    u32::try_from(payload.len()).map_err(|_| FormatError::PayloadTooLarge { len: payload.len() })
}

/// Frame a payload into a complete chunk.
///
/// The result is always `payload.len() + 12` bytes long.
pub fn frame(chunk_type: ChunkType, payload: &[u8]) -> Result<Vec<u8>, FormatError> {
    let len = payload_len(payload)?;

    let mut out = Vec::with_capacity(payload.len() + CHUNK_OVERHEAD);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(chunk_type.as_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&chunk_crc(chunk_type, payload).to_be_bytes());
    Ok(out)
}

/// Write a framed chunk straight to a sink.
///
/// Writes exactly `payload.len() + 12` bytes and returns that count. The sink
/// is neither flushed nor closed.
pub fn write_chunk<W: Write>(
    sink: &mut W,
    chunk_type: ChunkType,
    payload: &[u8],
) -> Result<usize, EncodeError> {
    let len = payload_len(payload)?;

    sink.write_all(&len.to_be_bytes())?;
    sink.write_all(chunk_type.as_bytes())?;
    sink.write_all(payload)?;
    sink.write_all(&chunk_crc(chunk_type, payload).to_be_bytes())?;

    tracing::debug!(chunk = %chunk_type, len, "wrote chunk");
    Ok(payload.len() + CHUNK_OVERHEAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Sink that accepts a fixed number of bytes and then fails.
    struct LimitedSink {
        written: Vec<u8>,
        capacity: usize,
    }

    impl Write for LimitedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.capacity - self.written.len();
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "sink full"));
            }
            let n = buf.len().min(room);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            panic!("chunk writer must not flush");
        }
    }

    #[test]
    fn test_frame_iend() {
        let chunk = frame(ChunkType::IEND, &[]).unwrap();
        assert_eq!(
            chunk,
            vec![0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_frame_layout() {
        let payload = [1u8, 2, 3, 4, 5];
        let chunk = frame(ChunkType::IDAT, &payload).unwrap();

        assert_eq!(chunk.len(), payload.len() + CHUNK_OVERHEAD);
        assert_eq!(&chunk[0..4], &5u32.to_be_bytes());
        assert_eq!(&chunk[4..8], b"IDAT");
        assert_eq!(&chunk[8..13], &payload);
        assert_eq!(
            &chunk[13..],
            &chunk_crc(ChunkType::IDAT, &payload).to_be_bytes()
        );
    }

    #[test]
    fn test_crc_covers_type_and_payload() {
        let mut joined = b"IHDR".to_vec();
        joined.extend_from_slice(&[9, 9, 9]);
        assert_eq!(
            chunk_crc(ChunkType::IHDR, &[9, 9, 9]),
            crate::png::crc::crc32(&joined)
        );
    }

    #[test]
    fn test_write_chunk_matches_frame() {
        let payload = b"some payload bytes";
        let mut sink = Vec::new();

        let written = write_chunk(&mut sink, ChunkType::IDAT, payload).unwrap();

        assert_eq!(written, payload.len() + CHUNK_OVERHEAD);
        assert_eq!(sink, frame(ChunkType::IDAT, payload).unwrap());
    }

    #[test]
    fn test_write_chunk_appends() {
        let mut sink = vec![0xAA];
        write_chunk(&mut sink, ChunkType::IEND, &[]).unwrap();
        assert_eq!(sink.len(), 1 + CHUNK_OVERHEAD);
        assert_eq!(sink[0], 0xAA);
    }

    #[test]
    fn test_write_chunk_propagates_io_error() {
        let mut sink = LimitedSink {
            written: Vec::new(),
            capacity: 6,
        };

        let result = write_chunk(&mut sink, ChunkType::IDAT, &[1, 2, 3]);

        assert!(matches!(result, Err(EncodeError::Io(_))));
        assert_eq!(sink.written.len(), 6);
    }

    #[test]
    fn test_chunk_type_display() {
        assert_eq!(ChunkType::IHDR.to_string(), "IHDR");
        assert_eq!(ChunkType::IEND.to_string(), "IEND");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
