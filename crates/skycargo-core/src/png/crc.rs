//! CRC-32 checksum used to protect every PNG chunk.
//!
//! This is the reflected CRC-32 with polynomial `0xEDB88320` (the same one used
//! by zlib and gzip), so any conforming PNG reader accepts the trailers we write.
//! It detects accidental corruption only and is not a cryptographic hash.

/// Reflected CRC-32 polynomial.
pub const POLYNOMIAL: u32 = 0xEDB8_8320;

// ============================================================================
// Lookup Table
// ============================================================================

/// Pre-computed 256-entry table: `TABLE[b]` is the register after feeding
/// byte `b` through eight bitwise steps starting from zero.
static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = step(c);
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// One bit of the shift register.
#[inline]
const fn step(c: u32) -> u32 {
    if c & 1 != 0 {
        (c >> 1) ^ POLYNOMIAL
    } else {
        c >> 1
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Incremental CRC-32 hasher.
///
/// Feeding the input in several pieces gives the same result as a single
/// [`crc32`] call over their concatenation, which lets the chunk framer
/// checksum `type ‖ payload` without copying them into one buffer.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    register: u32,
}

impl Crc32 {
    /// Start a new checksum with the register at `0xFFFFFFFF`.
    pub fn new() -> Self {
        Self {
            register: 0xFFFF_FFFF,
        }
    }

    /// Feed more bytes into the checksum.
    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        let mut c = self.register;
        for &b in bytes {
            c = TABLE[((c ^ b as u32) & 0xFF) as usize] ^ (c >> 8);
        }
        self.register = c;
        self
    }

    /// Final value, with the register inverted.
    pub fn finalize(&self) -> u32 {
        self.register ^ 0xFFFF_FFFF
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the CRC-32 of a byte slice.
pub fn crc32(bytes: &[u8]) -> u32 {
    Crc32::new().update(bytes).finalize()
}

#[cfg(test)]
mod tests {
    use super::tests_support::crc32_bitwise;
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(crc32(&[]), 0x0000_0000);
    }

    #[test]
    fn test_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_iend_trailer() {
        // Every valid PNG ends with AE 42 60 82
        assert_eq!(crc32(b"IEND"), 0xAE42_6082);
    }

    #[test]
    fn test_known_strings() {
        assert_eq!(crc32(b"a"), 0xE8B7_BE43);
        assert_eq!(
            crc32(b"The quick brown fox jumps over the lazy dog"),
            0x414F_A339
        );
    }

    #[test]
    fn test_table_edges() {
        assert_eq!(TABLE[0], 0);
        assert_eq!(TABLE[128], POLYNOMIAL);
        assert_eq!(TABLE[255], 0x2D02_EF8D);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = Crc32::new();
        hasher.update(b"IHDR").update(&[0, 0, 0, 2, 0, 0, 0, 1, 8, 2, 0, 0, 0]);

        let mut joined = b"IHDR".to_vec();
        joined.extend_from_slice(&[0, 0, 0, 2, 0, 0, 0, 1, 8, 2, 0, 0, 0]);

        assert_eq!(hasher.finalize(), crc32(&joined));
    }

    #[test]
    fn test_default_is_empty_checksum() {
        assert_eq!(Crc32::default().finalize(), 0);
    }

    #[test]
    fn test_matches_bitwise_reference() {
        let data: Vec<u8> = (0..1024).map(|i| ((i * 37) % 256) as u8).collect();
        assert_eq!(crc32(&data), crc32_bitwise(&data));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
