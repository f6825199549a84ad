//! WAV container writer for 16-bit mono PCM.
//!
//! Produces the canonical 44-byte RIFF header followed by little-endian
//! samples, which every audio tool (including the MP3 transcoder) accepts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Size of the RIFF/WAVE header we emit.
pub const WAV_HEADER_LEN: usize = 44;

const PCM_FORMAT: u16 = 1;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Errors that can occur while writing a WAV file.
#[derive(Debug, Error)]
pub enum WavError {
    /// Sample data does not fit in the 32-bit RIFF size fields.
    #[error("WAV data of {len} bytes exceeds the 32-bit RIFF size field")]
    DataTooLarge { len: usize },

    /// The output sink rejected a write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write a complete WAV file to `sink`.
pub fn write_wav<W: Write>(sink: &mut W, sample_rate: u32, samples: &[i16]) -> Result<(), WavError> {
    let data_len = samples.len() * 2;
    let data_len_u32 = u32::try_from(data_len)
        .ok()
        .filter(|len| len.checked_add(36).is_some())
        .ok_or(WavError::DataTooLarge { len: data_len })?;

    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * block_align as u32;

    let mut header = Vec::with_capacity(WAV_HEADER_LEN);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&(36 + data_len_u32).to_le_bytes());
    header.extend_from_slice(b"WAVE");
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    header.extend_from_slice(&CHANNELS.to_le_bytes());
    header.extend_from_slice(&sample_rate.to_le_bytes());
    header.extend_from_slice(&byte_rate.to_le_bytes());
    header.extend_from_slice(&block_align.to_le_bytes());
    header.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    header.extend_from_slice(b"data");
    header.extend_from_slice(&data_len_u32.to_le_bytes());
    sink.write_all(&header)?;

    let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    sink.write_all(&data)?;
    Ok(())
}

/// Write a WAV file at `path`, replacing any existing file.
pub fn write_wav_file(path: &Path, sample_rate: u32, samples: &[i16]) -> Result<(), WavError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_wav(&mut writer, sample_rate, samples)?;
    writer.flush()?;
    Ok(())
}
