// Integration tests for the WAV container writer.
//
// These verify the on-disk header is patched with exact sizes on close, that
// close is safe from multiple exit paths, and that misuse fails loudly.

use anyhow::Result;
use std::fs;
use tempfile::TempDir;
use voicedesk::{RecordError, WavFileWriter, WavMetadata};

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn read_u16_le(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
}

#[test]
fn test_header_reflects_exact_byte_counts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("out.wav");

    let mut writer = WavFileWriter::new(&path, 48_000, 2, 16);
    writer.open()?;

    // 1600 samples of non-zero PCM, written in two chunks.
    let samples: Vec<u8> = (0..1600i16)
        .flat_map(|s| (s % 200).to_le_bytes())
        .collect();
    writer.write(&samples[..1000])?;
    writer.write(&samples[1000..])?;
    writer.close()?;

    let bytes = fs::read(&path)?;
    assert_eq!(bytes.len(), 44 + 3200);

    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(&bytes[12..16], b"fmt ");
    assert_eq!(&bytes[36..40], b"data");

    let data_size = read_u32_le(&bytes, 40);
    assert_eq!(data_size, 3200, "data chunk size must match bytes written");
    assert_eq!(read_u32_le(&bytes, 4), data_size + 36, "riff size = data + 36");

    assert_eq!(read_u16_le(&bytes, 20), 1, "PCM format tag");
    assert_eq!(read_u16_le(&bytes, 22), 2, "channel count");
    assert_eq!(read_u32_le(&bytes, 24), 48_000, "sample rate");
    assert_eq!(read_u32_le(&bytes, 28), 48_000 * 2 * 2, "byte rate");
    assert_eq!(read_u16_le(&bytes, 32), 4, "block align");
    assert_eq!(read_u16_le(&bytes, 34), 16, "bits per sample");

    Ok(())
}

#[test]
fn test_double_close_is_noop() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("out.wav");

    let mut writer = WavFileWriter::new(&path, 16_000, 1, 16);
    writer.open()?;
    writer.write(&[1, 0, 2, 0])?;
    writer.close()?;
    writer.close()?;

    let bytes = fs::read(&path)?;
    assert_eq!(read_u32_le(&bytes, 40), 4, "header intact after second close");

    Ok(())
}

#[test]
fn test_close_without_writes_yields_valid_empty_wav() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("empty.wav");

    let mut writer = WavFileWriter::new(&path, 16_000, 1, 16);
    writer.open()?;
    writer.close()?;

    // hound must accept the file as structurally valid.
    let metadata = WavMetadata::read(&path)?;
    assert_eq!(metadata.sample_rate, 16_000);
    assert_eq!(metadata.channels, 1);
    assert_eq!(metadata.duration_millis, 0);

    Ok(())
}

#[test]
fn test_write_before_open_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.wav");

    let mut writer = WavFileWriter::new(&path, 16_000, 1, 16);
    let result = writer.write(&[0, 0]);
    assert!(matches!(result, Err(RecordError::WriterNotOpen)));
}

#[test]
fn test_write_after_close_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("out.wav");

    let mut writer = WavFileWriter::new(&path, 16_000, 1, 16);
    writer.open()?;
    writer.close()?;

    let result = writer.write(&[0, 0]);
    assert!(matches!(result, Err(RecordError::WriterNotOpen)));

    Ok(())
}

#[test]
fn test_metadata_duration_matches_written_frames() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("one-second.wav");

    let mut writer = WavFileWriter::new(&path, 8_000, 2, 16);
    writer.open()?;
    // One second of stereo 16-bit audio: 8000 frames * 2 ch * 2 bytes.
    writer.write(&vec![0u8; 8_000 * 2 * 2])?;
    writer.close()?;

    let metadata = WavMetadata::read(&path)?;
    assert_eq!(metadata.duration_millis, 1000);
    assert_eq!(metadata.channels, 2);

    Ok(())
}
