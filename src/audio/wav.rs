use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::RecordError;

const HEADER_LEN: usize = 44;

/// Streams raw PCM bytes into a WAV container.
///
/// `open` reserves a 44-byte placeholder header so audio can be appended
/// immediately; `close` seeks back and patches the header with the exact byte
/// counts. Closing twice is a no-op, because close is reached from the normal
/// stop path, the error path, and cancellation.
pub struct WavFileWriter {
    path: PathBuf,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    file: Option<File>,
    data_size: u32,
}

impl WavFileWriter {
    pub fn new(
        path: impl Into<PathBuf>,
        sample_rate: u32,
        channels: u16,
        bits_per_sample: u16,
    ) -> Self {
        Self {
            path: path.into(),
            sample_rate,
            channels,
            bits_per_sample,
            file: None,
            data_size: 0,
        }
    }

    /// Creates (truncating) the destination file and writes the placeholder
    /// header region.
    pub fn open(&mut self) -> Result<(), RecordError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&self.path)?;
        file.write_all(&[0u8; HEADER_LEN])?;
        self.file = Some(file);
        self.data_size = 0;
        Ok(())
    }

    /// Appends raw PCM bytes. Fails with `WriterNotOpen` before `open()` or
    /// after `close()` rather than silently dropping data.
    pub fn write(&mut self, data: &[u8]) -> Result<(), RecordError> {
        let file = self.file.as_mut().ok_or(RecordError::WriterNotOpen)?;
        file.write_all(data)?;
        self.data_size += data.len() as u32;
        Ok(())
    }

    /// Patches the header with the accumulated data size and releases the
    /// file. A second call is a no-op. Even with zero writes the result is a
    /// structurally valid WAV with an empty data chunk.
    pub fn close(&mut self) -> Result<(), RecordError> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&self.build_header())?;
        file.flush()?;
        Ok(())
    }

    /// Bytes of PCM data written so far.
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn build_header(&self) -> [u8; HEADER_LEN] {
        let byte_rate =
            self.sample_rate * self.channels as u32 * self.bits_per_sample as u32 / 8;
        let block_align = self.channels * self.bits_per_sample / 8;
        let riff_size = self.data_size + 36;

        let mut header = [0u8; HEADER_LEN];
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&riff_size.to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&16u32.to_le_bytes()); // fmt chunk size for PCM
        header[20..22].copy_from_slice(&1u16.to_le_bytes()); // audio format = PCM
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&block_align.to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_size.to_le_bytes());
        header
    }
}

impl Drop for WavFileWriter {
    fn drop(&mut self) {
        if self.file.is_some() {
            if let Err(e) = self.close() {
                warn!("Failed to finalize WAV writer on drop: {}", e);
            }
        }
    }
}

/// Format metadata of a finished WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavMetadata {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub duration_millis: u64,
}

impl WavMetadata {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
        let spec = reader.spec();
        let frames = reader.duration() as u64;
        let duration_millis = if spec.sample_rate == 0 {
            0
        } else {
            frames * 1000 / spec.sample_rate as u64
        };
        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            duration_millis,
        })
    }
}
