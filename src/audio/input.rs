use anyhow::Result;
use std::f64::consts::TAU;
use std::time::Duration;

use crate::audio::device::{AudioDevice, AudioDeviceType};
use crate::error::RecordError;

/// Platform read-error codes, mirrored so the controller can classify raw
/// results from any host implementation.
pub const READ_ERROR_BAD_VALUE: i64 = -2;
pub const READ_ERROR_INVALID_OPERATION: i64 = -3;
pub const READ_ERROR_DEAD_OBJECT: i64 = -6;

/// Fixed capture profile requested from the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamProfile {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for StreamProfile {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
            bits_per_sample: 16,
        }
    }
}

impl StreamProfile {
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.bits_per_sample as u32 / 8
    }
}

/// An open hardware input stream.
///
/// Owned exclusively by the capture loop; nothing else touches the handle
/// until `stop` has returned.
#[async_trait::async_trait]
pub trait AudioInput: Send {
    /// Samples per pull, already sized by the host for this stream.
    fn buffer_size(&self) -> usize;

    /// Reads one frame into `buf`, returning the raw platform count: positive
    /// = samples read, zero = starvation, negative = platform error code.
    async fn read(&mut self, buf: &mut [i16]) -> i64;

    /// Stops and releases the hardware stream.
    async fn stop(&mut self);
}

/// Access to the platform's audio input hardware.
///
/// Implementations must release any partially acquired handle before
/// returning an error from `open_input`.
#[async_trait::async_trait]
pub trait AudioHost: Send + Sync {
    /// Currently available input devices.
    fn input_devices(&self) -> Vec<AudioDevice>;

    /// Opens an input stream at the given profile, already in the recording
    /// state. `DeviceUnavailable` when the platform cannot report a buffer
    /// size or cannot start capturing.
    async fn open_input(
        &self,
        preferred: Option<&AudioDevice>,
        profile: StreamProfile,
    ) -> Result<Box<dyn AudioInput>, RecordError>;
}

/// Deterministic synthesized input used by the demo binary. Emits a 440 Hz
/// tone in 100 ms frames, pacing itself to wall-clock time like a real device.
pub struct SineInput {
    profile: StreamProfile,
    buffer_size: usize,
    phase: f64,
}

impl SineInput {
    pub fn new(profile: StreamProfile) -> Self {
        // 100 ms of interleaved samples per pull.
        let buffer_size = profile.sample_rate as usize / 10 * profile.channels as usize;
        Self {
            profile,
            buffer_size,
            phase: 0.0,
        }
    }
}

#[async_trait::async_trait]
impl AudioInput for SineInput {
    fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    async fn read(&mut self, buf: &mut [i16]) -> i64 {
        let channels = self.profile.channels as usize;
        let step = 440.0 * TAU / self.profile.sample_rate as f64;
        let len = self.buffer_size.min(buf.len());
        for frame in buf[..len].chunks_mut(channels) {
            let sample = (self.phase.sin() * 8000.0) as i16;
            for slot in frame {
                *slot = sample;
            }
            self.phase += step;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        len as i64
    }

    async fn stop(&mut self) {}
}

/// Host backing the demo binary: a single built-in microphone producing the
/// synthesized tone.
pub struct SineHost;

#[async_trait::async_trait]
impl AudioHost for SineHost {
    fn input_devices(&self) -> Vec<AudioDevice> {
        vec![AudioDevice::new("demo-builtin-mic", AudioDeviceType::BuiltinMic)]
    }

    async fn open_input(
        &self,
        _preferred: Option<&AudioDevice>,
        profile: StreamProfile,
    ) -> Result<Box<dyn AudioInput>, RecordError> {
        Ok(Box::new(SineInput::new(profile)))
    }
}
