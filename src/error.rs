use thiserror::Error;

/// Classified failure of a single hardware stream read.
///
/// The capture loop maps raw platform read results onto these variants; all of
/// them abort the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamReadError {
    /// The device returned zero samples (input starvation).
    #[error("no audio data captured")]
    NoData,
    /// A known device/operation error code.
    #[error("audio device error (code {0})")]
    Device(i64),
    /// Any other negative read result.
    #[error("unknown stream error (code {0})")]
    Unknown(i64),
}

/// Errors raised by the recording lifecycle.
#[derive(Debug, Error)]
pub enum RecordError {
    /// No input hardware, or the platform refused to open the stream.
    #[error("audio input unavailable: {0}")]
    DeviceUnavailable(String),

    #[error(transparent)]
    Stream(#[from] StreamReadError),

    /// `write` was called on a WAV writer that is not open.
    #[error("WAV writer is not open")]
    WriterNotOpen,

    /// The at-rest cipher failed while producing the final encrypted file.
    #[error("failed to encrypt recording: {0}")]
    Encryption(String),

    /// The session store rejected an operation.
    #[error("session store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure inside a transcription engine. Jobs that hit one are marked
/// retryable for the host scheduler.
#[derive(Debug, Error)]
#[error("transcription engine failure: {0}")]
pub struct EngineError(pub String);
