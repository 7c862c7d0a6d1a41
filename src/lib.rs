pub mod audio;
pub mod config;
pub mod crypto;
pub mod error;
pub mod jobs;
pub mod recording;
pub mod session;
pub mod transcription;
pub mod vocab;

pub use audio::{
    select_preferred_input, AudioDevice, AudioDeviceType, AudioHost, AudioInput, AudioPipeline,
    StreamProfile, WavFileWriter, WavMetadata,
};
pub use config::Config;
pub use crypto::{FileCipher, XorFileCipher};
pub use error::{EngineError, RecordError, StreamReadError};
pub use jobs::{InProcessJobQueue, JobOutcome, JobPayload, JobQueue, JobRunner};
pub use recording::{RecorderConfig, RecordingController};
pub use session::{
    InMemorySessionStore, RecordingSession, RecordingSummary, SessionId, SessionStore,
    SessionWithSegments, TranscriptSegment, TranscriptionStatus,
};
pub use transcription::{
    job_key, EngineKind, TranscriptionCoordinator, TranscriptionEngine, TranscriptionWorker,
};
pub use vocab::{load_seed_words, QuizQuestion, Word, WordDeck, SRS_INTERVALS_DAYS};
