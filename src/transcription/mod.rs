//! Transcription pipeline: the coordinator enqueues one durable job per
//! session, the worker decrypts and runs an engine over the audio, and the
//! summary generator derives the searchable payload.

mod coordinator;
mod engine;
mod placeholder;
mod summary;
mod worker;

pub use coordinator::{job_key, TranscriptionCoordinator};
pub use engine::{engine_for, EngineKind, TranscriptionEngine};
pub use placeholder::{AlternatePlaceholderEngine, WindowedPlaceholderEngine};
pub use summary::SummaryGenerator;
pub use worker::TranscriptionWorker;
