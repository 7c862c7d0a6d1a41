//! Recording session domain model and the store capability the core
//! persists through.

mod model;
mod store;

pub use model::{
    RecordingSession, RecordingSummary, SessionId, SummaryTiming, TranscriptSegment,
    TranscriptionStatus,
};
pub use store::{InMemorySessionStore, SessionStore, SessionWithSegments};
