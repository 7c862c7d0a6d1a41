use std::path::Path;

use crate::error::EngineError;
use crate::session::TranscriptSegment;

use super::placeholder::{AlternatePlaceholderEngine, WindowedPlaceholderEngine};

/// Which engine implementation a job should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Primary,
    Alternate,
}

impl EngineKind {
    pub fn from_flag(use_alternate: bool) -> Self {
        if use_alternate {
            Self::Alternate
        } else {
            Self::Primary
        }
    }
}

/// Speech-to-text capability: given an audio file, produce an ordered,
/// non-overlapping sequence of timed segments.
#[async_trait::async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio_file: &Path) -> Result<Vec<TranscriptSegment>, EngineError>;
}

pub fn engine_for(kind: EngineKind) -> Box<dyn TranscriptionEngine> {
    match kind {
        EngineKind::Primary => Box::new(WindowedPlaceholderEngine::default()),
        EngineKind::Alternate => Box::new(AlternatePlaceholderEngine::default()),
    }
}
