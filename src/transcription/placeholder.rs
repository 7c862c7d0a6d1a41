use std::path::Path;

use crate::audio::WavMetadata;
use crate::error::EngineError;
use crate::session::TranscriptSegment;

use super::engine::TranscriptionEngine;

const WINDOW_MILLIS: u64 = 30_000;

/// Stand-in engine that segments the audio into fixed 30-second windows of
/// synthetic text. Kept until a real speech-to-text binding replaces it; the
/// segment shape is what the rest of the pipeline is tested against.
#[derive(Default)]
pub struct WindowedPlaceholderEngine;

#[async_trait::async_trait]
impl TranscriptionEngine for WindowedPlaceholderEngine {
    async fn transcribe(&self, audio_file: &Path) -> Result<Vec<TranscriptSegment>, EngineError> {
        // An unreadable file degrades to a single zero-length segment rather
        // than failing the job.
        let duration_millis = WavMetadata::read(audio_file)
            .map(|m| m.duration_millis)
            .unwrap_or(0);

        let mut segments = Vec::new();
        let mut index = 0u32;
        let mut start = 0u64;
        while start < duration_millis {
            let end = (start + WINDOW_MILLIS).min(duration_millis);
            segments.push(TranscriptSegment {
                index,
                start_millis: start,
                end_millis: end,
                speaker: None,
                text: format!(
                    "Placeholder segment {} ({}s-{}s)",
                    index + 1,
                    start / 1000,
                    end / 1000
                ),
            });
            start = end;
            index += 1;
        }
        if segments.is_empty() {
            segments.push(TranscriptSegment {
                index: 0,
                start_millis: 0,
                end_millis: duration_millis,
                speaker: None,
                text: "Placeholder segment 1".to_string(),
            });
        }
        Ok(segments)
    }
}

/// Alternate engine slot. Mirrors the windowed engine until its own binding
/// lands, so both `EngineKind`s are exercisable end to end.
#[derive(Default)]
pub struct AlternatePlaceholderEngine {
    fallback: WindowedPlaceholderEngine,
}

#[async_trait::async_trait]
impl TranscriptionEngine for AlternatePlaceholderEngine {
    async fn transcribe(&self, audio_file: &Path) -> Result<Vec<TranscriptSegment>, EngineError> {
        self.fallback.transcribe(audio_file).await
    }
}
