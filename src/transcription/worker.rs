use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::crypto::FileCipher;
use crate::jobs::{JobOutcome, JobPayload, JobRunner};
use crate::session::{SessionId, SessionStore, SessionWithSegments, TranscriptionStatus};

use super::engine::{engine_for, EngineKind};
use super::summary::SummaryGenerator;

/// The executed transcription job: decrypt, run the engine, replace the
/// segment set, derive the summary, mark the session Completed.
pub struct TranscriptionWorker {
    store: Arc<dyn SessionStore>,
    cipher: Arc<dyn FileCipher>,
    cache_dir: PathBuf,
}

enum JobEnd {
    Completed,
    /// Bad input (missing session or audio file); re-running cannot help.
    Rejected,
}

impl TranscriptionWorker {
    pub fn new(
        store: Arc<dyn SessionStore>,
        cipher: Arc<dyn FileCipher>,
        cache_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            cipher,
            cache_dir,
        }
    }

    async fn transcribe_session(&self, payload: JobPayload) -> Result<JobEnd> {
        let session_id = payload.session_id;
        if session_id <= 0 {
            return Ok(JobEnd::Rejected);
        }
        self.store
            .update_status(session_id, TranscriptionStatus::Processing)
            .await?;
        let Some(SessionWithSegments { session, .. }) =
            self.store.get_session_with_segments(session_id).await?
        else {
            warn!("Transcription requested for unknown session {}", session_id);
            return Ok(JobEnd::Rejected);
        };
        if !session.audio_path.exists() {
            warn!(
                "Audio file missing for session {}: {}",
                session_id,
                session.audio_path.display()
            );
            self.store
                .update_status(session_id, TranscriptionStatus::Failed)
                .await?;
            return Ok(JobEnd::Rejected);
        }

        let scratch = self
            .cache_dir
            .join(format!("transcribe-{}.wav", session_id));
        let result = self.run_engine(&session, &scratch, payload).await;
        // The scratch file never outlives the job, even on failure.
        let _ = tokio::fs::remove_file(&scratch).await;
        result?;

        info!("Transcription completed for session {}", session_id);
        Ok(JobEnd::Completed)
    }

    async fn run_engine(
        &self,
        session: &crate::session::RecordingSession,
        scratch: &std::path::Path,
        payload: JobPayload,
    ) -> Result<()> {
        self.cipher
            .decrypt_to_temp_file(&session.audio_path, scratch)
            .await
            .context("Failed to decrypt audio for transcription")?;

        let engine = engine_for(EngineKind::from_flag(payload.use_alternate_engine));
        let segments = engine.transcribe(scratch).await?;
        self.store
            .replace_segments(session.id, segments.clone())
            .await?;

        let summary_json =
            SummaryGenerator::new().generate_summary(session.title.as_deref(), &segments)?;
        self.store
            .update_summary(
                session.id,
                TranscriptionStatus::Completed,
                Some(summary_json),
                Vec::new(),
                Vec::new(),
                Vec::new(),
            )
            .await?;
        Ok(())
    }

    async fn mark_failed(&self, session_id: SessionId) {
        if let Err(e) = self
            .store
            .update_status(session_id, TranscriptionStatus::Failed)
            .await
        {
            error!("Failed to mark session {} as failed: {}", session_id, e);
        }
    }
}

#[async_trait::async_trait]
impl JobRunner for TranscriptionWorker {
    async fn run(&self, payload: JobPayload) -> JobOutcome {
        match self.transcribe_session(payload).await {
            Ok(JobEnd::Completed) => JobOutcome::Success,
            Ok(JobEnd::Rejected) => JobOutcome::Failure,
            Err(e) => {
                warn!(
                    "Transcription failed for session {}: {}",
                    payload.session_id, e
                );
                self.mark_failed(payload.session_id).await;
                JobOutcome::Retry
            }
        }
    }
}
