use std::sync::Arc;
use tracing::info;

use crate::jobs::{JobPayload, JobQueue};
use crate::session::SessionId;

const JOB_KEY_PREFIX: &str = "transcription-work-";

/// The unique submission key for a session's transcription job.
pub fn job_key(session_id: SessionId) -> String {
    format!("{}{}", JOB_KEY_PREFIX, session_id)
}

/// Submits transcription jobs, deduplicated per session: a second enqueue
/// replaces any still-pending job for that session.
#[derive(Clone)]
pub struct TranscriptionCoordinator {
    queue: Arc<dyn JobQueue>,
}

impl TranscriptionCoordinator {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    pub async fn enqueue_transcription(&self, session_id: SessionId, use_alternate_engine: bool) {
        let key = job_key(session_id);
        info!("Enqueueing transcription job {}", key);
        self.queue
            .enqueue_unique(
                key,
                JobPayload {
                    session_id,
                    use_alternate_engine,
                },
            )
            .await;
    }
}
