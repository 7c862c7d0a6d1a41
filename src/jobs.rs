use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::session::SessionId;

/// Input of one transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPayload {
    pub session_id: SessionId,
    pub use_alternate_engine: bool,
}

/// How a job run ended. `Retry` tells the host scheduler the failure looked
/// transient; this crate does not re-run jobs itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failure,
    Retry,
}

/// Executes one job payload.
#[async_trait::async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, payload: JobPayload) -> JobOutcome;
}

/// Durable job submission capability.
///
/// Submitting under an existing key replaces any not-yet-started prior
/// submission for that key, so a session never has more than one pending job.
#[async_trait::async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue_unique(&self, key: String, payload: JobPayload);

    /// Keys of jobs that are queued but have not started executing.
    async fn pending_jobs(&self) -> Vec<String>;
}

#[derive(Default)]
struct QueueState {
    pending: HashMap<String, JobPayload>,
    active: HashSet<String>,
}

struct QueueInner {
    runner: Arc<dyn JobRunner>,
    state: Mutex<QueueState>,
}

/// In-process `JobQueue` backed by spawned tasks.
///
/// One driver task runs per key; it takes the pending payload when it starts,
/// so an enqueue arriving before that point simply overwrites the payload,
/// and an enqueue arriving after it schedules one more run.
pub struct InProcessJobQueue {
    inner: Arc<QueueInner>,
}

impl InProcessJobQueue {
    pub fn new(runner: Arc<dyn JobRunner>) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                runner,
                state: Mutex::new(QueueState::default()),
            }),
        }
    }

    async fn drive(inner: Arc<QueueInner>, key: String) {
        loop {
            let payload = {
                let mut state = inner.state.lock().await;
                match state.pending.remove(&key) {
                    Some(payload) => payload,
                    None => {
                        state.active.remove(&key);
                        return;
                    }
                }
            };
            let outcome = inner.runner.run(payload).await;
            match outcome {
                JobOutcome::Success => info!("Job {} completed", key),
                JobOutcome::Failure => warn!("Job {} failed permanently", key),
                // Retry policy belongs to the host scheduler.
                JobOutcome::Retry => warn!("Job {} failed, retry requested", key),
            }
        }
    }
}

#[async_trait::async_trait]
impl JobQueue for InProcessJobQueue {
    async fn enqueue_unique(&self, key: String, payload: JobPayload) {
        let spawn_driver = {
            let mut state = self.inner.state.lock().await;
            let replaced = state.pending.insert(key.clone(), payload).is_some();
            if replaced {
                info!("Job {} replaced a pending submission", key);
            }
            state.active.insert(key.clone())
        };
        if spawn_driver {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(Self::drive(inner, key));
        }
    }

    async fn pending_jobs(&self) -> Vec<String> {
        let state = self.inner.state.lock().await;
        let mut keys: Vec<String> = state.pending.keys().cloned().collect();
        keys.sort();
        keys
    }
}
