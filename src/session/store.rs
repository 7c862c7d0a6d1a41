use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::model::{RecordingSession, SessionId, TranscriptSegment, TranscriptionStatus};

/// A session row together with its current transcript segments.
#[derive(Debug, Clone)]
pub struct SessionWithSegments {
    pub session: RecordingSession,
    pub segments: Vec<TranscriptSegment>,
}

/// Persistence capability for recording sessions.
///
/// The real database lives in a collaborator; the core only depends on these
/// operations, each of which is individually atomic.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(
        &self,
        title: Option<String>,
        started_at: DateTime<Utc>,
        duration_millis: u64,
        audio_path: PathBuf,
        encrypted: bool,
    ) -> Result<SessionId>;

    async fn update_status(&self, id: SessionId, status: TranscriptionStatus) -> Result<()>;

    async fn update_duration_and_path(
        &self,
        id: SessionId,
        duration_millis: u64,
        audio_path: PathBuf,
    ) -> Result<()>;

    /// Replaces the session's segment set wholesale (delete-all, insert-all).
    async fn replace_segments(
        &self,
        id: SessionId,
        segments: Vec<TranscriptSegment>,
    ) -> Result<()>;

    async fn update_summary(
        &self,
        id: SessionId,
        status: TranscriptionStatus,
        summary_json: Option<String>,
        participants: Vec<String>,
        tags: Vec<String>,
        topics: Vec<String>,
    ) -> Result<()>;

    async fn get_session_with_segments(
        &self,
        id: SessionId,
    ) -> Result<Option<SessionWithSegments>>;
}

#[derive(Default)]
struct StoreState {
    next_id: SessionId,
    sessions: HashMap<SessionId, RecordingSession>,
    segments: HashMap<SessionId, Vec<TranscriptSegment>>,
}

/// In-memory `SessionStore` used by tests and the demo binary.
#[derive(Default)]
pub struct InMemorySessionStore {
    state: Mutex<StoreState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(
        &self,
        title: Option<String>,
        started_at: DateTime<Utc>,
        duration_millis: u64,
        audio_path: PathBuf,
        encrypted: bool,
    ) -> Result<SessionId> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = state.next_id;
        state.sessions.insert(
            id,
            RecordingSession {
                id,
                title,
                started_at,
                duration_millis,
                audio_path,
                encrypted,
                transcription_status: TranscriptionStatus::Pending,
                summary_json: None,
                participants: Vec::new(),
                tags: Vec::new(),
                topics: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn update_status(&self, id: SessionId, status: TranscriptionStatus) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.sessions.get_mut(&id) {
            Some(session) => {
                session.transcription_status = status;
                Ok(())
            }
            None => bail!("No session with id {}", id),
        }
    }

    async fn update_duration_and_path(
        &self,
        id: SessionId,
        duration_millis: u64,
        audio_path: PathBuf,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.sessions.get_mut(&id) {
            Some(session) => {
                session.duration_millis = duration_millis;
                session.audio_path = audio_path;
                Ok(())
            }
            None => bail!("No session with id {}", id),
        }
    }

    async fn replace_segments(
        &self,
        id: SessionId,
        segments: Vec<TranscriptSegment>,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.sessions.contains_key(&id) {
            bail!("No session with id {}", id);
        }
        state.segments.insert(id, segments);
        Ok(())
    }

    async fn update_summary(
        &self,
        id: SessionId,
        status: TranscriptionStatus,
        summary_json: Option<String>,
        participants: Vec<String>,
        tags: Vec<String>,
        topics: Vec<String>,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.sessions.get_mut(&id) {
            Some(session) => {
                session.transcription_status = status;
                session.summary_json = summary_json;
                session.participants = participants;
                session.tags = tags;
                session.topics = topics;
                Ok(())
            }
            None => bail!("No session with id {}", id),
        }
    }

    async fn get_session_with_segments(
        &self,
        id: SessionId,
    ) -> Result<Option<SessionWithSegments>> {
        let state = self.state.lock().await;
        Ok(state.sessions.get(&id).map(|session| SessionWithSegments {
            session: session.clone(),
            segments: state.segments.get(&id).cloned().unwrap_or_default(),
        }))
    }
}
