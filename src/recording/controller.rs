use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::audio::input::{
    READ_ERROR_BAD_VALUE, READ_ERROR_DEAD_OBJECT, READ_ERROR_INVALID_OPERATION,
};
use crate::audio::{
    select_preferred_input, AudioHost, AudioInput, AudioPipeline, StreamProfile, WavFileWriter,
};
use crate::crypto::FileCipher;
use crate::error::{RecordError, StreamReadError};
use crate::session::{SessionId, SessionStore, TranscriptionStatus};
use crate::transcription::TranscriptionCoordinator;

use super::state::{ActiveRecording, RecorderState, SharedSessionId};

/// Storage and capture settings for the controller.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub profile: StreamProfile,
    /// Destination of final encrypted recordings.
    pub recordings_dir: PathBuf,
    /// Holds the unencrypted temp file while capturing and transcription
    /// scratch files; contents never outlive their owning operation.
    pub cache_dir: PathBuf,
    /// Which engine the enqueued transcription job should run.
    pub use_alternate_engine: bool,
}

impl RecorderConfig {
    pub fn new(recordings_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            profile: StreamProfile::default(),
            recordings_dir: recordings_dir.into(),
            cache_dir: cache_dir.into(),
            use_alternate_engine: false,
        }
    }
}

/// Orchestrates the recording lifecycle: device acquisition, the capture
/// loop, session metadata, encryption hand-off, and transcription
/// enqueueing.
///
/// All mutable recording state is owned here; the capture task is the single
/// writer to the input handle and the WAV writer.
pub struct RecordingController {
    config: RecorderConfig,
    host: Arc<dyn AudioHost>,
    store: Arc<dyn SessionStore>,
    cipher: Arc<dyn FileCipher>,
    coordinator: TranscriptionCoordinator,
    error_tx: mpsc::UnboundedSender<RecordError>,
    state: Mutex<RecorderState>,
}

impl RecordingController {
    pub fn new(
        config: RecorderConfig,
        host: Arc<dyn AudioHost>,
        store: Arc<dyn SessionStore>,
        cipher: Arc<dyn FileCipher>,
        coordinator: TranscriptionCoordinator,
        error_tx: mpsc::UnboundedSender<RecordError>,
    ) -> Result<Self, RecordError> {
        std::fs::create_dir_all(&config.recordings_dir)?;
        std::fs::create_dir_all(&config.cache_dir)?;
        Ok(Self {
            config,
            host,
            store,
            cipher,
            coordinator,
            error_tx,
            state: Mutex::new(RecorderState::Idle),
        })
    }

    pub async fn is_recording(&self) -> bool {
        match &*self.state.lock().await {
            RecorderState::Capturing(active) => !active.handle.is_finished(),
            _ => false,
        }
    }

    /// Starts a recording and returns immediately with the session identity,
    /// or `None` while the session row is still being created. Calling start
    /// while a recording is active is a no-op returning the current
    /// identity.
    pub async fn start_recording(
        &self,
        title: Option<String>,
    ) -> Result<Option<SessionId>, RecordError> {
        {
            let mut state = self.state.lock().await;
            match &*state {
                RecorderState::Capturing(active) => {
                    if !active.handle.is_finished() {
                        return Ok(*active.session_id.lock().unwrap());
                    }
                    // The capture loop aborted on its own; fall through to a
                    // fresh session.
                    *state = RecorderState::Idle;
                }
                RecorderState::Starting | RecorderState::Stopping => return Ok(None),
                RecorderState::Idle => {}
            }
            *state = RecorderState::Starting;
        }

        match self.try_start(title).await {
            Ok(active) => {
                let session_id = *active.session_id.lock().unwrap();
                *self.state.lock().await = RecorderState::Capturing(active);
                Ok(session_id)
            }
            Err(e) => {
                *self.state.lock().await = RecorderState::Idle;
                Err(e)
            }
        }
    }

    /// Requests cancellation of the capture loop and waits for it to fully
    /// unwind: the WAV header is finalized, the file encrypted, and the
    /// session row updated before this returns. Stopping while idle is a
    /// no-op.
    pub async fn stop_recording(&self) -> Result<(), RecordError> {
        let active = {
            let mut state = self.state.lock().await;
            match std::mem::replace(&mut *state, RecorderState::Stopping) {
                RecorderState::Capturing(active) => active,
                other => {
                    *state = other;
                    return Ok(());
                }
            }
        };

        active.cancel.store(true, Ordering::SeqCst);
        if let Err(e) = active.handle.await {
            error!("Capture task panicked: {}", e);
        }
        *self.state.lock().await = RecorderState::Idle;
        Ok(())
    }

    async fn try_start(&self, title: Option<String>) -> Result<ActiveRecording, RecordError> {
        let devices = self.host.input_devices();
        let preferred = select_preferred_input(&devices).cloned();
        let profile = self.config.profile;
        let mut input = self.host.open_input(preferred.as_ref(), profile).await?;

        let started_at = Utc::now();
        let started = Instant::now();
        let temp_path = self
            .config
            .cache_dir
            .join(format!("active-{}.wav", Uuid::new_v4()));
        let final_path = self
            .config
            .recordings_dir
            .join(format!("{}.wav.enc", started_at.timestamp_millis()));

        // The writer opens before any metadata is persisted.
        let mut writer = WavFileWriter::new(
            temp_path.clone(),
            profile.sample_rate,
            profile.channels,
            profile.bits_per_sample,
        );
        if let Err(e) = writer.open() {
            input.stop().await;
            return Err(e);
        }

        // Session row creation runs concurrently; the capture loop waits for
        // the id before writing audio to storage durably matters.
        let session_slot: SharedSessionId = Arc::new(StdMutex::new(None));
        let (id_tx, id_rx) = oneshot::channel();
        {
            let store = Arc::clone(&self.store);
            let slot = Arc::clone(&session_slot);
            let final_path = final_path.clone();
            let title = title.clone();
            tokio::spawn(async move {
                match store
                    .create_session(title, started_at, 0, final_path, true)
                    .await
                {
                    Ok(id) => {
                        *slot.lock().unwrap() = Some(id);
                        let _ = id_tx.send(Some(id));
                    }
                    Err(e) => {
                        error!("Failed to create session row: {}", e);
                        let _ = id_tx.send(None);
                    }
                }
            });
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let task = CaptureTask {
            store: Arc::clone(&self.store),
            cipher: Arc::clone(&self.cipher),
            coordinator: self.coordinator.clone(),
            error_tx: self.error_tx.clone(),
            pipeline: AudioPipeline::default(),
            temp_path,
            final_path,
            started,
            use_alternate_engine: self.config.use_alternate_engine,
        };
        let handle = tokio::spawn(task.run(input, writer, id_rx, Arc::clone(&cancel)));

        info!("Recording started (title: {:?})", title);
        Ok(ActiveRecording {
            session_id: session_slot,
            cancel,
            handle,
        })
    }
}

/// Everything the spawned capture loop owns for one session.
struct CaptureTask {
    store: Arc<dyn SessionStore>,
    cipher: Arc<dyn FileCipher>,
    coordinator: TranscriptionCoordinator,
    error_tx: mpsc::UnboundedSender<RecordError>,
    pipeline: AudioPipeline,
    temp_path: PathBuf,
    final_path: PathBuf,
    started: Instant,
    use_alternate_engine: bool,
}

impl CaptureTask {
    async fn run(
        self,
        mut input: Box<dyn AudioInput>,
        mut writer: WavFileWriter,
        id_rx: oneshot::Receiver<Option<SessionId>>,
        cancel: Arc<AtomicBool>,
    ) {
        // No durable row, no capture: release everything and bail.
        let session_id = match id_rx.await {
            Ok(Some(id)) => id,
            _ => {
                warn!("Session row creation failed; abandoning capture");
                input.stop().await;
                if let Err(e) = writer.close() {
                    error!("Failed to finalize WAV header: {}", e);
                }
                let _ = tokio::fs::remove_file(&self.temp_path).await;
                return;
            }
        };

        let mut buf = vec![0i16; input.buffer_size()];
        let mut bytes = Vec::with_capacity(buf.len() * 2);
        let mut capture_result: Result<(), RecordError> = Ok(());

        while !cancel.load(Ordering::SeqCst) {
            let read = input.read(&mut buf).await;
            if read <= 0 {
                capture_result = Err(classify_read_result(read));
                break;
            }
            let processed = self.pipeline.process(&buf, read as usize);
            bytes.clear();
            for sample in &processed {
                bytes.extend_from_slice(&sample.to_le_bytes());
            }
            if let Err(e) = writer.write(&bytes) {
                capture_result = Err(e);
                break;
            }
        }

        // Same unwind for success, cancellation, and error: release the
        // hardware, patch the header, then hand the file off.
        input.stop().await;
        if let Err(e) = writer.close() {
            error!("Failed to finalize WAV header: {}", e);
        }
        self.finalize(session_id, capture_result).await;
    }

    async fn finalize(self, session_id: SessionId, capture_result: Result<(), RecordError>) {
        let encrypt_result = self
            .cipher
            .encrypt_file(&self.temp_path, &self.final_path)
            .await;
        let _ = tokio::fs::remove_file(&self.temp_path).await;

        if let Err(e) = encrypt_result {
            // The row must not point at a half-written encrypted file, so
            // duration and path stay untouched.
            self.mark_failed(session_id).await;
            let _ = self
                .error_tx
                .send(RecordError::Encryption(e.to_string()));
            return;
        }

        let duration_millis = self.started.elapsed().as_millis() as u64;
        if let Err(e) = self
            .store
            .update_duration_and_path(session_id, duration_millis, self.final_path.clone())
            .await
        {
            error!("Failed to update session {}: {}", session_id, e);
        }

        match capture_result {
            Ok(()) => {
                info!(
                    "Recording finalized: session {} ({} ms)",
                    session_id, duration_millis
                );
                self.coordinator
                    .enqueue_transcription(session_id, self.use_alternate_engine)
                    .await;
            }
            Err(err) => {
                self.mark_failed(session_id).await;
                let _ = self.error_tx.send(err);
            }
        }
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

fn classify_read_result(code: i64) -> RecordError {
    match code {
        0 => RecordError::Stream(StreamReadError::NoData),
        READ_ERROR_INVALID_OPERATION | READ_ERROR_BAD_VALUE | READ_ERROR_DEAD_OBJECT => {
            RecordError::Stream(StreamReadError::Device(code))
        }
        other => RecordError::Stream(StreamReadError::Unknown(other)),
    }
}
