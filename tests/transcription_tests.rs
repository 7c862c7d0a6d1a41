// Integration tests for the transcription pipeline: placeholder engines,
// summary heuristics, the worker, and unique job submission.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;
use voicedesk::transcription::{engine_for, SummaryGenerator};
use voicedesk::{
    job_key, EngineKind, FileCipher, InMemorySessionStore, InProcessJobQueue, JobOutcome,
    JobPayload, JobQueue, JobRunner, RecordingSummary, SessionStore, TranscriptSegment,
    TranscriptionStatus, TranscriptionWorker, WavFileWriter, XorFileCipher,
};

/// Writes a WAV with the given audio duration. A 1 kHz sample rate keeps the
/// files tiny.
fn write_wav(path: &Path, duration_secs: u64) -> Result<()> {
    let mut writer = WavFileWriter::new(path, 1000, 1, 16);
    writer.open()?;
    writer.write(&vec![1u8; (duration_secs * 1000 * 2) as usize])?;
    writer.close()?;
    Ok(())
}

#[tokio::test]
async fn test_placeholder_engine_emits_thirty_second_windows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("audio.wav");
    write_wav(&path, 65)?;

    let engine = engine_for(EngineKind::Primary);
    let segments = engine.transcribe(&path).await?;

    assert_eq!(segments.len(), 3, "65s splits into 30s + 30s + 5s");
    assert_eq!(segments[0].start_millis, 0);
    assert_eq!(segments[0].end_millis, 30_000);
    assert_eq!(segments[1].start_millis, 30_000);
    assert_eq!(segments[1].end_millis, 60_000);
    assert_eq!(segments[2].start_millis, 60_000);
    assert_eq!(segments[2].end_millis, 65_000);
    for (i, segment) in segments.iter().enumerate() {
        assert_eq!(segment.index, i as u32, "indices are contiguous from 0");
        assert!(segment.text.contains(&format!("segment {}", i + 1)));
    }

    Ok(())
}

#[tokio::test]
async fn test_placeholder_engine_zero_length_audio_yields_one_segment() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("empty.wav");
    let mut writer = WavFileWriter::new(&path, 1000, 1, 16);
    writer.open()?;
    writer.close()?;

    let engine = engine_for(EngineKind::Primary);
    let segments = engine.transcribe(&path).await?;

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start_millis, 0);
    assert_eq!(segments[0].end_millis, 0);

    Ok(())
}

#[tokio::test]
async fn test_alternate_engine_mirrors_primary_windows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("audio.wav");
    write_wav(&path, 40)?;

    let primary = engine_for(EngineKind::Primary).transcribe(&path).await?;
    let alternate = engine_for(EngineKind::Alternate).transcribe(&path).await?;

    assert_eq!(primary, alternate);

    Ok(())
}

fn segment(index: u32, start: u64, end: u64, text: &str) -> TranscriptSegment {
    TranscriptSegment {
        index,
        start_millis: start,
        end_millis: end,
        speaker: None,
        text: text.to_string(),
    }
}

#[test]
fn test_summary_takes_first_three_sentences_and_flags_actions() -> Result<()> {
    let segments = vec![
        segment(0, 0, 30_000, "Le projet avance bien. On doit valider le budget."),
        segment(1, 30_000, 60_000, "Le client est content. La suite au prochain trimestre."),
    ];

    let json = SummaryGenerator::new().generate_summary(Some("Réunion"), &segments)?;
    let summary: RecordingSummary = serde_json::from_str(&json)?;

    assert_eq!(summary.title, "Réunion");
    assert_eq!(
        summary.summary,
        "Le projet avance bien. On doit valider le budget. Le client est content."
    );
    assert_eq!(summary.actions, vec!["On doit valider le budget"]);
    assert!(summary.tags.contains(&"projet".to_string()));
    assert!(summary.tags.contains(&"budget".to_string()));
    assert!(summary.tags.contains(&"client".to_string()));
    assert_eq!(summary.topics, summary.tags);
    assert!(!summary.keywords.is_empty());
    assert_eq!(summary.timing_summaries.len(), 2);
    assert_eq!(summary.timing_summaries[0].label, "Segment 1");

    Ok(())
}

#[test]
fn test_summary_with_no_text_uses_fallback() -> Result<()> {
    let json = SummaryGenerator::new().generate_summary(None, &[])?;
    let summary: RecordingSummary = serde_json::from_str(&json)?;

    assert_eq!(summary.title, "Session audio");
    assert_eq!(summary.summary, "Résumé automatique indisponible.");
    assert!(summary.actions.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_worker_transcribes_and_completes_session() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let cache_dir = temp_dir.path().join("cache");
    std::fs::create_dir_all(&cache_dir)?;

    let store = Arc::new(InMemorySessionStore::new());
    let cipher: Arc<dyn FileCipher> = Arc::new(XorFileCipher::default());

    // Produce an encrypted 65-second recording the way the controller would.
    let plain = temp_dir.path().join("plain.wav");
    write_wav(&plain, 65)?;
    let encrypted = temp_dir.path().join("recordings").join("1.wav.enc");
    cipher.encrypt_file(&plain, &encrypted).await?;

    let session_id = store
        .create_session(Some("standup".into()), Utc::now(), 65_000, encrypted, true)
        .await?;

    let worker = TranscriptionWorker::new(
        store.clone() as Arc<dyn SessionStore>,
        cipher,
        cache_dir.clone(),
    );
    let outcome = worker
        .run(JobPayload {
            session_id,
            use_alternate_engine: false,
        })
        .await;

    assert_eq!(outcome, JobOutcome::Success);

    let with_segments = store
        .get_session_with_segments(session_id)
        .await?
        .expect("session exists");
    assert_eq!(
        with_segments.session.transcription_status,
        TranscriptionStatus::Completed
    );
    assert_eq!(with_segments.segments.len(), 3);
    let summary: RecordingSummary =
        serde_json::from_str(with_segments.session.summary_json.as_deref().unwrap())?;
    assert_eq!(summary.title, "standup");

    // The decrypted scratch file must not outlive the job.
    let scratch = cache_dir.join(format!("transcribe-{}.wav", session_id));
    assert!(!scratch.exists(), "scratch file should be deleted");

    Ok(())
}

#[tokio::test]
async fn test_worker_missing_audio_file_fails_permanently() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = Arc::new(InMemorySessionStore::new());
    let cipher: Arc<dyn FileCipher> = Arc::new(XorFileCipher::default());

    let session_id = store
        .create_session(
            None,
            Utc::now(),
            0,
            temp_dir.path().join("missing.wav.enc"),
            true,
        )
        .await?;

    let worker = TranscriptionWorker::new(
        store.clone() as Arc<dyn SessionStore>,
        cipher,
        temp_dir.path().to_path_buf(),
    );
    let outcome = worker
        .run(JobPayload {
            session_id,
            use_alternate_engine: false,
        })
        .await;

    assert_eq!(outcome, JobOutcome::Failure);
    let with_segments = store.get_session_with_segments(session_id).await?.unwrap();
    assert_eq!(
        with_segments.session.transcription_status,
        TranscriptionStatus::Failed
    );

    Ok(())
}

/// Runner that blocks on a semaphore so tests can observe jobs in their
/// pending and running phases.
struct GatedRunner {
    gate: Arc<Semaphore>,
    started: AtomicUsize,
    finished: AtomicUsize,
}

#[async_trait::async_trait]
impl JobRunner for GatedRunner {
    async fn run(&self, _payload: JobPayload) -> JobOutcome {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.unwrap();
        self.finished.fetch_add(1, Ordering::SeqCst);
        JobOutcome::Success
    }
}

async fn wait_until(what: &str, mut check: impl FnMut() -> bool) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

#[tokio::test]
async fn test_enqueue_unique_replaces_pending_submission() {
    let runner = Arc::new(GatedRunner {
        gate: Arc::new(Semaphore::new(0)),
        started: AtomicUsize::new(0),
        finished: AtomicUsize::new(0),
    });
    let queue = InProcessJobQueue::new(runner.clone() as Arc<dyn JobRunner>);
    let key = job_key(42);
    assert!(key.contains("42"), "job key must embed the session id");

    let payload = JobPayload {
        session_id: 42,
        use_alternate_engine: false,
    };
    queue.enqueue_unique(key.clone(), payload).await;

    // Wait for the driver to pick the job up and block inside the runner.
    {
        let runner = runner.clone();
        wait_until("first job to start", move || {
            runner.started.load(Ordering::SeqCst) == 1
        })
        .await;
    }

    // Two more submissions while the first is running: they collapse into a
    // single pending entry.
    queue
        .enqueue_unique(
            key.clone(),
            JobPayload {
                session_id: 42,
                use_alternate_engine: true,
            },
        )
        .await;
    queue.enqueue_unique(key.clone(), payload).await;
    assert_eq!(queue.pending_jobs().await, vec![key.clone()]);

    // Release both runs (the in-flight one and the replaced pending one).
    runner.gate.add_permits(2);
    {
        let runner = runner.clone();
        wait_until("both runs to finish", move || {
            runner.finished.load(Ordering::SeqCst) == 2
        })
        .await;
    }

    assert_eq!(
        runner.started.load(Ordering::SeqCst),
        2,
        "three submissions must produce exactly two runs"
    );
    assert!(queue.pending_jobs().await.is_empty());
}
