use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Store-assigned identifier of a recording session.
pub type SessionId = i64;

/// Where a session sits in the transcription pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// A stored recording session with its metadata and summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSession {
    pub id: SessionId,

    pub title: Option<String>,

    /// Wall-clock start of the capture.
    pub started_at: DateTime<Utc>,

    /// Finalized once, when the capture loop terminates. Zero until then.
    pub duration_millis: u64,

    /// Path of the encrypted audio file. Precomputed at creation so a crash
    /// mid-capture still leaves a discoverable row.
    pub audio_path: PathBuf,

    pub encrypted: bool,

    pub transcription_status: TranscriptionStatus,

    /// Serialized `RecordingSummary`, set when transcription completes.
    pub summary_json: Option<String>,

    /// Denormalized free-form lists kept for search.
    pub participants: Vec<String>,
    pub tags: Vec<String>,
    pub topics: Vec<String>,
}

/// A portion of a transcript with its start/end timings in milliseconds.
///
/// Segments are 0-indexed and contiguous per session; each transcription run
/// replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub index: u32,
    pub start_millis: u64,
    pub end_millis: u64,
    pub speaker: Option<String>,
    pub text: String,
}

/// Derived summary payload written back after transcription.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingSummary {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub sentiments: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, rename = "timings")]
    pub timing_summaries: Vec<SummaryTiming>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTiming {
    pub label: String,
    pub start_millis: u64,
    pub end_millis: u64,
}
