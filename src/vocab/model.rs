use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a vocabulary word. Distractor options carry synthetic
/// negative ids, so real word ids are always positive.
pub type WordId = i64;

/// A vocabulary entry with its spaced-repetition state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub english: String,
    pub french: String,
    pub theme: String,
    pub example: Option<String>,
    pub example_french: Option<String>,
    /// Index into the fixed interval ladder.
    pub srs_step: usize,
    pub next_review_at: DateTime<Utc>,
    pub last_review_at: Option<DateTime<Utc>>,
    pub success_count: u32,
    pub failure_count: u32,
}

/// Translation direction of a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizDirection {
    EnToFr,
    FrToEn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    /// The target word's id for the correct option, a negative synthetic id
    /// for distractors.
    pub id: WordId,
    pub text: String,
    pub is_correct: bool,
}

/// A generated quiz question: one correct option among shuffled distractors.
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub word: Word,
    pub prompt: String,
    pub direction: QuizDirection,
    pub options: Vec<QuizOption>,
}
