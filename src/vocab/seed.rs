use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// A word ready to be inserted into a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedWord {
    pub english: String,
    pub french: String,
    pub theme: String,
    pub example: Option<String>,
    pub example_french: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedWordsPayload {
    words: Vec<SeedWordRecord>,
}

#[derive(Debug, Deserialize)]
struct SeedWordRecord {
    english: String,
    french: String,
    theme: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default, rename = "example_french")]
    example_french: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parses the seed-word JSON payload, trimming fields and dropping empty
/// optional examples.
pub fn load_seed_words(json: &str) -> Result<Vec<SeedWord>> {
    let payload: SeedWordsPayload =
        serde_json::from_str(json).context("Failed to parse seed words")?;
    Ok(payload
        .words
        .into_iter()
        .map(|record| SeedWord {
            english: record.english.trim().to_string(),
            french: record.french.trim().to_string(),
            theme: record.theme.trim().to_string(),
            example: clean(record.example),
            example_french: clean(record.example_french),
        })
        .collect())
}

pub fn load_seed_words_from_file(path: impl AsRef<Path>) -> Result<Vec<SeedWord>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    load_seed_words(&json)
}
