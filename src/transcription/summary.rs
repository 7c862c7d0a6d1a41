use anyhow::Result;

use crate::session::{RecordingSummary, SummaryTiming, TranscriptSegment};

/// Sentence-extraction summarizer: first sentences as the summary, keyword
/// and tag heuristics by substring matching, light action-item detection.
pub struct SummaryGenerator;

impl SummaryGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Builds the summary payload for a finished transcription and returns it
    /// as pretty-printed JSON.
    pub fn generate_summary(
        &self,
        session_title: Option<&str>,
        segments: &[TranscriptSegment],
    ) -> Result<String> {
        let text_body = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let sentences: Vec<&str> = text_body
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let summary_text = match sentences.len() {
            0 => "Résumé automatique indisponible.".to_string(),
            1 => sentences[0].to_string(),
            _ => format!("{}.", sentences[..3.min(sentences.len())].join(". ")),
        };

        let summary = RecordingSummary {
            title: session_title.unwrap_or("Session audio").to_string(),
            summary: summary_text,
            actions: extract_action_items(&sentences),
            tags: suggest_tags(&text_body),
            topics: suggest_tags(&text_body),
            keywords: extract_keywords(&text_body),
            timing_summaries: segments
                .iter()
                .take(5)
                .map(|segment| SummaryTiming {
                    label: format!("Segment {}", segment.index + 1),
                    start_millis: segment.start_millis,
                    end_millis: segment.end_millis,
                })
                .collect(),
            ..Default::default()
        };
        Ok(serde_json::to_string_pretty(&summary)?)
    }
}

impl Default for SummaryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_action_items(sentences: &[&str]) -> Vec<String> {
    sentences
        .iter()
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            lower.contains("doit") || lower.contains("action") || lower.contains("faire")
        })
        .map(|s| s.to_string())
        .collect()
}

fn suggest_tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    ["projet", "budget", "client", "support"]
        .iter()
        .filter(|tag| lower.contains(*tag))
        .map(|tag| tag.to_string())
        .collect()
}

fn extract_keywords(text: &str) -> Vec<String> {
    // First-seen order is kept so ties resolve deterministically.
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in text.split([' ', '.', ',', ';', ':']) {
        let word = word.trim();
        if word.chars().count() <= 4 {
            continue;
        }
        let lower = word.to_lowercase();
        match counts.iter_mut().find(|(w, _)| *w == lower) {
            Some((_, count)) => *count += 1,
            None => counts.push((lower, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(10).map(|(word, _)| word).collect()
}
