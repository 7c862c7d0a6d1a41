use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::model::{QuizDirection, QuizOption, QuizQuestion, Word, WordId};
use super::seed::SeedWord;

/// Fixed review interval ladder, in days, indexed by a word's SRS step.
pub const SRS_INTERVALS_DAYS: [i64; 4] = [1, 3, 7, 30];

/// The word set with its spaced-repetition scheduling and quiz-question
/// synthesis. Persistence of the deck is a collaborator concern; this owns
/// the algorithmic state.
#[derive(Debug, Default)]
pub struct WordDeck {
    words: Vec<Word>,
    next_id: WordId,
}

impl WordDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts seed words with fresh SRS state, due immediately.
    pub fn seed(&mut self, seeds: Vec<SeedWord>, now: DateTime<Utc>) {
        for seed in seeds {
            self.next_id += 1;
            self.words.push(Word {
                id: self.next_id,
                english: seed.english,
                french: seed.french,
                theme: seed.theme,
                example: seed.example,
                example_french: seed.example_french,
                srs_step: 0,
                next_review_at: now,
                last_review_at: None,
                success_count: 0,
                failure_count: 0,
            });
        }
    }

    pub fn add_word(
        &mut self,
        english: impl Into<String>,
        french: impl Into<String>,
        theme: impl Into<String>,
        example: Option<String>,
        example_french: Option<String>,
        now: DateTime<Utc>,
    ) -> WordId {
        self.next_id += 1;
        let id = self.next_id;
        self.words.push(Word {
            id,
            english: english.into().trim().to_string(),
            french: french.into().trim().to_string(),
            theme: theme.into().trim().to_string(),
            example,
            example_french,
            srs_step: 0,
            next_review_at: now,
            last_review_at: None,
            success_count: 0,
            failure_count: 0,
        });
        id
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn get(&self, id: WordId) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    /// Distinct themes, sorted.
    pub fn themes(&self) -> Vec<String> {
        let mut themes: Vec<String> = self.words.iter().map(|w| w.theme.clone()).collect();
        themes.sort();
        themes.dedup();
        themes
    }

    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.words.iter().filter(|w| w.next_review_at <= now).count()
    }

    /// Words due for review (next review at or before `now`), soonest first,
    /// optionally restricted to a theme set.
    pub fn due_words(&self, themes: &[String], now: DateTime<Utc>, limit: usize) -> Vec<&Word> {
        let mut due: Vec<&Word> = self
            .words
            .iter()
            .filter(|w| w.next_review_at <= now && theme_matches(themes, w))
            .collect();
        due.sort_by_key(|w| w.next_review_at);
        due.truncate(limit);
        due
    }

    /// Upcoming words ordered by soonest next review.
    pub fn upcoming_words(&self, themes: &[String], limit: usize) -> Vec<&Word> {
        let mut upcoming: Vec<&Word> = self
            .words
            .iter()
            .filter(|w| theme_matches(themes, w))
            .collect();
        upcoming.sort_by_key(|w| w.next_review_at);
        upcoming.truncate(limit);
        upcoming
    }

    /// Applies one review answer: the SRS step moves up (capped) on a correct
    /// answer, down (floored) on an incorrect one, and the next review lands
    /// `ladder[new_step]` days after `answered_at`.
    pub fn record_answer(
        &mut self,
        word_id: WordId,
        correct: bool,
        answered_at: DateTime<Utc>,
    ) -> Option<&Word> {
        let word = self.words.iter_mut().find(|w| w.id == word_id)?;
        let new_step = if correct {
            (word.srs_step + 1).min(SRS_INTERVALS_DAYS.len() - 1)
        } else {
            word.srs_step.saturating_sub(1)
        };
        word.srs_step = new_step;
        word.next_review_at = answered_at + Duration::days(SRS_INTERVALS_DAYS[new_step]);
        word.last_review_at = Some(answered_at);
        if correct {
            word.success_count += 1;
        } else {
            word.failure_count += 1;
        }
        Some(&*word)
    }

    /// Synthesizes a quiz question for the most urgent word.
    ///
    /// Candidate: a due word if any, else the soonest upcoming word, within
    /// the theme filter (empty filter = whole deck); `None` when the deck has
    /// no candidate. The direction comes from `(id + step) % 2`, kept
    /// deterministic on purpose so a given word/step always quizzes the same
    /// way.
    pub fn generate_question<R: Rng + ?Sized>(
        &self,
        themes: &[String],
        option_count: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<QuizQuestion> {
        let target = self
            .due_words(themes, now, 1)
            .first()
            .copied()
            .or_else(|| self.upcoming_words(themes, 1).first().copied())?
            .clone();

        let direction = if (target.id + target.srs_step as i64) % 2 == 0 {
            QuizDirection::EnToFr
        } else {
            QuizDirection::FrToEn
        };

        let distractors = self.pick_distractors(&target, option_count.saturating_sub(1), rng);

        let mut options = Vec::with_capacity(option_count);
        options.push(QuizOption {
            id: target.id,
            text: match direction {
                QuizDirection::EnToFr => target.french.clone(),
                QuizDirection::FrToEn => target.english.clone(),
            },
            is_correct: true,
        });
        for (i, distractor) in distractors.iter().enumerate() {
            options.push(QuizOption {
                id: -((i as WordId) + 1),
                text: match direction {
                    QuizDirection::EnToFr => distractor.french.clone(),
                    QuizDirection::FrToEn => distractor.english.clone(),
                },
                is_correct: false,
            });
        }
        options.shuffle(rng);

        let prompt = match direction {
            QuizDirection::EnToFr => format!(
                "Quelle est la traduction française de \"{}\" ?",
                target.english
            ),
            QuizDirection::FrToEn => {
                format!("What is the English translation of \"{}\"?", target.french)
            }
        };

        Some(QuizQuestion {
            word: target,
            prompt,
            direction,
            options,
        })
    }

    /// Distractors come from the target's theme first, backfilled from the
    /// whole deck when the theme is too small. Never includes the target or a
    /// duplicate pick.
    fn pick_distractors<R: Rng + ?Sized>(
        &self,
        target: &Word,
        count: usize,
        rng: &mut R,
    ) -> Vec<&Word> {
        if count == 0 {
            return Vec::new();
        }
        let mut picks: Vec<&Word> = self
            .words
            .iter()
            .filter(|w| w.id != target.id && w.theme == target.theme)
            .collect();
        picks.shuffle(rng);
        picks.truncate(count);

        if picks.len() < count {
            let mut rest: Vec<&Word> = self
                .words
                .iter()
                .filter(|w| w.id != target.id && !picks.iter().any(|p| p.id == w.id))
                .collect();
            rest.shuffle(rng);
            let missing = count - picks.len();
            picks.extend(rest.into_iter().take(missing));
        }
        picks
    }
}

fn theme_matches(themes: &[String], word: &Word) -> bool {
    themes.is_empty() || themes.iter().any(|t| *t == word.theme)
}
