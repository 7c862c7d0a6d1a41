//! Spaced-repetition vocabulary trainer: interval scheduling and quiz
//! question synthesis, independent of the recording pipeline.

mod model;
mod scheduler;
mod seed;

pub use model::{QuizDirection, QuizOption, QuizQuestion, Word, WordId};
pub use scheduler::{WordDeck, SRS_INTERVALS_DAYS};
pub use seed::{load_seed_words, load_seed_words_from_file, SeedWord};
