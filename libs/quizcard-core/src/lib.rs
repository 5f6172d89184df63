//! Quiz card generation core.
//!
//! Provides:
//! - Sentence segmentation and a vocabulary index over a raw text document
//! - Word frequency ranking
//! - Pairwise Levenshtein distances between words
//! - Nearest-neighbor distractor selection for multiple choice cards
//! - Anki cloze note generation

pub mod anki;
pub mod config;
pub mod distance;
pub mod distractor;
pub mod document;
pub mod error;
pub mod frequency;
mod segmenter;
pub mod sentence;
pub mod similarity;
pub mod types;
pub mod vocabulary;

pub use anki::{generate_notes, render_notes, AnkiNote, Cloze, NoteExport, NoteOptions};
pub use config::{DocumentConfig, WordExclusion};
pub use distance::{edit_distance, DistanceMatrix, EditDistance};
pub use document::{Document, DocumentBuilder};
pub use error::{QuizcardError, Result};
pub use sentence::Sentence;
pub use types::{
    parse_probability, FrequencyExtreme, FrequencyLimit, RankOrder, SentenceId, Token, WordId,
    WordLocation,
};
pub use vocabulary::{Vocabulary, Word, WordSummary};
