//! Anki cloze notes built from document sentences.
//!
//! # Format
//! Notes render to Anki's plain text import format, one tab separated row per
//! note:
//! ```text
//! #separator:tab
//! #html:true
//! #notetype column:1
//! #tags column:2
//! fill-blanks	"quizcard-generator notes"	"{{c1::The}} {{c2::cat}} sat."	"<div class=""choices"">…</div>"
//! ```

use crate::document::Document;
use crate::sentence::{join_fragments, Sentence};
use crate::types::{FrequencyExtreme, FrequencyLimit, Token};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{self, Write};
use tracing::{debug, info};

/// Distractors offered per cloze besides the answer.
pub const CHOICE_COUNT_DEFAULT: usize = 4;
pub const NOTE_TYPE_DEFAULT: &str = "fill-blanks";
pub const NOTES_NAME_DEFAULT: &str = "notes";
pub const TAG_DEFAULT: &str = "quizcard-generator";

const SEPARATOR: char = '\t';
const SEPARATOR_NAME: &str = "tab";
const INDENT: &str = "  ";

/// Which words of a sentence become clozes, and how they are presented.
#[derive(Debug, Clone, Serialize)]
pub struct NoteOptions {
    pub word_frequency_min: usize,
    pub word_length_min: usize,
    /// Only test the most frequent words. Takes precedence over `word_frequency_last`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_frequency_first: Option<FrequencyLimit>,
    /// Only test the least frequent words.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_frequency_last: Option<FrequencyLimit>,
    pub prologue_tokens: usize,
    pub epilogue_tokens: usize,
    pub choice_count: usize,
    /// Chance of a random word replacing a close one among the choices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_variation: Option<f64>,
}

impl Default for NoteOptions {
    fn default() -> Self {
        Self {
            word_frequency_min: 0,
            word_length_min: 0,
            word_frequency_first: None,
            word_frequency_last: None,
            prologue_tokens: 0,
            epilogue_tokens: 0,
            choice_count: CHOICE_COUNT_DEFAULT,
            choice_variation: None,
        }
    }
}

/// A blanked out word with its multiple choice options.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloze {
    /// One based cloze number within the note.
    pub index: usize,
    /// Raw text shown when the cloze is revealed.
    pub value: String,
    pub key: String,
    pub hint: Option<String>,
    /// Distractor keys, excluding the answer.
    pub choices: Vec<String>,
}

impl fmt::Display for Cloze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{c{}::{}", self.index, self.value)?;
        if let Some(hint) = &self.hint {
            write!(f, "::{hint}")?;
        }
        f.write_str("}}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnkiNote {
    pub text: String,
    pub clozes: Vec<Cloze>,
}

impl AnkiNote {
    /// Build a note, or `None` when no word of the sentence passes the filters.
    pub fn from_sentence<R: Rng + ?Sized>(
        doc: &Document,
        sentence: &Sentence,
        options: &NoteOptions,
        allowed: Option<&HashSet<String>>,
        rng: &mut R,
    ) -> Option<Self> {
        let vocabulary = doc.vocabulary();
        let mut parts = Vec::with_capacity(sentence.token_count());
        let mut clozes = Vec::new();

        for (position, token) in sentence.tokens().iter().enumerate() {
            let raw = sentence.token_text(vocabulary, position).unwrap_or_default();
            let word = match token {
                Token::Word(id) => doc.word_by_id(*id),
                Token::Literal(_) => None,
            };

            match word {
                Some(word)
                    if word.frequency() >= options.word_frequency_min
                        && word.len() >= options.word_length_min
                        && allowed.map_or(true, |keys| keys.contains(&word.key)) =>
                {
                    let choices = doc
                        .closest_words(word, options.choice_count, options.choice_variation, rng)
                        .into_iter()
                        .map(str::to_string)
                        .collect::<Vec<_>>();
                    debug!(key = word.key.as_str(), ?choices, "closest words");

                    let cloze = Cloze {
                        index: clozes.len() + 1,
                        value: raw.to_string(),
                        key: word.key.clone(),
                        hint: None,
                        choices,
                    };
                    parts.push(cloze.to_string());
                    clozes.push(cloze);
                }
                _ => parts.push(raw.to_string()),
            }
        }

        if clozes.is_empty() {
            return None;
        }

        let prologue = doc.prologue(sentence, options.prologue_tokens);
        let body = parts.join(" ");
        let epilogue = doc.epilogue(sentence, options.epilogue_tokens);
        Some(Self {
            text: join_fragments([prologue.as_str(), body.as_str(), epilogue.as_str()]),
            clozes,
        })
    }
}

/// Notes for the first `limit` sentences (all when `None`).
pub fn generate_notes<R: Rng + ?Sized>(
    doc: &Document,
    limit: Option<usize>,
    options: &NoteOptions,
    rng: &mut R,
) -> Vec<AnkiNote> {
    let count = limit.unwrap_or(doc.sentence_count());
    info!(count, "generate anki notes");

    let allowed = match (options.word_frequency_first, options.word_frequency_last) {
        (Some(first), _) => Some(doc.words_by_frequency(first, FrequencyExtreme::Highest)),
        (None, Some(last)) => Some(doc.words_by_frequency(last, FrequencyExtreme::Lowest)),
        (None, None) => None,
    };
    debug!(
        prologue = options.prologue_tokens,
        epilogue = options.epilogue_tokens,
        choice_variation = ?options.choice_variation,
        allowed_words = ?allowed.as_ref().map(|keys| keys.len()),
        "note options"
    );

    doc.sentences()
        .iter()
        .take(count)
        .filter_map(|sentence| {
            AnkiNote::from_sentence(doc, sentence, options, allowed.as_deref(), rng)
        })
        .collect()
}

/// Header and naming of an exported notes file.
#[derive(Debug, Clone)]
pub struct NoteExport {
    pub name: String,
    pub note_type: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Default for NoteExport {
    fn default() -> Self {
        Self {
            name: NOTES_NAME_DEFAULT.to_string(),
            note_type: NOTE_TYPE_DEFAULT.to_string(),
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

impl NoteExport {
    /// File name of the export, `<name>.txt`.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.name)
    }

    /// Default tag, custom tags and the collection name, deduplicated.
    pub fn all_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(TAG_DEFAULT.to_string())
            .chain(self.tags.iter().cloned())
            .chain(std::iter::once(self.name.clone()))
            .map(|tag| tag.split_whitespace().collect::<Vec<_>>().join("-"))
            .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
            .collect()
    }
}

/// Render notes in Anki's text import format. Choices are shuffled with `rng`.
pub fn render_notes<R: Rng + ?Sized>(notes: &[AnkiNote], export: &NoteExport, rng: &mut R) -> String {
    let mut out = String::new();
    let tags = export.all_tags().join(" ");

    // write! into a String cannot fail.
    let _ = writeln!(out, "# {} notes generated with quizcard-generator", notes.len());
    let _ = writeln!(
        out,
        "# author date = {}",
        export.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    let _ = writeln!(out, "#separator:{SEPARATOR_NAME}");
    let _ = writeln!(out, "#html:true");
    let _ = writeln!(out, "#notetype column:1");
    let _ = writeln!(out, "#tags column:2");

    for note in notes {
        out.push_str(&export.note_type);
        out.push(SEPARATOR);
        out.push_str(&quote_field(&tags));
        out.push(SEPARATOR);
        out.push_str(&quote_field(&note.text));
        out.push(SEPARATOR);
        out.push_str(&quote_field(&choices_html(note, rng)));
        out.push('\n');
    }

    out
}

fn choices_html<R: Rng + ?Sized>(note: &AnkiNote, rng: &mut R) -> String {
    let mut html = String::from("<div class=\"choices\">\n");
    for cloze in &note.clozes {
        let mut options: Vec<&str> = cloze.choices.iter().map(String::as_str).collect();
        options.push(&cloze.key);
        options.shuffle(rng);

        let _ = writeln!(html, "{INDENT}<div class=\"choice-{}\">", cloze.index);
        let _ = writeln!(html, "{INDENT}{INDENT}<ul>");
        for option in options {
            let _ = writeln!(html, "{INDENT}{INDENT}{INDENT}<li>{}</li>", escape_html(option));
        }
        let _ = writeln!(html, "{INDENT}{INDENT}</ul>");
        let _ = writeln!(html, "{INDENT}</div>");
    }
    html.push_str("</div>");
    html
}

fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
