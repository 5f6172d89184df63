//! Command line arguments and their mapping onto core options.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgGroup, Parser, ValueEnum};
use quizcard_core::anki::{NOTES_NAME_DEFAULT, NOTE_TYPE_DEFAULT};
use quizcard_core::config::SENTENCE_WORD_COUNT_MIN_DEFAULT;
use quizcard_core::{parse_probability, DocumentConfig, FrequencyLimit, NoteExport, NoteOptions, WordExclusion};

pub const OUTPUT_DIR_DEFAULT: &str = "out/anki/notes/fill-blanks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "quizcard-generator",
    version,
    about = "Generate multiple choice fill-in-the-blank Anki notes from a text document"
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["input_file", "input_file_content"])
))]
pub struct Cli {
    /// Path to the source text document
    #[arg(short = 'i', long)]
    pub input_file: Option<PathBuf>,
    /// Source text given directly
    #[arg(short = 'I', long)]
    pub input_file_content: Option<String>,
    /// Where the source text came from, attached to every sentence
    #[arg(long)]
    pub source_url: Option<String>,

    #[arg(short = 'l', long, value_enum, default_value_t = LogLevel::Debug)]
    pub log_level: LogLevel,
    /// Also write logs to this file
    #[arg(short = 'L', long)]
    pub log_file: Option<PathBuf>,

    /// Name of the notes collection, also the output file stem
    #[arg(short = 'n', long, default_value = NOTES_NAME_DEFAULT)]
    pub anki_notes_name: String,
    /// Word to keep out of the vocabulary; `/expr/` is a regular expression
    #[arg(short = 'E', long = "exclude-word")]
    pub exclude_words: Vec<WordExclusion>,
    /// File with one exclusion per line; `#` starts a comment line
    #[arg(short = 'e', long)]
    pub excludes_file: Option<PathBuf>,
    #[arg(long)]
    pub case_sensitive: bool,

    /// Minimum occurrences for a word to be tested
    #[arg(long, default_value_t = 0)]
    pub word_frequency_min: usize,
    /// Only test the N (or N%) most frequent words
    #[arg(long)]
    pub word_frequency_first: Option<FrequencyLimit>,
    /// Only test the N (or N%) least frequent words
    #[arg(long)]
    pub word_frequency_last: Option<FrequencyLimit>,
    /// Minimum key length for a word to be tested
    #[arg(long, default_value_t = 0)]
    pub word_length_min: usize,

    /// Extra note tag, repeatable
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,
    /// Maximum number of sentences to turn into notes
    #[arg(short = 'N', long)]
    pub limit: Option<usize>,

    /// Maximum tokens per sentence
    #[arg(long)]
    pub sentence_length_max: Option<usize>,
    /// Minimum distinct words per sentence
    #[arg(long, default_value_t = SENTENCE_WORD_COUNT_MIN_DEFAULT)]
    pub sentence_length_min: usize,
    /// Tokens of the previous sentence shown before each note
    #[arg(long, default_value_t = 0)]
    pub prologue: usize,
    /// Tokens of the next sentence shown after each note
    #[arg(long, default_value_t = 0)]
    pub epilogue: usize,
    /// Chance of a random choice replacing a close one, as 0.25 or 25%
    #[arg(long, value_parser = parse_choice_variation)]
    pub choice_variation: Option<f64>,
    #[arg(long)]
    pub max_edit_distance: Option<usize>,

    #[arg(long, default_value = OUTPUT_DIR_DEFAULT)]
    pub output_dir: PathBuf,
    /// Seed for choice selection and shuffling
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write a JSON summary of the vocabulary to this file
    #[arg(long)]
    pub words_json: Option<PathBuf>,
}

fn parse_choice_variation(s: &str) -> std::result::Result<f64, String> {
    parse_probability(s).map_err(|e| e.to_string())
}

/// Exclusions listed in a file, skipping blank and `#` comment lines.
pub fn parse_excludes(content: &str) -> Vec<WordExclusion> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.parse().ok())
        .collect()
}

impl Cli {
    pub fn read_input(&self) -> Result<String> {
        if let Some(content) = &self.input_file_content {
            return Ok(content.clone());
        }
        let path = self
            .input_file
            .as_ref()
            .context("no input file or input content given")?;
        fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))
    }

    pub fn document_config(&self) -> Result<DocumentConfig> {
        let mut excludes = self.exclude_words.clone();
        if let Some(path) = &self.excludes_file {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read excludes file {}", path.display()))?;
            excludes.extend(parse_excludes(&content));
        }

        let mut config = DocumentConfig {
            case_sensitive: self.case_sensitive,
            sentence_word_count_min: self.sentence_length_min,
            sentence_token_count_max: self.sentence_length_max,
            source_url: self.source_url.clone(),
            ..Default::default()
        }
        .with_excludes(excludes);
        if self.max_edit_distance.is_some() {
            config.max_edit_distance = self.max_edit_distance;
        }
        Ok(config)
    }

    pub fn note_options(&self) -> NoteOptions {
        NoteOptions {
            word_frequency_min: self.word_frequency_min,
            word_length_min: self.word_length_min,
            word_frequency_first: self.word_frequency_first,
            word_frequency_last: self.word_frequency_last,
            prologue_tokens: self.prologue,
            epilogue_tokens: self.epilogue,
            choice_variation: self.choice_variation,
            ..Default::default()
        }
    }

    pub fn note_export(&self) -> NoteExport {
        NoteExport {
            name: self.anki_notes_name.clone(),
            note_type: NOTE_TYPE_DEFAULT.to_string(),
            tags: self.tags.clone(),
            created_at: Utc::now(),
        }
    }
}
