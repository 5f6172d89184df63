//! Single pass tokenization and sentence segmentation.
//!
//! Lines are split on `\n` or `\r`, tokens on whitespace. Each token either
//! enters the vocabulary as a word or is kept as a literal. A sentence ends
//! after a terminal token or when the token limit is reached, but only once it
//! holds the minimum number of distinct words; shorter fragments merge into
//! the following text.

use crate::config::CompiledConfig;
use crate::sentence::Sentence;
use crate::types::{SentenceId, Token, WordLocation};
use crate::vocabulary::Vocabulary;
use tracing::{debug, info};

/// Per-token and per-sentence debug logs stop after this many lines or sentences.
const DEBUG_THRESHOLD: usize = 100;

/// Parse `text` into sealed sentences and the vocabulary they reference.
pub(crate) fn segment(text: &str, config: &CompiledConfig) -> (Vec<Sentence>, Vocabulary) {
    let mut segmenter = Segmenter::new(config);

    for (line_idx, line) in text.split(['\n', '\r']).enumerate() {
        for (token_idx, (column, raw)) in tokens_with_columns(line).into_iter().enumerate() {
            segmenter.process_token(line_idx, column, token_idx, raw);
        }
    }

    let (sentences, vocabulary) = segmenter.finalize();
    info!(
        sentences = sentences.len(),
        words = vocabulary.len(),
        "parsed document"
    );
    (sentences, vocabulary)
}

/// Non-empty whitespace separated tokens with their char column.
fn tokens_with_columns(line: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, usize)> = None;

    for (column, (byte, c)) in line.char_indices().enumerate() {
        if c.is_whitespace() {
            if let Some((start_byte, start_column)) = start.take() {
                tokens.push((start_column, &line[start_byte..byte]));
            }
        } else if start.is_none() {
            start = Some((byte, column));
        }
    }
    if let Some((start_byte, start_column)) = start {
        tokens.push((start_column, &line[start_byte..]));
    }

    tokens
}

struct Segmenter<'c> {
    config: &'c CompiledConfig,
    vocabulary: Vocabulary,
    sentences: Vec<Sentence>,
    current: Sentence,
}

impl<'c> Segmenter<'c> {
    fn new(config: &'c CompiledConfig) -> Self {
        Self {
            config,
            vocabulary: Vocabulary::new(),
            sentences: Vec::new(),
            current: Sentence::new(SentenceId(0), None, config.source_url.clone()),
        }
    }

    fn process_token(&mut self, line: usize, column: usize, token_on_line: usize, raw: &str) {
        let key = self.config.key_of(raw);

        let token = if self.config.is_word(&key, raw) {
            if line < DEBUG_THRESHOLD {
                debug!(
                    line,
                    sentence = self.current.index.index(),
                    token = token_on_line,
                    raw,
                    key = key.as_str(),
                    "word token"
                );
            }
            let location = WordLocation {
                line,
                column,
                token_on_line,
                sentence: self.current.index,
                token_in_sentence: self.current.token_count(),
                raw: raw.to_string(),
            };
            Token::Word(self.vocabulary.add_occurrence(&key, location))
        } else {
            Token::Literal(raw.to_string())
        };
        self.current.push(token);

        let at_token_limit = self
            .config
            .sentence_token_count_max
            .is_some_and(|max| self.current.token_count() >= max);
        if at_token_limit || self.config.ends_sentence(raw) {
            self.next_sentence();
        }
    }

    /// Seal the current sentence if it has enough words, and start the next one.
    fn next_sentence(&mut self) {
        if self.current.word_count() < self.config.sentence_word_count_min {
            return;
        }

        let sealed_index = self.current.index;
        let next_index = SentenceId(sealed_index.index() + 1);
        let mut sealed = std::mem::replace(
            &mut self.current,
            Sentence::new(
                next_index,
                Some(sealed_index),
                self.config.source_url.clone(),
            ),
        );
        sealed.set_next(Some(next_index));

        if self.sentences.len() < DEBUG_THRESHOLD {
            debug!(
                sentence = sealed_index.index(),
                text = %sealed.text(&self.vocabulary),
                "commit sentence"
            );
        }
        self.sentences.push(sealed);
    }

    fn finalize(mut self) -> (Vec<Sentence>, Vocabulary) {
        if self.current.is_empty() {
            if let Some(last) = self.sentences.last_mut() {
                last.set_next(None);
            }
        } else {
            // Final flush ignores the minimum word count.
            self.sentences.push(self.current);
        }

        (self.sentences, self.vocabulary)
    }
}
