//! Document parsing configuration.

use crate::error::{QuizcardError, Result};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::HashSet;
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Default minimum number of distinct words before a sentence may end.
pub const SENTENCE_WORD_COUNT_MIN_DEFAULT: usize = 3;

/// Default bound on computed edit distances.
pub const MAX_EDIT_DISTANCE_DEFAULT: usize = 10;

/// Characters removed from a token to build its canonical key.
pub const KEY_EXCLUDE_PATTERN_DEFAULT: &str = r"[^\p{L}\p{M}\p{N}]";

/// Tokens matching this pattern end a sentence.
pub const SENTENCE_END_PATTERN_DEFAULT: &str = r"[.?!]+";

/// A word kept out of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordExclusion {
    /// Compared against the canonical key.
    Literal(String),
    /// Regular expression tested against the raw token.
    Pattern(String),
}

impl FromStr for WordExclusion {
    type Err = Infallible;

    /// `/expr/` is a pattern; anything else is a literal.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = s.trim();
        match value
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(expr) if !expr.is_empty() => Ok(Self::Pattern(expr.to_string())),
            _ => Ok(Self::Literal(value.to_string())),
        }
    }
}

/// Configuration for building a document model.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentConfig {
    pub case_sensitive: bool,
    pub word_excludes: Vec<WordExclusion>,
    pub sentence_word_count_min: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_token_count_max: Option<usize>,
    /// `None` computes every distance in full.
    pub max_edit_distance: Option<usize>,
    pub key_exclude_pattern: String,
    pub sentence_end_pattern: String,
    /// Where the text came from; carried by every sentence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            word_excludes: Vec::new(),
            sentence_word_count_min: SENTENCE_WORD_COUNT_MIN_DEFAULT,
            sentence_token_count_max: None,
            max_edit_distance: Some(MAX_EDIT_DISTANCE_DEFAULT),
            key_exclude_pattern: KEY_EXCLUDE_PATTERN_DEFAULT.to_string(),
            sentence_end_pattern: SENTENCE_END_PATTERN_DEFAULT.to_string(),
            source_url: None,
        }
    }
}

impl DocumentConfig {
    pub fn with_excludes(mut self, excludes: impl IntoIterator<Item = WordExclusion>) -> Self {
        self.word_excludes.extend(excludes);
        self
    }

    /// Validate and compile every pattern.
    pub(crate) fn compile(&self) -> Result<CompiledConfig> {
        let key_exclude = compile_named("key exclude", &self.key_exclude_pattern)?;
        let sentence_end = compile_named("sentence end", &self.sentence_end_pattern)?;

        let mut literal_excludes = HashSet::new();
        let mut pattern_sources = Vec::new();
        for exclude in &self.word_excludes {
            match exclude {
                WordExclusion::Literal(literal) => {
                    literal_excludes.insert(self.normalize_case(literal));
                }
                WordExclusion::Pattern(pattern) => {
                    // Each pattern is checked alone so the error names the culprit.
                    Regex::new(pattern).map_err(|source| QuizcardError::InvalidExclusion {
                        pattern: pattern.clone(),
                        source,
                    })?;
                    pattern_sources.push(format!("({pattern})"));
                }
            }
        }

        let pattern_excludes = if pattern_sources.is_empty() {
            None
        } else {
            let combined = pattern_sources.join("|");
            let regex = RegexBuilder::new(&combined)
                .case_insensitive(!self.case_sensitive)
                .build()
                .map_err(|source| QuizcardError::InvalidExclusion {
                    pattern: combined.clone(),
                    source,
                })?;
            Some(regex)
        };

        debug!(
            literal_count = literal_excludes.len(),
            pattern = ?pattern_excludes.as_ref().map(Regex::as_str),
            "combined word excludes"
        );
        debug!(
            words_min = self.sentence_word_count_min,
            tokens_max = ?self.sentence_token_count_max,
            "sentence limits"
        );

        Ok(CompiledConfig {
            case_sensitive: self.case_sensitive,
            key_exclude,
            sentence_end,
            literal_excludes,
            pattern_excludes,
            sentence_word_count_min: self.sentence_word_count_min,
            sentence_token_count_max: self.sentence_token_count_max,
            max_edit_distance: self.max_edit_distance,
            source_url: self.source_url.as_deref().map(Arc::from),
        })
    }

    fn normalize_case(&self, s: &str) -> String {
        if self.case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    }
}

fn compile_named(name: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| QuizcardError::InvalidPattern {
        name,
        pattern: pattern.to_string(),
        source,
    })
}

/// Configuration with all patterns compiled.
#[derive(Debug, Clone)]
pub(crate) struct CompiledConfig {
    pub case_sensitive: bool,
    pub key_exclude: Regex,
    pub sentence_end: Regex,
    pub literal_excludes: HashSet<String>,
    pub pattern_excludes: Option<Regex>,
    pub sentence_word_count_min: usize,
    pub sentence_token_count_max: Option<usize>,
    pub max_edit_distance: Option<usize>,
    pub source_url: Option<Arc<str>>,
}

impl CompiledConfig {
    /// Canonical key of a raw token; may be empty.
    pub fn key_of(&self, raw: &str) -> String {
        let stripped = self.key_exclude.replace_all(raw, "");
        self.normalize_case(&stripped)
    }

    pub fn normalize_case(&self, s: &str) -> String {
        if self.case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    }

    /// Whether a token with this key and raw text enters the vocabulary.
    pub fn is_word(&self, key: &str, raw: &str) -> bool {
        !key.is_empty()
            && !self.literal_excludes.contains(key)
            && !self
                .pattern_excludes
                .as_ref()
                .is_some_and(|regex| regex.is_match(raw))
    }

    pub fn ends_sentence(&self, raw: &str) -> bool {
        self.sentence_end.is_match(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exclusion_literal_and_pattern() {
        assert_eq!(
            "Alice".parse::<WordExclusion>().unwrap(),
            WordExclusion::Literal("Alice".into())
        );
        assert_eq!(
            "/^[0-9]+$/".parse::<WordExclusion>().unwrap(),
            WordExclusion::Pattern("^[0-9]+$".into())
        );
        assert_eq!(
            "//".parse::<WordExclusion>().unwrap(),
            WordExclusion::Literal("//".into())
        );
    }

    #[test]
    fn key_strips_punctuation_and_folds_case() {
        let compiled = DocumentConfig::default().compile().unwrap();
        assert_eq!(compiled.key_of("BA'N'ANA"), "banana");
        assert_eq!(compiled.key_of("baNANa."), "banana");
        assert_eq!(compiled.key_of("--"), "");
    }

    #[test]
    fn case_sensitive_keys_keep_case() {
        let config = DocumentConfig {
            case_sensitive: true,
            ..Default::default()
        };
        let compiled = config.compile().unwrap();
        assert_eq!(compiled.key_of("Apple,"), "Apple");
    }

    #[test]
    fn literal_excludes_are_case_folded() {
        let config = DocumentConfig::default()
            .with_excludes([WordExclusion::Literal("Alice".into())]);
        let compiled = config.compile().unwrap();
        assert!(!compiled.is_word("alice", "Alice,"));
        assert!(compiled.is_word("bob", "Bob"));
    }

    #[test]
    fn patterns_combine_into_one_alternation() {
        let config = DocumentConfig::default().with_excludes([
            WordExclusion::Pattern("^[0-9]+$".into()),
            WordExclusion::Pattern("^mr".into()),
        ]);
        let compiled = config.compile().unwrap();
        let combined = compiled.pattern_excludes.as_ref().unwrap();
        assert_eq!(combined.as_str(), "(^[0-9]+$)|(^mr)");
        assert!(!compiled.is_word("1984", "1984"));
        assert!(!compiled.is_word("mrs", "MRS."));
        assert!(compiled.is_word("mars", "Mars"));
    }

    #[test]
    fn malformed_pattern_fails_fast() {
        let config =
            DocumentConfig::default().with_excludes([WordExclusion::Pattern("([a-z".into())]);
        assert!(matches!(
            config.compile(),
            Err(QuizcardError::InvalidExclusion { .. })
        ));
    }

    #[test]
    fn malformed_sentence_end_fails_fast() {
        let config = DocumentConfig {
            sentence_end_pattern: "[".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.compile(),
            Err(QuizcardError::InvalidPattern { name: "sentence end", .. })
        ));
    }

    #[test]
    fn sentence_end_matches_terminal_punctuation() {
        let compiled = DocumentConfig::default().compile().unwrap();
        assert!(compiled.ends_sentence("mat."));
        assert!(compiled.ends_sentence("really?!"));
        assert!(!compiled.ends_sentence("cat,"));
    }
}
