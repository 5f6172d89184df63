//! Core types shared across the document model.

use crate::error::{QuizcardError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Dense index of a word within one document, assigned in order of first appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WordId(pub usize);

impl WordId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordinal index of a sentence within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SentenceId(pub usize);

impl SentenceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A whitespace-delimited unit of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Token that entered the vocabulary.
    Word(WordId),
    /// Token kept verbatim, e.g. punctuation or an excluded word.
    Literal(String),
}

impl Token {
    pub fn word_id(&self) -> Option<WordId> {
        match self {
            Self::Word(id) => Some(*id),
            Self::Literal(_) => None,
        }
    }
}

/// One occurrence of a word in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordLocation {
    /// Zero based line index.
    pub line: usize,
    /// Character offset of the token on its line.
    pub column: usize,
    /// Index of the token among the non-empty tokens of its line.
    pub token_on_line: usize,
    pub sentence: SentenceId,
    pub token_in_sentence: usize,
    /// Raw token text at this occurrence, surrounding punctuation included.
    pub raw: String,
}

/// Direction of a frequency rank lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankOrder {
    /// Rank 0 is the most frequent word.
    #[default]
    Descending,
    /// Rank 0 is the least frequent word.
    Ascending,
}

/// Which end of the frequency ranking to take words from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyExtreme {
    Highest,
    Lowest,
}

/// Number of words to take from one end of the frequency ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyLimit {
    Count(usize),
    /// Proportion of the vocabulary in [0, 1], rounded up to a word count.
    Proportion(f64),
}

impl FrequencyLimit {
    /// Resolve to a word count for a vocabulary of `population` words.
    pub fn resolve(self, population: usize) -> usize {
        match self {
            Self::Count(count) => count.min(population),
            Self::Proportion(proportion) => {
                let count = (proportion * population as f64).ceil();
                (count.max(0.0) as usize).min(population)
            }
        }
    }
}

impl FromStr for FrequencyLimit {
    type Err = QuizcardError;

    /// `"12"` is a count, `"25%"` a proportion of the vocabulary.
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        let invalid = || QuizcardError::InvalidLimit {
            value: s.to_string(),
        };

        if let Some(percent) = value.strip_suffix('%') {
            let percent: f64 = percent.trim().parse().map_err(|_| invalid())?;
            if !(0.0..=100.0).contains(&percent) {
                return Err(invalid());
            }
            Ok(Self::Proportion(percent / 100.0))
        } else {
            value.parse::<usize>().map(Self::Count).map_err(|_| invalid())
        }
    }
}

impl fmt::Display for FrequencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Proportion(proportion) => write!(f, "{}%", proportion * 100.0),
        }
    }
}

/// Parse a probability given either as a number in [0, 1] or as a percentage.
pub fn parse_probability(s: &str) -> Result<f64> {
    let value = s.trim();
    let parsed = match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().map(|p| p / 100.0),
        None => value.parse::<f64>(),
    }
    .map_err(|_| QuizcardError::InvalidLimit {
        value: s.to_string(),
    })?;

    check_probability(parsed)
}

pub(crate) fn check_probability(value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(QuizcardError::InvalidProbability { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_limit() {
        assert_eq!("12".parse::<FrequencyLimit>().unwrap(), FrequencyLimit::Count(12));
    }

    #[test]
    fn parse_percentage_limit() {
        assert_eq!(
            "25%".parse::<FrequencyLimit>().unwrap(),
            FrequencyLimit::Proportion(0.25)
        );
    }

    #[test]
    fn reject_bad_limits() {
        assert!("abc".parse::<FrequencyLimit>().is_err());
        assert!("-3".parse::<FrequencyLimit>().is_err());
        assert!("150%".parse::<FrequencyLimit>().is_err());
    }

    #[test]
    fn proportion_rounds_up() {
        assert_eq!(FrequencyLimit::Proportion(0.25).resolve(10), 3);
        assert_eq!(FrequencyLimit::Proportion(0.0).resolve(10), 0);
        assert_eq!(FrequencyLimit::Count(50).resolve(10), 10);
    }

    #[test]
    fn probability_accepts_number_or_percentage() {
        assert_eq!(parse_probability("0.5").unwrap(), 0.5);
        assert_eq!(parse_probability("20%").unwrap(), 0.2);
        assert!(matches!(
            parse_probability("2"),
            Err(QuizcardError::InvalidProbability { .. })
        ));
        assert!(parse_probability("lots").is_err());
    }

    #[test]
    fn token_word_id() {
        assert_eq!(Token::Word(WordId(3)).word_id(), Some(WordId(3)));
        assert_eq!(Token::Literal("--".into()).word_id(), None);
    }
}
