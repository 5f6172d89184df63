//! Sentences of a document.

use crate::types::{SentenceId, Token, WordId};
use crate::vocabulary::Vocabulary;
use std::collections::HashSet;
use std::sync::Arc;

/// Tokens are joined with a single space when rendered.
const TOKEN_DELIMITER: &str = " ";

/// An ordered run of tokens, sealed once the segmenter moves past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub index: SentenceId,
    tokens: Vec<Token>,
    words: Vec<WordId>,
    word_set: HashSet<WordId>,
    prev: Option<SentenceId>,
    next: Option<SentenceId>,
    source: Option<Arc<str>>,
}

impl Sentence {
    pub(crate) fn new(
        index: SentenceId,
        prev: Option<SentenceId>,
        source: Option<Arc<str>>,
    ) -> Self {
        Self {
            index,
            tokens: Vec::new(),
            words: Vec::new(),
            word_set: HashSet::new(),
            prev,
            next: None,
            source,
        }
    }

    pub(crate) fn push(&mut self, token: Token) {
        if let Token::Word(id) = token {
            if self.word_set.insert(id) {
                self.words.push(id);
            }
        }
        self.tokens.push(token);
    }

    pub(crate) fn set_next(&mut self, next: Option<SentenceId>) {
        self.next = next;
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Distinct words in order of first appearance in the sentence.
    pub fn words(&self) -> &[WordId] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn contains(&self, word: WordId) -> bool {
        self.word_set.contains(&word)
    }

    pub fn prev(&self) -> Option<SentenceId> {
        self.prev
    }

    pub fn next(&self) -> Option<SentenceId> {
        self.next
    }

    /// Source url of the document this sentence came from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Raw text of the token at `position`.
    pub fn token_text<'a>(&'a self, vocabulary: &'a Vocabulary, position: usize) -> Option<&'a str> {
        match self.tokens.get(position)? {
            Token::Literal(text) => Some(text.as_str()),
            Token::Word(id) => vocabulary
                .word(*id)
                .map(|word| word.raw_at(self.index, position)),
        }
    }

    /// Tokens in `range` rendered as text.
    pub(crate) fn render_range(&self, vocabulary: &Vocabulary, range: std::ops::Range<usize>) -> String {
        range
            .filter_map(|position| self.token_text(vocabulary, position))
            .collect::<Vec<_>>()
            .join(TOKEN_DELIMITER)
    }

    pub fn text(&self, vocabulary: &Vocabulary) -> String {
        self.render_range(vocabulary, 0..self.tokens.len())
    }

    /// The first `count` tokens.
    pub fn head(&self, vocabulary: &Vocabulary, count: usize) -> String {
        self.render_range(vocabulary, 0..count.min(self.tokens.len()))
    }

    /// The last `count` tokens.
    pub fn tail(&self, vocabulary: &Vocabulary, count: usize) -> String {
        let start = self.tokens.len().saturating_sub(count);
        self.render_range(vocabulary, start..self.tokens.len())
    }
}

/// Join non-empty text fragments with the token delimiter.
pub(crate) fn join_fragments<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    fragments
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(TOKEN_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordLocation;

    fn sentence_with(vocabulary: &mut Vocabulary, raws: &[&str]) -> Sentence {
        let mut sentence = Sentence::new(SentenceId(0), None, None);
        for raw in raws {
            let key: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();
            if key.is_empty() {
                sentence.push(Token::Literal(raw.to_string()));
            } else {
                let id = vocabulary.add_occurrence(
                    &key.to_lowercase(),
                    WordLocation {
                        line: 0,
                        column: 0,
                        token_on_line: sentence.token_count(),
                        sentence: SentenceId(0),
                        token_in_sentence: sentence.token_count(),
                        raw: raw.to_string(),
                    },
                );
                sentence.push(Token::Word(id));
            }
        }
        sentence
    }

    #[test]
    fn distinct_words_counted_once() {
        let mut vocabulary = Vocabulary::new();
        let sentence = sentence_with(&mut vocabulary, &["The", "cat", "-", "the", "hat."]);
        assert_eq!(sentence.token_count(), 5);
        assert_eq!(sentence.word_count(), 3);
        assert!(sentence.contains(vocabulary.get("hat").unwrap().id));
    }

    #[test]
    fn text_uses_raw_occurrences() {
        let mut vocabulary = Vocabulary::new();
        let sentence = sentence_with(&mut vocabulary, &["The", "cat", "-", "the", "hat."]);
        assert_eq!(sentence.text(&vocabulary), "The cat - the hat.");
        assert_eq!(sentence.head(&vocabulary, 2), "The cat");
        assert_eq!(sentence.tail(&vocabulary, 2), "the hat.");
        assert_eq!(sentence.tail(&vocabulary, 10), "The cat - the hat.");
        assert_eq!(sentence.head(&vocabulary, 0), "");
    }

    #[test]
    fn join_skips_empty_fragments() {
        assert_eq!(join_fragments(["", "a b", "", "c"]), "a b c");
    }
}
