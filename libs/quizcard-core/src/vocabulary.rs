//! Vocabulary index: distinct words keyed by canonical string.

use crate::distance::EditDistance;
use crate::types::{SentenceId, WordId, WordLocation};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// A distinct word of a document.
#[derive(Debug, Clone)]
pub struct Word {
    pub id: WordId,
    /// Normalized form used for deduplication.
    pub key: String,
    /// Raw token as encountered at the first occurrence.
    pub raw: String,
    key_chars: Vec<char>,
    locations: Vec<WordLocation>,
    sentence_locations: HashMap<(SentenceId, usize), usize>,
    probability: f64,
    distances: BTreeMap<usize, Vec<WordId>>,
    distances_by_word: HashMap<WordId, EditDistance>,
    distance_range: Option<(usize, usize)>,
}

impl Word {
    fn new(id: WordId, key: String, raw: String) -> Self {
        Self {
            id,
            key_chars: key.chars().collect(),
            key,
            raw,
            locations: Vec::new(),
            sentence_locations: HashMap::new(),
            probability: 0.0,
            distances: BTreeMap::new(),
            distances_by_word: HashMap::new(),
            distance_range: None,
        }
    }

    /// Number of occurrences.
    pub fn frequency(&self) -> usize {
        self.locations.len()
    }

    /// Frequency divided by the number of distinct words; zero until the document is finished.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Char length of the key.
    pub fn len(&self) -> usize {
        self.key_chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_chars.is_empty()
    }

    pub(crate) fn key_chars(&self) -> &[char] {
        &self.key_chars
    }

    pub fn locations(&self) -> &[WordLocation] {
        &self.locations
    }

    /// Raw text of the occurrence at a sentence position, else the first raw text.
    pub fn raw_at(&self, sentence: SentenceId, token_in_sentence: usize) -> &str {
        self.sentence_locations
            .get(&(sentence, token_in_sentence))
            .map(|&idx| self.locations[idx].raw.as_str())
            .unwrap_or(&self.raw)
    }

    /// Distance to another word, if one within the bound was computed.
    pub fn distance_to(&self, other: WordId) -> Option<EditDistance> {
        self.distances_by_word.get(&other).copied()
    }

    /// Words at exactly `distance`, in the order they were recorded.
    pub fn words_at_distance(&self, distance: usize) -> &[WordId] {
        self.distances
            .get(&distance)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Smallest and largest distance recorded for this word.
    pub fn distance_range(&self) -> Option<(usize, usize)> {
        self.distance_range
    }

    pub(crate) fn set_probability(&mut self, population: usize) {
        self.probability = if population == 0 {
            0.0
        } else {
            self.frequency() as f64 / population as f64
        };
    }

    pub(crate) fn set_distance(&mut self, other: WordId, distance: EditDistance) {
        debug_assert_ne!(other, self.id, "a word never stores a distance to itself");
        self.distances_by_word.insert(other, distance);
        self.distances
            .entry(distance.distance)
            .or_default()
            .push(other);
        self.distance_range = Some(match self.distance_range {
            Some((min, max)) => (min.min(distance.distance), max.max(distance.distance)),
            None => (distance.distance, distance.distance),
        });
    }

    fn add_location(&mut self, location: WordLocation) {
        self.sentence_locations.insert(
            (location.sentence, location.token_in_sentence),
            self.locations.len(),
        );
        self.locations.push(location);
    }
}

/// Serializable view of a word and its statistics.
#[derive(Debug, Clone, Serialize)]
pub struct WordSummary {
    pub key: String,
    pub raw: String,
    pub frequency: usize,
    pub probability: f64,
    pub distance_range: Option<(usize, usize)>,
    /// Keys of other words grouped by distance.
    pub distances: BTreeMap<usize, Vec<String>>,
    pub locations: Vec<WordLocation>,
}

/// Arena of words, indexed by [`WordId`] and by key.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<Word>,
    by_key: HashMap<String, WordId>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence of `key`, creating the word on first sight.
    pub fn add_occurrence(&mut self, key: &str, location: WordLocation) -> WordId {
        let id = match self.by_key.get(key) {
            Some(&id) => id,
            None => {
                let id = WordId(self.words.len());
                self.words
                    .push(Word::new(id, key.to_string(), location.raw.clone()));
                self.by_key.insert(key.to_string(), id);
                id
            }
        };
        self.words[id.index()].add_location(location);
        id
    }

    /// Lookup by an already normalized key.
    pub fn get(&self, key: &str) -> Option<&Word> {
        self.by_key.get(key).map(|id| &self.words[id.index()])
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.words.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    pub(crate) fn words(&self) -> &[Word] {
        &self.words
    }

    pub(crate) fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    /// Key of a word id; ids always come from this vocabulary.
    pub(crate) fn key(&self, id: WordId) -> &str {
        &self.words[id.index()].key
    }

    pub fn summary(&self, word: &Word) -> WordSummary {
        WordSummary {
            key: word.key.clone(),
            raw: word.raw.clone(),
            frequency: word.frequency(),
            probability: word.probability(),
            distance_range: word.distance_range(),
            distances: word
                .distances
                .iter()
                .map(|(distance, ids)| {
                    let keys = ids.iter().map(|&id| self.key(id).to_string()).collect();
                    (*distance, keys)
                })
                .collect(),
            locations: word.locations.clone(),
        }
    }
}
