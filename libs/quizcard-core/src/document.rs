//! Document model: sentences, vocabulary and derived statistics.

use crate::config::{CompiledConfig, DocumentConfig};
use crate::distance::EditDistance;
use crate::distractor;
use crate::error::Result;
use crate::frequency::FrequencyIndex;
use crate::segmenter::segment;
use crate::sentence::{join_fragments, Sentence};
use crate::similarity::{apply_links, pairwise_distances};
use crate::types::{FrequencyExtreme, FrequencyLimit, RankOrder, WordId};
use crate::vocabulary::{Vocabulary, Word, WordSummary};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// A parsed document whose statistics have not been computed yet.
///
/// Only sentence and vocabulary lookups are available here; call
/// [`DocumentBuilder::finish`] to get a queryable [`Document`].
#[derive(Debug)]
pub struct DocumentBuilder {
    config: CompiledConfig,
    sentences: Vec<Sentence>,
    vocabulary: Vocabulary,
}

impl DocumentBuilder {
    /// Segment `text` and build its vocabulary. Fails only on bad configuration.
    pub fn parse(text: &str, config: &DocumentConfig) -> Result<Self> {
        let config = config.compile()?;
        let (sentences, vocabulary) = segment(text, &config);
        Ok(Self {
            config,
            sentences,
            vocabulary,
        })
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Compute probabilities, the frequency ranking and pairwise distances.
    ///
    /// Ranking and distances only read the vocabulary, so they run side by side.
    pub fn finish(self) -> Document {
        let Self {
            config,
            sentences,
            mut vocabulary,
        } = self;

        let (ranking, links) = {
            let words = vocabulary.words();
            rayon::join(
                || FrequencyIndex::build(words),
                || pairwise_distances(words, config.max_edit_distance),
            )
        };

        let population = vocabulary.len();
        let words = vocabulary.words_mut();
        for word in words.iter_mut() {
            word.set_probability(population);
        }
        apply_links(words, &links);

        info!(
            words = population,
            distances = links.len(),
            "calculated word statistics"
        );

        Document {
            config,
            sentences,
            vocabulary,
            ranking,
        }
    }
}

/// A finished, immutable document model.
#[derive(Debug)]
pub struct Document {
    config: CompiledConfig,
    sentences: Vec<Sentence>,
    vocabulary: Vocabulary,
    ranking: FrequencyIndex,
}

impl Document {
    /// Parse and finish in one step.
    pub fn new(text: &str, config: &DocumentConfig) -> Result<Self> {
        Ok(DocumentBuilder::parse(text, config)?.finish())
    }

    pub fn source_url(&self) -> Option<&str> {
        self.config.source_url.as_deref()
    }

    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Lookup by key; case is normalized the same way tokens were.
    pub fn word(&self, key: &str) -> Option<&Word> {
        self.vocabulary.get(&self.config.normalize_case(key))
    }

    pub fn word_by_id(&self, id: WordId) -> Option<&Word> {
        self.vocabulary.word(id)
    }

    /// Words in order of first appearance.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.vocabulary.iter()
    }

    pub fn word_count(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn word_by_frequency_rank(&self, rank: usize, order: RankOrder) -> Option<&Word> {
        self.ranking
            .at_rank(rank, order)
            .and_then(|id| self.vocabulary.word(id))
    }

    /// Keys of the most or least frequent words.
    pub fn words_by_frequency(
        &self,
        limit: FrequencyLimit,
        extreme: FrequencyExtreme,
    ) -> Arc<HashSet<String>> {
        self.ranking
            .keys_by_frequency(&self.vocabulary, limit, extreme)
    }

    /// Distance between two vocabulary words, if within the bound.
    pub fn edit_distance(&self, a: &str, b: &str) -> Option<EditDistance> {
        let a = self.word(a)?;
        let b = self.word(b)?;
        if a.id == b.id {
            return Some(EditDistance::new(0, a.len()));
        }
        a.distance_to(b.id)
    }

    /// Distractor keys for `word`; see [`distractor::closest_words`].
    pub fn closest_words<R: Rng + ?Sized>(
        &self,
        word: &Word,
        count: usize,
        random_probability: Option<f64>,
        rng: &mut R,
    ) -> Vec<&str> {
        distractor::closest_words(
            &self.vocabulary,
            &self.ranking,
            word,
            count,
            random_probability,
            rng,
        )
    }

    pub fn sentence_text(&self, sentence: &Sentence) -> String {
        sentence.text(&self.vocabulary)
    }

    /// The last `count` tokens of the sentence before `sentence`.
    pub fn prologue(&self, sentence: &Sentence, count: usize) -> String {
        if count == 0 {
            return String::new();
        }
        match sentence.prev().and_then(|id| self.sentence(id.index())) {
            Some(before) => before.tail(&self.vocabulary, count),
            None => {
                warn!(
                    sentence = sentence.index.index(),
                    count, "cannot include prologue tokens without a previous sentence"
                );
                String::new()
            }
        }
    }

    /// The first `count` tokens of the sentence after `sentence`.
    pub fn epilogue(&self, sentence: &Sentence, count: usize) -> String {
        if count == 0 {
            return String::new();
        }
        match sentence.next().and_then(|id| self.sentence(id.index())) {
            Some(after) => after.head(&self.vocabulary, count),
            None => {
                warn!(
                    sentence = sentence.index.index(),
                    count, "cannot include epilogue tokens without a next sentence"
                );
                String::new()
            }
        }
    }

    /// Sentence text surrounded by neighbouring context.
    pub fn sentence_text_with_context(
        &self,
        sentence: &Sentence,
        prologue_tokens: usize,
        epilogue_tokens: usize,
    ) -> String {
        let prologue = self.prologue(sentence, prologue_tokens);
        let text = self.sentence_text(sentence);
        let epilogue = self.epilogue(sentence, epilogue_tokens);
        join_fragments([prologue.as_str(), text.as_str(), epilogue.as_str()])
    }

    /// Serializable view of every word in order of first appearance.
    pub fn word_summaries(&self) -> Vec<WordSummary> {
        self.vocabulary
            .iter()
            .map(|word| self.vocabulary.summary(word))
            .collect()
    }
}
