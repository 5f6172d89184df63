//! Frequency ranking over a completed vocabulary.

use crate::types::{FrequencyExtreme, FrequencyLimit, RankOrder, WordId};
use crate::vocabulary::{Vocabulary, Word};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

type KeySet = Arc<HashSet<String>>;

/// Words ordered by descending frequency, ties in order of first appearance.
#[derive(Debug, Default)]
pub struct FrequencyIndex {
    descending: Vec<WordId>,
    memo: Mutex<HashMap<(FrequencyExtreme, usize), KeySet>>,
}

impl FrequencyIndex {
    pub fn build(words: &[Word]) -> Self {
        let mut descending: Vec<WordId> = words.iter().map(|word| word.id).collect();
        // sort_by_key is stable, so equal frequencies keep insertion order.
        descending.sort_by_key(|id| std::cmp::Reverse(words[id.index()].frequency()));
        Self {
            descending,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.descending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descending.is_empty()
    }

    /// Word id at a rank, counted from the chosen end.
    pub fn at_rank(&self, rank: usize, order: RankOrder) -> Option<WordId> {
        let index = match order {
            RankOrder::Descending => rank,
            RankOrder::Ascending => self.descending.len().checked_sub(rank + 1)?,
        };
        self.descending.get(index).copied()
    }

    pub fn descending(&self) -> &[WordId] {
        &self.descending
    }

    /// Keys of the `limit` most or least frequent words, memoized per size.
    pub fn keys_by_frequency(
        &self,
        vocabulary: &Vocabulary,
        limit: FrequencyLimit,
        extreme: FrequencyExtreme,
    ) -> KeySet {
        let count = limit.resolve(self.descending.len());
        if let FrequencyLimit::Proportion(_) = limit {
            debug!(%limit, count, "convert frequency percentage to count");
        }

        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        memo.entry((extreme, count))
            .or_insert_with(|| {
                let ids = match extreme {
                    FrequencyExtreme::Highest => &self.descending[..count],
                    FrequencyExtreme::Lowest => &self.descending[self.descending.len() - count..],
                };
                Arc::new(
                    ids.iter()
                        .map(|&id| vocabulary.key(id).to_string())
                        .collect(),
                )
            })
            .clone()
    }
}
