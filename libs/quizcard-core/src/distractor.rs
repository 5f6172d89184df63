//! Nearest-neighbor distractor selection.

use crate::frequency::FrequencyIndex;
use crate::types::{RankOrder, WordId};
use crate::vocabulary::{Vocabulary, Word};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Collects distinct word ids up to a quota, never admitting the target word.
struct Selection {
    target: WordId,
    count: usize,
    order: Vec<WordId>,
    seen: HashSet<WordId>,
}

impl Selection {
    fn new(target: WordId, count: usize) -> Self {
        Self {
            target,
            count,
            order: Vec::with_capacity(count),
            seen: HashSet::with_capacity(count),
        }
    }

    fn is_full(&self) -> bool {
        self.order.len() >= self.count
    }

    fn remaining(&self) -> usize {
        self.count.saturating_sub(self.order.len())
    }

    fn add(&mut self, id: WordId) {
        if id != self.target && !self.is_full() && self.seen.insert(id) {
            self.order.push(id);
        }
    }
}

/// Up to `count` distinct keys close to `word`, nearest distances first.
///
/// When `random_probability` is given, every slot of a distance bucket first
/// rolls against it and on success takes a uniformly random vocabulary word.
/// A bucket larger than the remaining quota contributes a random subset.
/// Probabilities outside [0, 1] are clamped; NaN disables injection.
pub fn closest_words<'v, R: Rng + ?Sized>(
    vocabulary: &'v Vocabulary,
    ranking: &FrequencyIndex,
    word: &Word,
    count: usize,
    random_probability: Option<f64>,
    rng: &mut R,
) -> Vec<&'v str> {
    let Some((_, max_distance)) = word.distance_range() else {
        return Vec::new();
    };
    let random_probability = random_probability
        .filter(|p| !p.is_nan())
        .map(|p| p.clamp(0.0, 1.0));
    let population = ranking.len();

    let mut selection = Selection::new(word.id, count);
    for distance in 0..=max_distance {
        if selection.is_full() {
            break;
        }
        let candidates = word.words_at_distance(distance);

        if let Some(probability) = random_probability.filter(|_| population > 0) {
            for _ in 0..candidates.len() {
                if selection.is_full() {
                    break;
                }
                if rng.gen_bool(probability) {
                    let rank = rng.gen_range(0..population);
                    if let Some(id) = ranking.at_rank(rank, RankOrder::Descending) {
                        selection.add(id);
                    }
                }
            }
        }

        let remaining = selection.remaining();
        if candidates.len() > remaining {
            // Equidistant candidates have no meaningful order.
            let mut shuffled = candidates.to_vec();
            shuffled.shuffle(rng);
            shuffled.truncate(remaining);
            shuffled.into_iter().for_each(|id| selection.add(id));
        } else {
            candidates.iter().for_each(|&id| selection.add(id));
        }
    }

    selection
        .order
        .into_iter()
        .map(|id| vocabulary.key(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::{apply_links, pairwise_distances};
    use crate::types::{SentenceId, WordLocation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model(keys: &[&str]) -> (Vocabulary, FrequencyIndex) {
        let mut vocabulary = Vocabulary::new();
        for key in keys {
            vocabulary.add_occurrence(
                key,
                WordLocation {
                    line: 0,
                    column: 0,
                    token_on_line: 0,
                    sentence: SentenceId(0),
                    token_in_sentence: 0,
                    raw: key.to_string(),
                },
            );
        }
        let links = pairwise_distances(vocabulary.words(), Some(10));
        apply_links(vocabulary.words_mut(), &links);
        let ranking = FrequencyIndex::build(vocabulary.words());
        (vocabulary, ranking)
    }

    #[test]
    fn nearest_first() {
        let (vocab, ranking) = model(&["acorn", "acorns", "horn", "elephant"]);
        let mut rng = StdRng::seed_from_u64(7);
        let acorn = vocab.get("acorn").unwrap();
        let closest = closest_words(&vocab, &ranking, acorn, 2, None, &mut rng);
        assert_eq!(closest, vec!["acorns", "horn"]);
    }

    #[test]
    fn never_includes_self_and_respects_count() {
        let (vocab, ranking) = model(&["cat", "bat", "hat", "mat", "rat", "sat"]);
        let mut rng = StdRng::seed_from_u64(1);
        for word in vocab.iter() {
            for count in 0..8 {
                let closest = closest_words(&vocab, &ranking, word, count, Some(0.5), &mut rng);
                assert!(closest.len() <= count);
                assert!(!closest.contains(&word.key.as_str()));
                let unique: HashSet<_> = closest.iter().collect();
                assert_eq!(unique.len(), closest.len());
            }
        }
    }

    #[test]
    fn overflowing_bucket_takes_random_subset() {
        let (vocab, ranking) = model(&["cat", "bat", "hat", "mat", "rat", "sat"]);
        let cat = vocab.get("cat").unwrap();
        let mut seen = HashSet::new();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let closest = closest_words(&vocab, &ranking, cat, 2, None, &mut rng);
            assert_eq!(closest.len(), 2);
            seen.extend(closest);
        }
        assert!(seen.len() > 2, "subsets should vary across seeds: {seen:?}");
    }

    #[test]
    fn same_seed_same_result() {
        let (vocab, ranking) = model(&["cat", "bat", "hat", "mat", "rat", "sat", "cot"]);
        let cat = vocab.get("cat").unwrap();
        let first = closest_words(&vocab, &ranking, cat, 3, Some(0.3), &mut StdRng::seed_from_u64(9));
        let second = closest_words(&vocab, &ranking, cat, 3, Some(0.3), &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn certain_injection_still_excludes_self() {
        let (vocab, ranking) = model(&["cat", "bat"]);
        let cat = vocab.get("cat").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..16 {
            let closest = closest_words(&vocab, &ranking, cat, 4, Some(1.0), &mut rng);
            assert_eq!(closest, vec!["bat"]);
        }
    }

    #[test]
    fn injection_draws_from_whole_vocabulary() {
        let far = "zzzzzzzzzzzzzzzz";
        let (vocab, ranking) = model(&["cat", "bat", far]);
        let cat = vocab.get("cat").unwrap();
        assert_eq!(cat.distance_range(), Some((1, 1)));

        let mut injected = 0;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let closest = closest_words(&vocab, &ranking, cat, 2, Some(1.0), &mut rng);
            if closest.contains(&far) {
                injected += 1;
            }
            assert!(!closest.contains(&"cat"));
        }
        assert!(injected > 0, "out of bound word never injected");

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let closest = closest_words(&vocab, &ranking, cat, 2, Some(0.0), &mut rng);
            assert_eq!(closest, vec!["bat"]);
        }
    }

    #[test]
    fn lone_word_has_no_distractors() {
        let (vocab, ranking) = model(&["solo"]);
        let solo = vocab.get("solo").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(closest_words(&vocab, &ranking, solo, 4, Some(0.5), &mut rng).is_empty());
    }

    #[test]
    fn distant_words_are_unreachable() {
        let (vocab, ranking) = model(&["a", "bbbbbbbbbbbbbbbbbbbb"]);
        let a = vocab.get("a").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(closest_words(&vocab, &ranking, a, 4, None, &mut rng).is_empty());
    }
}
