//! Property-based tests for the document model.
//!
//! Tests invariants:
//! - Edit distance is symmetric and zero only for equal strings
//! - Distractors never include the word itself and respect the count
//! - Frequency equals the number of recorded occurrences
//! - Highest and lowest frequency sets are disjoint below half the vocabulary
//! - Rebuilding from the same input yields the same model

use proptest::prelude::*;
use quizcard_core::{
    edit_distance, Document, DocumentConfig, FrequencyExtreme, FrequencyLimit,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn word() -> impl Strategy<Value = String> {
    "[a-e]{1,6}"
}

fn document_text() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-f]{1,5}", prop::sample::select(vec!["", ".", ",", "!"])), 0..40)
        .prop_map(|tokens| {
            tokens
                .into_iter()
                .map(|(word, punct)| format!("{word}{punct}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in word(), b in word()) {
        prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
    }

    #[test]
    fn distance_is_zero_only_for_equal(a in word(), b in word()) {
        prop_assert_eq!(edit_distance(&a, &a), 0);
        prop_assert_eq!(edit_distance(&a, &b) == 0, a == b);
    }

    #[test]
    fn distance_bounded_by_longer_length(a in word(), b in word()) {
        let longest = a.chars().count().max(b.chars().count());
        prop_assert!(edit_distance(&a, &b) <= longest);
    }

    #[test]
    fn frequency_matches_occurrences(text in document_text()) {
        let doc = Document::new(&text, &DocumentConfig::default()).unwrap();
        let total: usize = doc.words().map(|w| w.frequency()).sum();
        let word_tokens = doc
            .sentences()
            .iter()
            .map(|s| s.tokens().iter().filter(|t| t.word_id().is_some()).count())
            .sum::<usize>();
        prop_assert_eq!(total, word_tokens);
        for word in doc.words() {
            prop_assert_eq!(word.frequency(), word.locations().len());
            prop_assert!(!word.key.is_empty());
        }
    }

    #[test]
    fn stored_distances_are_symmetric(text in document_text()) {
        let doc = Document::new(&text, &DocumentConfig::default()).unwrap();
        for a in doc.words() {
            prop_assert!(a.distance_to(a.id).is_none());
            for b in doc.words() {
                if a.id != b.id {
                    prop_assert_eq!(a.distance_to(b.id), b.distance_to(a.id));
                }
            }
        }
    }

    #[test]
    fn closest_words_exclude_self(text in document_text(), count in 0usize..6, seed in any::<u64>()) {
        let doc = Document::new(&text, &DocumentConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for word in doc.words() {
            let closest = doc.closest_words(word, count, Some(0.3), &mut rng);
            prop_assert!(closest.len() <= count);
            prop_assert!(!closest.contains(&word.key.as_str()));
            let unique: HashSet<_> = closest.iter().collect();
            prop_assert_eq!(unique.len(), closest.len());
        }
    }

    #[test]
    fn frequency_extremes_partition(text in document_text()) {
        let doc = Document::new(&text, &DocumentConfig::default()).unwrap();
        let total = doc.word_count();
        let n = total.saturating_sub(1) / 2;
        let highest = doc.words_by_frequency(FrequencyLimit::Count(n), FrequencyExtreme::Highest);
        let lowest = doc.words_by_frequency(FrequencyLimit::Count(n), FrequencyExtreme::Lowest);
        prop_assert!(highest.is_disjoint(&lowest));

        let all: HashSet<String> = doc.words().map(|w| w.key.clone()).collect();
        let middle: HashSet<String> = all
            .iter()
            .filter(|key| !highest.contains(*key) && !lowest.contains(*key))
            .cloned()
            .collect();
        prop_assert_eq!(highest.len() + lowest.len() + middle.len(), total);
    }

    #[test]
    fn rebuild_is_deterministic(text in document_text(), seed in any::<u64>()) {
        let config = DocumentConfig::default();
        let first = Document::new(&text, &config).unwrap();
        let second = Document::new(&text, &config).unwrap();

        prop_assert_eq!(first.sentence_count(), second.sentence_count());
        for (a, b) in first.words().zip(second.words()) {
            prop_assert_eq!(&a.key, &b.key);
            prop_assert_eq!(a.frequency(), b.frequency());
            let closest_a = first.closest_words(a, 4, Some(0.0), &mut StdRng::seed_from_u64(seed));
            let closest_b = second.closest_words(b, 4, Some(0.0), &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(closest_a, closest_b);
        }
    }
}

#[test]
fn short_sentences_merge_into_following_text() {
    let doc = Document::new("Hi. Ok. The cat sat on the mat.", &DocumentConfig::default()).unwrap();
    assert_eq!(doc.sentence_count(), 1);
    assert_eq!(doc.sentence(0).unwrap().word_count(), 7);
}

#[test]
fn documented_distances() {
    assert_eq!(edit_distance("acorn", "acorns"), 1);
    assert_eq!(edit_distance("acorn", "horn"), 2);
    assert_eq!(edit_distance("horn", "acorn"), 2);
}
