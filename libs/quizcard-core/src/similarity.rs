//! Pairwise edit distances across a vocabulary.

use crate::distance::{DistanceMatrix, EditDistance};
use crate::types::WordId;
use crate::vocabulary::Word;
use rayon::prelude::*;
use tracing::debug;

/// A finite distance between two words, `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceLink {
    pub a: WordId,
    pub b: WordId,
    pub distance: EditDistance,
}

/// Compute distances for every unordered pair of distinct words.
///
/// Rows of the upper triangle are spread over the rayon pool, each worker
/// reusing its own matrix. Links come back in row-major order regardless of
/// scheduling.
pub fn pairwise_distances(words: &[Word], max_distance: Option<usize>) -> Vec<DistanceLink> {
    let links: Vec<DistanceLink> = (0..words.len())
        .into_par_iter()
        .map_init(DistanceMatrix::new, |matrix, a| {
            let word_a = &words[a];
            words[a + 1..]
                .iter()
                .filter_map(|word_b| {
                    matrix
                        .edit_distance(word_a.key_chars(), word_b.key_chars(), max_distance)
                        .map(|distance| DistanceLink {
                            a: word_a.id,
                            b: word_b.id,
                            distance,
                        })
                })
                .collect::<Vec<_>>()
        })
        .flatten()
        .collect();

    debug!(
        words = words.len(),
        links = links.len(),
        max_distance = ?max_distance,
        "computed pairwise edit distances"
    );
    links
}

/// Record each link on both of its words.
pub fn apply_links(words: &mut [Word], links: &[DistanceLink]) {
    for link in links {
        words[link.a.index()].set_distance(link.b, link.distance);
        words[link.b.index()].set_distance(link.a, link.distance);
    }
}
