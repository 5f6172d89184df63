//! Levenshtein edit distance between canonical keys.

use serde::Serialize;
use std::cmp::Ordering;

/// Decimal digits to which variances are rounded and considered equal.
pub const VARIANCE_PRECISION: u32 = 2;

const VARIANCE_SCALE: f64 = 100.0; // 10^VARIANCE_PRECISION

/// Edit distance between two words, with its length-normalized variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EditDistance {
    pub distance: usize,
    /// Variance scaled by 10^VARIANCE_PRECISION.
    variance_scaled: u32,
}

impl EditDistance {
    /// `longest` is the char length of the longer compared string.
    pub fn new(distance: usize, longest: usize) -> Self {
        let variance = if longest == 0 {
            0.0
        } else {
            distance as f64 / longest as f64
        };
        Self {
            distance,
            variance_scaled: (variance * VARIANCE_SCALE).round() as u32,
        }
    }

    /// Distance divided by the longer string's length, in [0, 1].
    pub fn variance(&self) -> f64 {
        self.variance_scaled as f64 / VARIANCE_SCALE
    }

    /// Order by variance, ignoring raw distance.
    pub fn cmp_variance(&self, other: &Self) -> Ordering {
        self.variance_scaled.cmp(&other.variance_scaled)
    }
}

/// Wagner-Fischer calculator that reuses its row buffers across calls.
///
/// Only two rows of the matrix are kept, so memory is linear in the length
/// of `a`.
#[derive(Debug, Default)]
pub struct DistanceMatrix {
    prev: Vec<usize>,
    curr: Vec<usize>,
}

impl DistanceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells currently reserved by the row buffers.
    pub fn capacity(&self) -> usize {
        self.prev.capacity() + self.curr.capacity()
    }

    /// Edit distance between `a` and `b`, or `None` when it exceeds `max_distance`.
    ///
    /// Row minima never decrease down the matrix, so the fill stops as soon as
    /// one row has no cell within the bound.
    pub fn distance(&mut self, a: &[char], b: &[char], max_distance: Option<usize>) -> Option<usize> {
        if let Some(max) = max_distance {
            if a.len().abs_diff(b.len()) > max {
                return None;
            }
        }

        let w = a.len() + 1;
        self.prev.clear();
        self.prev.extend(0..w);
        self.curr.clear();
        self.curr.resize(w, 0);

        for (y, &b_char) in b.iter().enumerate() {
            self.curr[0] = y + 1;
            let mut row_min = self.curr[0];
            for x in 1..w {
                let substitution = usize::from(a[x - 1] != b_char);
                let cost = (self.curr[x - 1] + 1)
                    .min(self.prev[x] + 1)
                    .min(self.prev[x - 1] + substitution);
                self.curr[x] = cost;
                row_min = row_min.min(cost);
            }
            std::mem::swap(&mut self.prev, &mut self.curr);

            if max_distance.is_some_and(|max| row_min > max) {
                return None;
            }
        }

        let distance = self.prev[w - 1];
        match max_distance {
            Some(max) if distance > max => None,
            _ => Some(distance),
        }
    }

    /// Distance with variance, or `None` beyond the bound.
    pub fn edit_distance(
        &mut self,
        a: &[char],
        b: &[char],
        max_distance: Option<usize>,
    ) -> Option<EditDistance> {
        self.distance(a, b, max_distance)
            .map(|distance| EditDistance::new(distance, a.len().max(b.len())))
    }
}

/// Unbounded edit distance between two strings, compared by chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    DistanceMatrix::new()
        .distance(&a, &b, None)
        .unwrap_or_default()
}
