//! Similarity providers consumed by the aligners.
//!
//! The alignment core only needs a score in [0, 1] between two text buffers
//! and a pairwise score table between two span lists. [`TfIdfModel`] is the
//! bundled vector-space implementation; [`CachedSimilarity`] memoizes buffer
//! lookups for providers that are expensive to query. The document aligner
//! wraps its provider in a fresh cache for every call.

mod cache;
mod tfidf;

pub use cache::CachedSimilarity;
pub use tfidf::{load_stop_words, TfIdfModel};

use crate::types::Paragraph;

pub trait SimilarityProvider: Send + Sync {
    /// Similarity of two arbitrary text buffers, expected in [0, 1].
    fn text_similarity(&self, a: &str, b: &str) -> f64;

    /// `[source.len()][target.len()]` table of sentence-pair scores.
    fn sentence_scores(&self, source: &[String], target: &[String]) -> Vec<Vec<f64>> {
        source
            .iter()
            .map(|a| target.iter().map(|b| self.text_similarity(a, b)).collect())
            .collect()
    }

    /// `[source.len()][target.len()]` table of paragraph-pair scores: the best
    /// sentence-pair score between the two paragraphs, 0.0 when either is empty.
    fn paragraph_scores(&self, source: &[Paragraph], target: &[Paragraph]) -> Vec<Vec<f64>> {
        source
            .iter()
            .map(|a| {
                target
                    .iter()
                    .map(|b| {
                        self.sentence_scores(a, b)
                            .into_iter()
                            .flatten()
                            .fold(None, |best: Option<f64>, score| {
                                Some(best.map_or(score, |best| best.max(score)))
                            })
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect()
    }
}

impl<P: SimilarityProvider + ?Sized> SimilarityProvider for &P {
    fn text_similarity(&self, a: &str, b: &str) -> f64 {
        (**self).text_similarity(a, b)
    }

    fn sentence_scores(&self, source: &[String], target: &[String]) -> Vec<Vec<f64>> {
        (**self).sentence_scores(source, target)
    }

    fn paragraph_scores(&self, source: &[Paragraph], target: &[Paragraph]) -> Vec<Vec<f64>> {
        (**self).paragraph_scores(source, target)
    }
}

/// Provider output with undefined scores mapped to 0.0.
pub(crate) fn sanitize(score: f64) -> f64 {
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::SimilarityProvider;

    /// Exact-match lookup table; identical texts score 1.0, unknown pairs 0.0.
    #[derive(Default)]
    pub(crate) struct TableSimilarity {
        scores: HashMap<(String, String), f64>,
    }

    impl TableSimilarity {
        pub(crate) fn with(mut self, a: &str, b: &str, score: f64) -> Self {
            self.scores.insert((a.to_string(), b.to_string()), score);
            self
        }
    }

    impl SimilarityProvider for TableSimilarity {
        fn text_similarity(&self, a: &str, b: &str) -> f64 {
            if let Some(score) = self.scores.get(&(a.to_string(), b.to_string())) {
                return *score;
            }
            if a == b {
                1.0
            } else {
                0.0
            }
        }
    }
}
