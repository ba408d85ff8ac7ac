use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::SimilarityProvider;
use crate::types::Paragraph;

/// Memoizes `text_similarity` on the exact (source buffer, target buffer) pair.
///
/// The sentence aligner re-queries growing buffers while extending a group,
/// so repeated lookups are common within one paragraph pair. Entries are
/// never evicted: keep one cache per alignment call, borrowing the provider.
pub struct CachedSimilarity<P> {
    inner: P,
    cache: Mutex<HashMap<(String, String), f64>>,
}

impl<P: SimilarityProvider> CachedSimilarity<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cached_entries(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<P: SimilarityProvider> SimilarityProvider for CachedSimilarity<P> {
    fn text_similarity(&self, a: &str, b: &str) -> f64 {
        let key = (a.to_string(), b.to_string());
        if let Some(score) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return *score;
        }

        let score = self.inner.text_similarity(a, b);
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, score);
        score
    }

    fn sentence_scores(&self, source: &[String], target: &[String]) -> Vec<Vec<f64>> {
        self.inner.sentence_scores(source, target)
    }

    fn paragraph_scores(&self, source: &[Paragraph], target: &[Paragraph]) -> Vec<Vec<f64>> {
        self.inner.paragraph_scores(source, target)
    }
}
