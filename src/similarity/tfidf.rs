use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::SimilarityProvider;
use crate::error::{AlignmentError, InputFile};

/// Sparse TF-IDF vector, sorted by term id and L2-normalized.
type SparseVector = Vec<(usize, f64)>;

/// Vector-space similarity model trained on a sentence collection.
///
/// Every distinct training sentence is one document, however many times it
/// occurs in the corpus. Term weights are raw counts times `log2(N / df)`;
/// scores are cosine similarities of the weighted vectors.
/// Terms never seen during training, and stop words, carry no weight.
#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    stop_words: HashSet<String>,
    document_count: usize,
}

impl TfIdfModel {
    pub fn train<I, S>(documents: I, stop_words: HashSet<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        let mut distinct: HashSet<String> = HashSet::new();

        for document in documents {
            let document = document.as_ref().trim();
            if document.is_empty() || !distinct.insert(document.to_string()) {
                continue;
            }
            let mut seen = HashSet::new();
            for token in document.split_whitespace() {
                if stop_words.contains(token) || !seen.insert(token) {
                    continue;
                }
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(token.to_string()).or_insert(next_id);
                if id == document_frequency.len() {
                    document_frequency.push(0);
                }
                document_frequency[id] += 1;
            }
        }

        let document_count = distinct.len();
        let idf = document_frequency
            .iter()
            .map(|&df| (document_count as f64 / df as f64).log2())
            .collect();

        tracing::debug!(
            documents = document_count,
            vocabulary = vocabulary.len(),
            "tfidf: model trained"
        );

        Self {
            vocabulary,
            idf,
            stop_words,
            document_count,
        }
    }

    /// Trains on every line of the given files, with an optional stop word list.
    pub fn from_files<P: AsRef<Path>>(
        documents: &[P],
        stop_words_path: Option<&Path>,
    ) -> Result<Self, AlignmentError> {
        let stop_words = match stop_words_path {
            Some(path) => load_stop_words(path)?,
            None => HashSet::new(),
        };
        let mut lines = Vec::new();
        for path in documents {
            let path: &Path = path.as_ref();
            let text = std::fs::read_to_string(path)
                .map_err(|e| AlignmentError::read(InputFile::TrainingDocument, path, e))?;
            lines.extend(text.lines().map(str::to_string));
        }
        Ok(Self::train(lines, stop_words))
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    fn vectorize(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in text.split_whitespace() {
            if self.stop_words.contains(token) {
                continue;
            }
            if let Some(&id) = self.vocabulary.get(token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(id, count)| (id, count as f64 * self.idf[id]))
            .filter(|&(_, weight)| weight > 0.0)
            .collect();
        vector.sort_unstable_by_key(|&(id, _)| id);

        let norm = vector.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut vector {
                *weight /= norm;
            }
        }
        vector
    }
}

impl SimilarityProvider for TfIdfModel {
    fn text_similarity(&self, a: &str, b: &str) -> f64 {
        cosine(&self.vectorize(a), &self.vectorize(b))
    }

    fn sentence_scores(&self, source: &[String], target: &[String]) -> Vec<Vec<f64>> {
        let target_vectors: Vec<SparseVector> = target.iter().map(|s| self.vectorize(s)).collect();
        source
            .iter()
            .map(|s| {
                let vector = self.vectorize(s);
                target_vectors.iter().map(|t| cosine(&vector, t)).collect()
            })
            .collect()
    }
}

/// Dot product of two normalized sparse vectors; 0.0 when either is empty.
fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j) = (0usize, 0usize);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}

/// One stop word per line; blank lines are ignored.
pub fn load_stop_words(path: &Path) -> Result<HashSet<String>, AlignmentError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AlignmentError::read(InputFile::StopWords, path, e))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "the cat sat on the mat",
            "the dog chased the cat",
            "stocks fell sharply on monday",
            "the market recovered by friday",
        ]
    }

    fn stop_words() -> HashSet<String> {
        ["the", "on", "by"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn identical_text_scores_one() {
        let model = TfIdfModel::train(corpus(), stop_words());
        let score = model.text_similarity("the cat sat on the mat", "the cat sat on the mat");
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_text_scores_zero() {
        let model = TfIdfModel::train(corpus(), stop_words());
        assert_eq!(model.text_similarity("cat mat", "stocks monday"), 0.0);
    }

    #[test]
    fn shared_terms_score_between_zero_and_one() {
        let model = TfIdfModel::train(corpus(), stop_words());
        let score = model.text_similarity("the cat sat on the mat", "the dog chased the cat");
        assert!(score > 0.0 && score < 1.0, "score was {score}");
    }

    #[test]
    fn stop_words_and_unknown_terms_are_ignored() {
        let model = TfIdfModel::train(corpus(), stop_words());
        assert!(!model.vocabulary.contains_key("the"));
        assert_eq!(model.text_similarity("the on by", "the on by"), 0.0);
        assert_eq!(model.text_similarity("zebra", "zebra"), 0.0);
    }

    #[test]
    fn empty_training_set_never_panics() {
        let model = TfIdfModel::train(Vec::<String>::new(), HashSet::new());
        assert_eq!(model.document_count(), 0);
        assert_eq!(model.vocabulary_size(), 0);
        assert_eq!(model.text_similarity("a", "a"), 0.0);
    }

    #[test]
    fn sentence_scores_match_pairwise_queries() {
        let model = TfIdfModel::train(corpus(), stop_words());
        let source: Vec<String> = corpus()[..2].iter().map(|s| s.to_string()).collect();
        let target: Vec<String> = corpus()[1..].iter().map(|s| s.to_string()).collect();
        let table = model.sentence_scores(&source, &target);
        for (i, a) in source.iter().enumerate() {
            for (j, b) in target.iter().enumerate() {
                assert!((table[i][j] - model.text_similarity(a, b)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn from_files_reads_lines_and_stop_words() {
        let dir = std::env::temp_dir();
        let doc_path = dir.join("massalign_tfidf_doc.txt");
        let stop_path = dir.join("massalign_tfidf_stop.txt");
        std::fs::write(&doc_path, "the cat sat\n\nthe dog ran\n").expect("write document");
        std::fs::write(&stop_path, "the\n\n").expect("write stop words");

        let model = TfIdfModel::from_files(&[&doc_path], Some(stop_path.as_path()))
            .expect("training should succeed");
        assert_eq!(model.document_count(), 2);
        assert_eq!(model.vocabulary_size(), 4);

        let _ = std::fs::remove_file(&doc_path);
        let _ = std::fs::remove_file(&stop_path);
    }

    #[test]
    fn from_files_fails_on_missing_document() {
        let result = TfIdfModel::from_files(&["/nonexistent/doc.txt"], None);
        assert!(matches!(
            result,
            Err(AlignmentError::Read {
                kind: InputFile::TrainingDocument,
                ..
            })
        ));
    }

    #[test]
    fn repeated_sentences_count_once_in_document_frequency() {
        let repeated = TfIdfModel::train(["a b", "a b", " a b ", "a c", "c d"], HashSet::new());
        let distinct = TfIdfModel::train(["a b", "a c", "c d"], HashSet::new());
        assert_eq!(repeated.document_count(), 3);
        let score = repeated.text_similarity("a b", "a c");
        assert!((score - distinct.text_similarity("a b", "a c")).abs() < 1e-12);
        // Counting "a b" twice would pull this pair below 0.2.
        assert!(score > 0.2, "score was {score}");
    }
}
