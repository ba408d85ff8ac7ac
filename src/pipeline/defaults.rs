use crate::alignment::matrix::SimilarityMatrix;
use crate::alignment::sentence::{align_sentence_matrix, SentenceSearchParams};
use crate::alignment::vicinity::align_paragraph_matrix;
use crate::pipeline::traits::Aligner;
use crate::similarity::SimilarityProvider;
use crate::types::{AlignmentPath, Paragraph};

/// Greedy vicinity-driven search at both granularities.
pub struct VicinityAligner;

impl Aligner for VicinityAligner {
    fn align_paragraphs(
        &self,
        source: &[Paragraph],
        target: &[Paragraph],
        similarity: &dyn SimilarityProvider,
        acceptable_similarity: f64,
    ) -> AlignmentPath {
        if source.is_empty() || target.is_empty() {
            return AlignmentPath::default();
        }
        let scores = similarity.paragraph_scores(source, target);
        match SimilarityMatrix::from_scores(&scores, source.len(), target.len()) {
            Some(matrix) => align_paragraph_matrix(&matrix, acceptable_similarity),
            None => AlignmentPath::default(),
        }
    }

    fn align_sentences(
        &self,
        source: &[String],
        target: &[String],
        similarity: &dyn SimilarityProvider,
        params: SentenceSearchParams,
    ) -> AlignmentPath {
        if source.is_empty() || target.is_empty() {
            return AlignmentPath::default();
        }
        let scores = similarity.sentence_scores(source, target);
        match SimilarityMatrix::from_scores(&scores, source.len(), target.len()) {
            Some(matrix) => align_sentence_matrix(&matrix, source, target, similarity, params),
            None => AlignmentPath::default(),
        }
    }
}
