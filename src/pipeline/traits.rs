use crate::alignment::sentence::SentenceSearchParams;
use crate::similarity::SimilarityProvider;
use crate::types::{AlignmentPath, Paragraph};

/// Alignment strategy over two ordered span lists.
///
/// Implementations never fail: degenerate input (an empty side, a provider
/// table of the wrong shape) yields an empty path.
pub trait Aligner: Send + Sync {
    fn align_paragraphs(
        &self,
        source: &[Paragraph],
        target: &[Paragraph],
        similarity: &dyn SimilarityProvider,
        acceptable_similarity: f64,
    ) -> AlignmentPath;

    fn align_sentences(
        &self,
        source: &[String],
        target: &[String],
        similarity: &dyn SimilarityProvider,
        params: SentenceSearchParams,
    ) -> AlignmentPath;
}
