use crate::alignment::sentence::SentenceSearchParams;
use crate::pipeline::traits::Aligner;
use crate::similarity::{CachedSimilarity, SimilarityProvider};
use crate::types::{AlignmentNode, AlignmentPath, DocumentAlignment, Paragraph, ParagraphPairAlignment};

/// Paragraph-then-sentence alignment of whole documents.
///
/// Every call memoizes buffer similarities in its own cache, dropped when the
/// call returns; nothing is shared between document pairs.
pub struct DocumentAligner {
    similarity: Box<dyn SimilarityProvider>,
    aligner: Box<dyn Aligner>,
    paragraph_acceptable_similarity: f64,
    sentence_params: SentenceSearchParams,
}

pub(crate) struct DocumentAlignerParts {
    pub similarity: Box<dyn SimilarityProvider>,
    pub aligner: Box<dyn Aligner>,
    pub paragraph_acceptable_similarity: f64,
    pub sentence_params: SentenceSearchParams,
}

impl DocumentAligner {
    pub(crate) fn from_parts(parts: DocumentAlignerParts) -> Self {
        Self {
            similarity: parts.similarity,
            aligner: parts.aligner,
            paragraph_acceptable_similarity: parts.paragraph_acceptable_similarity,
            sentence_params: parts.sentence_params,
        }
    }

    pub fn paragraph_acceptable_similarity(&self) -> f64 {
        self.paragraph_acceptable_similarity
    }

    pub fn sentence_params(&self) -> SentenceSearchParams {
        self.sentence_params
    }

    pub fn similarity(&self) -> &dyn SimilarityProvider {
        self.similarity.as_ref()
    }

    pub fn align(&self, source: &[Paragraph], target: &[Paragraph]) -> DocumentAlignment {
        if source.is_empty() || target.is_empty() {
            tracing::warn!(
                source_paragraphs = source.len(),
                target_paragraphs = target.len(),
                "document aligner received an empty document; nothing to align"
            );
            return DocumentAlignment::default();
        }

        let similarity = CachedSimilarity::new(self.similarity.as_ref());
        let paragraph_path = self.paragraph_path(source, target, &similarity);
        let paragraph_pairs: Vec<ParagraphPairAlignment> = paragraph_path
            .iter()
            .map(|node| self.paragraph_pair(node, source, target, &similarity))
            .collect();

        tracing::info!(
            source_paragraphs = source.len(),
            target_paragraphs = target.len(),
            paragraph_nodes = paragraph_path.len(),
            sentence_nodes = paragraph_pairs
                .iter()
                .map(|pair| pair.sentence_path.len())
                .sum::<usize>(),
            "documents aligned"
        );

        DocumentAlignment {
            paragraph_path,
            paragraph_pairs,
        }
    }

    pub fn align_paragraphs(&self, source: &[Paragraph], target: &[Paragraph]) -> AlignmentPath {
        let similarity = CachedSimilarity::new(self.similarity.as_ref());
        self.paragraph_path(source, target, &similarity)
    }

    /// Sentence alignment inside one paragraph node, over the concatenated
    /// sentences of every paragraph the node groups.
    pub fn align_paragraph_pair(
        &self,
        node: &AlignmentNode,
        source: &[Paragraph],
        target: &[Paragraph],
    ) -> ParagraphPairAlignment {
        let similarity = CachedSimilarity::new(self.similarity.as_ref());
        self.paragraph_pair(node, source, target, &similarity)
    }

    fn paragraph_path(
        &self,
        source: &[Paragraph],
        target: &[Paragraph],
        similarity: &dyn SimilarityProvider,
    ) -> AlignmentPath {
        self.aligner.align_paragraphs(
            source,
            target,
            similarity,
            self.paragraph_acceptable_similarity,
        )
    }

    fn paragraph_pair(
        &self,
        node: &AlignmentNode,
        source: &[Paragraph],
        target: &[Paragraph],
        similarity: &dyn SimilarityProvider,
    ) -> ParagraphPairAlignment {
        let source_sentences = merged_sentences(source, &node.source);
        let target_sentences = merged_sentences(target, &node.target);
        let sentence_path = self.aligner.align_sentences(
            &source_sentences,
            &target_sentences,
            similarity,
            self.sentence_params,
        );
        ParagraphPairAlignment {
            paragraph_node: node.clone(),
            source_sentences,
            target_sentences,
            sentence_path,
        }
    }
}

fn merged_sentences(paragraphs: &[Paragraph], indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .filter_map(|&idx| paragraphs.get(idx))
        .flat_map(|paragraph| paragraph.iter().cloned())
        .collect()
}
