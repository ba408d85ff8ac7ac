use std::path::Path;

use crate::alignment::sentence::SentenceSearchParams;
use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::pipeline::defaults::VicinityAligner;
use crate::pipeline::runtime::{DocumentAligner, DocumentAlignerParts};
use crate::pipeline::traits::Aligner;
use crate::similarity::{SimilarityProvider, TfIdfModel};

pub struct DocumentAlignerBuilder {
    config: AlignerConfig,
    similarity: Option<Box<dyn SimilarityProvider>>,
    aligner: Option<Box<dyn Aligner>>,
}

impl DocumentAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            similarity: None,
            aligner: None,
        }
    }

    pub fn with_similarity_provider(mut self, similarity: Box<dyn SimilarityProvider>) -> Self {
        self.similarity = Some(similarity);
        self
    }

    pub fn with_aligner(mut self, aligner: Box<dyn Aligner>) -> Self {
        self.aligner = Some(aligner);
        self
    }

    /// Validates the configuration and, unless a provider was supplied, trains
    /// a TF-IDF model on `training_documents`.
    pub fn build(self) -> Result<DocumentAligner, AlignmentError> {
        self.config.validate()?;

        let similarity = match self.similarity {
            Some(similarity) => similarity,
            None => Box::new(train_default_model(&self.config)?),
        };

        Ok(DocumentAligner::from_parts(DocumentAlignerParts {
            similarity,
            aligner: self.aligner.unwrap_or_else(|| Box::new(VicinityAligner)),
            paragraph_acceptable_similarity: self.config.paragraph_acceptable_similarity,
            sentence_params: SentenceSearchParams {
                acceptable_similarity: self.config.sentence_acceptable_similarity,
                similarity_slack: self.config.similarity_slack,
            },
        }))
    }
}

fn train_default_model(config: &AlignerConfig) -> Result<TfIdfModel, AlignmentError> {
    if config.training_documents.is_empty() {
        return Err(AlignmentError::MissingTrainingCorpus);
    }
    let model = TfIdfModel::from_files(
        config.training_documents.as_slice(),
        config.stop_words_path.as_deref().map(Path::new),
    )?;
    if model.vocabulary_size() == 0 {
        return Err(AlignmentError::EmptyTrainingCorpus {
            sentences: model.document_count(),
        });
    }
    Ok(model)
}
