use std::path::Path;

use serde::Deserialize;

use crate::error::{AlignmentError, InputFile};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    /// Minimum paragraph-pair score accepted by the paragraph aligner.
    pub paragraph_acceptable_similarity: f64,
    /// Minimum sentence-buffer score accepted by the sentence aligner.
    pub sentence_acceptable_similarity: f64,
    /// How far a growing multi-sentence group may regress before extension stops.
    pub similarity_slack: f64,
    /// One stop word per line. `None` keeps every token.
    pub stop_words_path: Option<String>,
    /// Documents the default TF-IDF model is trained on, one sentence per line.
    pub training_documents: Vec<String>,
}

impl AlignerConfig {
    pub const DEFAULT_PARAGRAPH_SIMILARITY: f64 = 0.3;
    pub const DEFAULT_SENTENCE_SIMILARITY: f64 = 0.2;
    pub const DEFAULT_SIMILARITY_SLACK: f64 = 0.05;

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::read(InputFile::Config, path, e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| AlignmentError::config_parse(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        check_unit_interval(
            "paragraph_acceptable_similarity",
            self.paragraph_acceptable_similarity,
        )?;
        check_unit_interval(
            "sentence_acceptable_similarity",
            self.sentence_acceptable_similarity,
        )?;
        if !self.similarity_slack.is_finite() || self.similarity_slack < 0.0 {
            return Err(AlignmentError::InvalidConfig {
                field: "similarity_slack",
                requirement: "must be finite and non-negative",
                value: self.similarity_slack,
            });
        }
        Ok(())
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            paragraph_acceptable_similarity: Self::DEFAULT_PARAGRAPH_SIMILARITY,
            sentence_acceptable_similarity: Self::DEFAULT_SENTENCE_SIMILARITY,
            similarity_slack: Self::DEFAULT_SIMILARITY_SLACK,
            stop_words_path: None,
            training_documents: Vec::new(),
        }
    }
}

fn check_unit_interval(field: &'static str, value: f64) -> Result<(), AlignmentError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(AlignmentError::InvalidConfig {
        field,
        requirement: "must lie in [0, 1]",
        value,
    })
}
