use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Kind of input file behind a read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFile {
    Document,
    Config,
    StopWords,
    TrainingDocument,
}

impl fmt::Display for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Document => "document",
            Self::Config => "aligner config",
            Self::StopWords => "stop word list",
            Self::TrainingDocument => "training document",
        })
    }
}

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("failed to read {kind} '{}': {source}", .path.display())]
    Read {
        kind: InputFile,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse aligner config '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid aligner config: {field} {requirement}, got {value}")]
    InvalidConfig {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("no similarity provider given and no training documents configured")]
    MissingTrainingCorpus,
    #[error("training corpus of {sentences} sentence(s) has no usable terms")]
    EmptyTrainingCorpus { sentences: usize },
    #[error("malformed word alignment '{link}': {reason}")]
    WordAlignment { link: String, reason: String },
    #[error("report metric '{metric}' is not finite: {value}")]
    NonFiniteMetric { metric: String, value: f64 },
}

impl AlignmentError {
    pub(crate) fn read(kind: InputFile, path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            kind,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn config_parse(path: &Path, source: serde_json::Error) -> Self {
        Self::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn word_alignment(link: &str, reason: impl Into<String>) -> Self {
        Self::WordAlignment {
            link: link.to_string(),
            reason: reason.into(),
        }
    }
}
