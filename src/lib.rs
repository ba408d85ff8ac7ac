pub mod alignment;
pub mod annotation;
pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod similarity;
pub mod types;

pub use alignment::report::{
    aggregate_reports, compute_pair_report, AggregateReport, Meta, PairReport, Report,
};
pub use alignment::sentence::SentenceSearchParams;
pub use annotation::{
    annotate_sentence_pair, annotate_tokens, parse_word_alignments, to_conll, EditLabel,
    SentenceAnnotation, TokenAnnotation, WordLink,
};
pub use config::AlignerConfig;
pub use document::{paragraphs_from_text, read_paragraphs};
pub use error::{AlignmentError, InputFile};
pub use pipeline::builder::DocumentAlignerBuilder;
pub use pipeline::defaults::VicinityAligner;
pub use pipeline::runtime::DocumentAligner;
pub use pipeline::traits::Aligner;
pub use similarity::{load_stop_words, CachedSimilarity, SimilarityProvider, TfIdfModel};
pub use types::{
    AlignedParagraphs, AlignedSentences, AlignmentNode, AlignmentPath, Coordinate,
    DocumentAlignment, NodeShape, Paragraph, ParagraphPairAlignment,
};
