use std::path::Path;

use crate::error::{AlignmentError, InputFile};
use crate::types::Paragraph;

/// Splits text into paragraphs: one sentence per line, paragraphs separated
/// by one or more blank lines. Lines are trimmed; blank input gives no
/// paragraphs.
pub fn paragraphs_from_text(text: &str) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut current: Paragraph = Vec::new();

    for line in text.lines() {
        let sentence = line.trim();
        if sentence.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(sentence.to_string());
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

pub fn read_paragraphs(path: &Path) -> Result<Vec<Paragraph>, AlignmentError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AlignmentError::read(InputFile::Document, path, e))?;
    let paragraphs = paragraphs_from_text(&text);
    tracing::debug!(
        path = %path.display(),
        paragraphs = paragraphs.len(),
        sentences = paragraphs.iter().map(Vec::len).sum::<usize>(),
        "document loaded"
    );
    Ok(paragraphs)
}
