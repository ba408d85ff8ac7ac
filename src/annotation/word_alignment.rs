use serde::Serialize;

use crate::error::AlignmentError;

/// Link between a source token and a target token, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WordLink {
    pub source: usize,
    pub target: usize,
}

impl WordLink {
    pub const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

/// Parses Pharaoh-style `source-target` pairs separated by whitespace, e.g.
/// `"1-1 2-3 3-2"`. Positions are 1-based; blank input has no links.
pub fn parse_word_alignments(text: &str) -> Result<Vec<WordLink>, AlignmentError> {
    text.split_whitespace().map(parse_link).collect()
}

fn parse_link(pair: &str) -> Result<WordLink, AlignmentError> {
    let (source, target) = pair
        .split_once('-')
        .ok_or_else(|| AlignmentError::word_alignment(pair, "expected 'source-target'"))?;
    Ok(WordLink::new(
        parse_position(pair, source)?,
        parse_position(pair, target)?,
    ))
}

fn parse_position(pair: &str, raw: &str) -> Result<usize, AlignmentError> {
    match raw.parse::<usize>() {
        Ok(0) => Err(AlignmentError::word_alignment(pair, "positions start at 1")),
        Ok(position) => Ok(position),
        Err(err) => Err(AlignmentError::word_alignment(pair, err.to_string())),
    }
}
