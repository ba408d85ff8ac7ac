use crate::alignment::matrix::SimilarityMatrix;
use crate::similarity::{sanitize, SimilarityProvider};
use crate::types::{AlignmentNode, AlignmentPath, Coordinate};

mod extension;
mod hypothesis;
pub(crate) mod starting_point;
#[cfg(test)]
mod tests;

use extension::{Axis, Extension};
use hypothesis::Move;
use starting_point::find_starting_point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceSearchParams {
    pub acceptable_similarity: f64,
    /// Maximum score regression tolerated while a group keeps growing.
    pub similarity_slack: f64,
}

impl Default for SentenceSearchParams {
    fn default() -> Self {
        Self {
            acceptable_similarity: 0.2,
            similarity_slack: 0.05,
        }
    }
}

/// Ordered indices of one side of a node plus their space-joined text.
#[derive(Debug, Clone)]
struct SpanBuffer {
    indices: Vec<usize>,
    text: String,
}

impl SpanBuffer {
    fn start(spans: &[String], idx: usize) -> Self {
        Self {
            indices: vec![idx],
            text: spans[idx].clone(),
        }
    }

    fn joined_with(&self, spans: &[String], idx: usize) -> String {
        format!("{} {}", self.text, spans[idx])
    }

    fn absorb(&mut self, spans: &[String], idx: usize) {
        self.text.push(' ');
        self.text.push_str(&spans[idx]);
        self.indices.push(idx);
    }
}

/// Search position with the node currently being accumulated there.
#[derive(Debug, Clone)]
struct Cursor {
    at: Coordinate,
    source: SpanBuffer,
    target: SpanBuffer,
}

impl Cursor {
    fn into_node(self) -> AlignmentNode {
        AlignmentNode::new(self.source.indices, self.target.indices)
    }
}

struct SentenceSearch<'a> {
    matrix: &'a SimilarityMatrix,
    source: &'a [String],
    target: &'a [String],
    similarity: &'a dyn SimilarityProvider,
    params: SentenceSearchParams,
}

/// Aligns the sentences of one paragraph pair.
///
/// `matrix` must be built over exactly `source` x `target`; anything else, or
/// an empty side, yields an empty path. Nodes are emitted in order and never
/// share a sentence index.
pub fn align_sentence_matrix(
    matrix: &SimilarityMatrix,
    source: &[String],
    target: &[String],
    similarity: &dyn SimilarityProvider,
    params: SentenceSearchParams,
) -> AlignmentPath {
    if source.is_empty()
        || target.is_empty()
        || matrix.rows() != source.len()
        || matrix.cols() != target.len()
    {
        return AlignmentPath::default();
    }

    SentenceSearch {
        matrix,
        source,
        target,
        similarity,
        params,
    }
    .run()
}

impl<'a> SentenceSearch<'a> {
    fn run(&self) -> AlignmentPath {
        let mut nodes = Vec::new();
        let Some(last) = self.matrix.last() else {
            return AlignmentPath::default();
        };
        let Some(start) = self.starting_point(Coordinate::ORIGIN) else {
            return AlignmentPath::default();
        };

        let mut cursor = self.cursor_at(start);
        loop {
            if cursor.at.source >= last.source || cursor.at.target >= last.target {
                self.finalize(cursor, &mut nodes);
                break;
            }
            match self.step(cursor, &mut nodes) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        AlignmentPath::new(nodes)
    }

    /// One decision from an interior cell. Returns the next cursor, or `None`
    /// when nothing further can be aligned.
    fn step(&self, cursor: Cursor, nodes: &mut Vec<AlignmentNode>) -> Option<Cursor> {
        let at = cursor.at;
        match hypothesis::best_next(self, &cursor) {
            Move::Diagonal { score } => {
                tracing::debug!(
                    source = at.source + 1,
                    target = at.target + 1,
                    score = format!("{score:.3}"),
                    "sentence search: diagonal step"
                );
                nodes.push(cursor.into_node());
                Some(self.cursor_at(at.offset(1, 1)))
            }
            Move::Down { score } => {
                tracing::debug!(
                    source = at.source + 1,
                    target = at.target,
                    score = format!("{score:.3}"),
                    "sentence search: downward step"
                );
                let mut cursor = cursor;
                let extension = extension::extend(self, &mut cursor, Axis::Source, score);
                nodes.push(cursor.into_node());
                self.resume_after(extension, Coordinate::new(extension.last + 1, at.target + 1))
            }
            Move::Right { score } => {
                tracing::debug!(
                    source = at.source,
                    target = at.target + 1,
                    score = format!("{score:.3}"),
                    "sentence search: rightward step"
                );
                let mut cursor = cursor;
                let extension = extension::extend(self, &mut cursor, Axis::Target, score);
                nodes.push(cursor.into_node());
                self.resume_after(extension, Coordinate::new(at.source + 1, extension.last + 1))
            }
            Move::Jump(next) => {
                tracing::debug!(
                    source = next.source,
                    target = next.target,
                    "sentence search: resynchronized"
                );
                nodes.push(cursor.into_node());
                Some(self.cursor_at(next))
            }
            Move::Exhausted => {
                nodes.push(cursor.into_node());
                None
            }
        }
    }

    fn resume_after(&self, extension: Extension, floor: Coordinate) -> Option<Cursor> {
        if extension.reached_boundary {
            return None;
        }
        self.starting_point(floor).map(|at| self.cursor_at(at))
    }

    /// Emits the last node once either axis is exhausted, growing it along the
    /// axis that still has sentences while the score does not drop by more
    /// than the slack.
    fn finalize(&self, mut cursor: Cursor, nodes: &mut Vec<AlignmentNode>) {
        let acceptable = self.params.acceptable_similarity;
        let slack = self.params.similarity_slack;
        let mut score = self.buffer_similarity(&cursor.source.text, &cursor.target.text);
        if score <= acceptable {
            tracing::debug!(
                source = cursor.at.source,
                target = cursor.at.target,
                score = format!("{score:.3}"),
                "sentence search: final node below threshold, dropped"
            );
            return;
        }

        if cursor.at.source + 1 == self.source.len() {
            for next in cursor.at.target + 1..self.target.len() {
                let candidate = self.buffer_similarity(
                    &cursor.source.text,
                    &cursor.target.joined_with(self.target, next),
                );
                if candidate < score - slack {
                    break;
                }
                cursor.target.absorb(self.target, next);
                score = candidate;
            }
        } else {
            for next in cursor.at.source + 1..self.source.len() {
                let candidate = self.buffer_similarity(
                    &cursor.source.joined_with(self.source, next),
                    &cursor.target.text,
                );
                if candidate < score - slack {
                    break;
                }
                cursor.source.absorb(self.source, next);
                score = candidate;
            }
        }

        tracing::debug!(
            source_count = cursor.source.indices.len(),
            target_count = cursor.target.indices.len(),
            score = format!("{score:.3}"),
            "sentence search: final node"
        );
        nodes.push(cursor.into_node());
    }

    fn starting_point(&self, floor: Coordinate) -> Option<Coordinate> {
        find_starting_point(self.matrix, floor, self.params.acceptable_similarity)
    }

    fn cursor_at(&self, at: Coordinate) -> Cursor {
        Cursor {
            at,
            source: SpanBuffer::start(self.source, at.source),
            target: SpanBuffer::start(self.target, at.target),
        }
    }

    fn buffer_similarity(&self, a: &str, b: &str) -> f64 {
        sanitize(self.similarity.text_similarity(a, b))
    }
}
