use super::{Cursor, SentenceSearch};
use crate::types::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Axis {
    Source,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Extension {
    /// Last index absorbed on the extended axis.
    pub(super) last: usize,
    /// The extended axis has no sentence left after `last`.
    pub(super) reached_boundary: bool,
}

/// Grows a 1-N or N-1 group along `axis`.
///
/// The first sentence after the cursor is absorbed unconditionally (the move
/// was already chosen with `first_score`). Each further sentence is absorbed
/// while the regrown buffer both beats the diagonal cell it would otherwise
/// align with and stays within the slack of the previous score.
pub(super) fn extend(
    search: &SentenceSearch<'_>,
    cursor: &mut Cursor,
    axis: Axis,
    first_score: f64,
) -> Extension {
    let at = cursor.at;
    let slack = search.params.similarity_slack;
    let (spans, mut last) = match axis {
        Axis::Source => (search.source, at.source + 1),
        Axis::Target => (search.target, at.target + 1),
    };
    match axis {
        Axis::Source => cursor.source.absorb(spans, last),
        Axis::Target => cursor.target.absorb(spans, last),
    }

    let mut score = first_score;
    loop {
        let next = last + 1;
        if next >= spans.len() {
            tracing::debug!(last, ?axis, "sentence extension: reached boundary");
            return Extension {
                last,
                reached_boundary: true,
            };
        }

        let (candidate, diagonal) = match axis {
            Axis::Source => (
                search.buffer_similarity(
                    &cursor.source.joined_with(spans, next),
                    &cursor.target.text,
                ),
                search.matrix.get(Coordinate::new(next, at.target + 1)),
            ),
            Axis::Target => (
                search.buffer_similarity(
                    &cursor.source.text,
                    &cursor.target.joined_with(spans, next),
                ),
                search.matrix.get(Coordinate::new(at.source + 1, next)),
            ),
        };

        if candidate <= score - slack {
            tracing::debug!(
                next,
                ?axis,
                previous = format!("{score:.3}"),
                candidate = format!("{candidate:.3}"),
                "sentence extension: stopped on regression"
            );
            break;
        }
        if candidate <= diagonal {
            tracing::debug!(
                next,
                ?axis,
                candidate = format!("{candidate:.3}"),
                diagonal = format!("{diagonal:.3}"),
                "sentence extension: stopped, diagonal alignment is stronger"
            );
            break;
        }

        match axis {
            Axis::Source => cursor.source.absorb(spans, next),
            Axis::Target => cursor.target.absorb(spans, next),
        }
        tracing::debug!(
            next,
            ?axis,
            previous = format!("{score:.3}"),
            candidate = format!("{candidate:.3}"),
            "sentence extension: absorbed"
        );
        score = candidate;
        last = next;
    }

    Extension {
        last,
        reached_boundary: false,
    }
}
