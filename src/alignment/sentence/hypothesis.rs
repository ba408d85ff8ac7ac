use super::{Cursor, SentenceSearch};
use crate::types::Coordinate;

/// Outcome of the local three-way decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Move {
    Diagonal { score: f64 },
    /// Grow the source buffer by the next source sentence (N-1).
    Down { score: f64 },
    /// Grow the target buffer by the next target sentence (1-N).
    Right { score: f64 },
    /// Nothing local cleared the threshold; continue from a later cell.
    Jump(Coordinate),
    Exhausted,
}

/// Scores the diagonal cell against the recomputed down/right buffers.
///
/// Down and right count as 0.0 unless they beat the current buffers' score
/// minus the slack. Equal scores prefer diagonal, then down, then right.
/// The cursor must sit strictly inside the matrix on both axes.
pub(super) fn best_next(search: &SentenceSearch<'_>, cursor: &Cursor) -> Move {
    let at = cursor.at;
    let params = search.params;
    let diagonal_at = at.offset(1, 1);

    let diagonal = search.matrix.get(diagonal_at);
    let regression_floor = search.buffer_similarity(&cursor.source.text, &cursor.target.text)
        - params.similarity_slack;

    let down = search.buffer_similarity(
        &cursor.source.joined_with(search.source, at.source + 1),
        &cursor.target.text,
    );
    let down = if down > regression_floor { down } else { 0.0 };

    let right = search.buffer_similarity(
        &cursor.source.text,
        &cursor.target.joined_with(search.target, at.target + 1),
    );
    let right = if right > regression_floor { right } else { 0.0 };

    tracing::debug!(
        source = at.source,
        target = at.target,
        diagonal = format!("{diagonal:.3}"),
        down = format!("{down:.3}"),
        right = format!("{right:.3}"),
        "sentence search: hypotheses"
    );

    let mut best = Move::Diagonal { score: diagonal };
    let mut best_score = diagonal;
    if down > best_score {
        best = Move::Down { score: down };
        best_score = down;
    }
    if right > best_score {
        best = Move::Right { score: right };
        best_score = right;
    }

    if best_score >= params.acceptable_similarity {
        return best;
    }

    match search.starting_point(diagonal_at) {
        Some(next) => Move::Jump(next),
        None => Move::Exhausted,
    }
}
