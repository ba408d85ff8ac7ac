use std::cmp::Ordering;

use super::compaction::compact_path;
use super::matrix::SimilarityMatrix;
use crate::types::{AlignmentPath, Coordinate};

/// Minimal steps: diagonal, down, right. Listing order is the tie-break.
const FIRST_VICINITY: [(usize, usize); 3] = [(1, 1), (1, 0), (0, 1)];
/// Skip steps, considered only when no minimal step clears the threshold.
const SECOND_VICINITY: [(usize, usize); 2] = [(2, 1), (1, 2)];

#[derive(Debug, Clone, Copy)]
struct Candidate {
    at: Coordinate,
    score: f64,
    first_vicinity: bool,
}

/// Greedy vicinity-bounded search over a paragraph similarity matrix.
///
/// Starts at (0, 0), repeatedly steps to the best vicinity candidate, and
/// falls back to [`resynchronize`] when none clears `acceptable_similarity`.
/// The bottom-right cell is kept only if it clears the threshold itself.
/// Visited cells are compacted into alignment nodes with [`compact_path`].
pub fn align_paragraph_matrix(matrix: &SimilarityMatrix, acceptable_similarity: f64) -> AlignmentPath {
    let Some(last) = matrix.last() else {
        return AlignmentPath::default();
    };

    let mut visited = vec![Coordinate::ORIGIN];
    let mut current = Coordinate::ORIGIN;
    while current != last {
        let (next, score) = next_alignment(matrix, current, acceptable_similarity);
        if next == last && score < acceptable_similarity {
            tracing::debug!(
                source = next.source,
                target = next.target,
                score = format!("{score:.3}"),
                "paragraph search: terminal cell below threshold, not aligned"
            );
        } else {
            visited.push(next);
        }
        current = next;
    }

    compact_path(&visited)
}

fn next_alignment(
    matrix: &SimilarityMatrix,
    current: Coordinate,
    acceptable_similarity: f64,
) -> (Coordinate, f64) {
    let mut candidates: Vec<Candidate> = FIRST_VICINITY
        .iter()
        .map(|&step| (step, true))
        .chain(SECOND_VICINITY.iter().map(|&step| (step, false)))
        .filter_map(|((di, dj), first_vicinity)| {
            let at = current.offset(di, dj);
            matrix.score(at).map(|score| Candidate {
                at,
                score,
                first_vicinity,
            })
        })
        .collect();
    // Stable: equal scores keep vicinity order.
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let best_first = candidates
        .iter()
        .filter(|candidate| candidate.first_vicinity)
        .map(|candidate| candidate.score)
        .fold(f64::NEG_INFINITY, f64::max);

    let winner = if best_first >= acceptable_similarity {
        candidates.iter().find(|candidate| candidate.first_vicinity)
    } else {
        candidates
            .first()
            .filter(|candidate| candidate.score >= acceptable_similarity)
    };

    if let Some(winner) = winner {
        tracing::debug!(
            from_source = current.source,
            from_target = current.target,
            source = winner.at.source,
            target = winner.at.target,
            score = format!("{:.3}", winner.score),
            skip = !winner.first_vicinity,
            "paragraph search: vicinity step"
        );
        return (winner.at, winner.score);
    }

    let next = resynchronize(matrix, current, acceptable_similarity);
    tracing::debug!(
        from_source = current.source,
        from_target = current.target,
        source = next.source,
        target = next.target,
        "paragraph search: resynchronized"
    );
    (next, matrix.get(next))
}

/// Closest acceptable cell strictly ahead of `current` on both axes.
///
/// Ties on Manhattan distance go to the first cell in row-major order.
/// Falls back to the bottom-right cell when nothing ahead qualifies.
fn resynchronize(
    matrix: &SimilarityMatrix,
    current: Coordinate,
    acceptable_similarity: f64,
) -> Coordinate {
    let mut best: Option<(usize, Coordinate)> = None;
    for source in current.source + 1..matrix.rows() {
        for target in current.target + 1..matrix.cols() {
            let at = Coordinate::new(source, target);
            if !matrix.is_acceptable(at, acceptable_similarity) {
                continue;
            }
            let distance = current.manhattan_distance(at);
            if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                best = Some((distance, at));
            }
        }
    }

    best.map(|(_, at)| at)
        .unwrap_or_else(|| matrix.last().unwrap_or(current))
}
