use crate::alignment::matrix::SimilarityMatrix;
use crate::types::Coordinate;

/// Diagonal-outward sweep for the next acceptable cell at or beyond `floor`.
///
/// Cells are visited shell by shell in increasing `source + target`; within a
/// shell from the largest source index down to the smallest. The first real
/// cell with `source >= floor.source`, `target >= floor.target` and a score in
/// `[acceptable_similarity, MAX_VALID_SCORE)` wins. `None` once the
/// bottom-right cell has been passed: no further alignment is possible.
pub(crate) fn find_starting_point(
    matrix: &SimilarityMatrix,
    floor: Coordinate,
    acceptable_similarity: f64,
) -> Option<Coordinate> {
    let last = matrix.last()?;
    if floor.source > last.source || floor.target > last.target {
        return None;
    }

    let first_shell = floor.source + floor.target;
    let final_shell = last.source + last.target;
    for distance in first_shell..=final_shell {
        let highest_source = (distance - floor.target).min(last.source);
        for source in (floor.source..=highest_source).rev() {
            let target = distance - source;
            if target > last.target {
                break;
            }
            let at = Coordinate::new(source, target);
            if matrix.is_acceptable(at, acceptable_similarity) {
                tracing::debug!(
                    floor_source = floor.source,
                    floor_target = floor.target,
                    source,
                    target,
                    "sentence search: starting point found"
                );
                return Some(at);
            }
        }
    }

    tracing::debug!(
        floor_source = floor.source,
        floor_target = floor.target,
        "sentence search: no starting point left"
    );
    None
}
