use crate::types::Coordinate;

/// Score stored in every padded cell and returned for any lookup past the
/// matrix. It never falls inside an acceptance window and no computed
/// similarity can exceed it.
pub const PADDING_SCORE: f64 = 99_999.0;

/// Exclusive upper bound of a genuine similarity score.
pub const MAX_VALID_SCORE: f64 = 1.1;

/// Square similarity matrix of side `max(rows, cols) + 1`, row-major.
///
/// Cells with `source >= rows` or `target >= cols` hold [`PADDING_SCORE`],
/// so boundary lookups go through the same accessor as in-range ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    dim: usize,
    cells: Vec<f64>,
}

impl SimilarityMatrix {
    /// Builds the regularized matrix from a provider score table.
    ///
    /// Returns `None` when `scores` is not `rows` x `cols`. Non-finite
    /// scores are stored as 0.0.
    pub fn from_scores(scores: &[Vec<f64>], rows: usize, cols: usize) -> Option<Self> {
        if scores.len() != rows || scores.iter().any(|row| row.len() != cols) {
            tracing::warn!(
                expected_rows = rows,
                expected_cols = cols,
                actual_rows = scores.len(),
                "similarity provider returned a score table with an unexpected shape"
            );
            return None;
        }

        let dim = rows.max(cols) + 1;
        let mut cells = vec![PADDING_SCORE; dim * dim];
        let mut replaced = 0usize;
        for (i, row) in scores.iter().enumerate() {
            for (j, &score) in row.iter().enumerate() {
                cells[i * dim + j] = if score.is_finite() {
                    score
                } else {
                    replaced += 1;
                    0.0
                };
            }
        }
        if replaced > 0 {
            tracing::warn!(replaced, "non-finite similarity scores replaced by 0.0");
        }

        Some(Self {
            rows,
            cols,
            dim,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Side of the padded square.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Checked accessor: [`PADDING_SCORE`] for padded or out-of-range cells.
    #[inline]
    pub fn get(&self, at: Coordinate) -> f64 {
        if at.source >= self.dim || at.target >= self.dim {
            return PADDING_SCORE;
        }
        self.cells[at.source * self.dim + at.target]
    }

    /// True when `at` addresses a real (source, target) span pair.
    #[inline]
    pub fn contains(&self, at: Coordinate) -> bool {
        at.source < self.rows && at.target < self.cols
    }

    /// Score of a real span pair, `None` for padding.
    pub fn score(&self, at: Coordinate) -> Option<f64> {
        self.contains(at).then(|| self.get(at))
    }

    /// Whether `at` is a real cell whose score lies in `[threshold, MAX_VALID_SCORE)`.
    pub fn is_acceptable(&self, at: Coordinate, threshold: f64) -> bool {
        let score = self.get(at);
        self.contains(at) && score >= threshold && score < MAX_VALID_SCORE
    }

    /// Bottom-right real cell. `None` for an empty matrix.
    pub fn last(&self) -> Option<Coordinate> {
        (self.rows > 0 && self.cols > 0).then(|| Coordinate::new(self.rows - 1, self.cols - 1))
    }
}
