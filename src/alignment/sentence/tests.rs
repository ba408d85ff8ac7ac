use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{align_sentence_matrix, SentenceSearchParams};
use crate::alignment::matrix::SimilarityMatrix;
use crate::similarity::testing::TableSimilarity;
use crate::similarity::SimilarityProvider;
use crate::types::{AlignmentNode, AlignmentPath};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn params(acceptable_similarity: f64) -> SentenceSearchParams {
    SentenceSearchParams {
        acceptable_similarity,
        similarity_slack: 0.05,
    }
}

fn align(
    source: &[&str],
    target: &[&str],
    provider: &dyn SimilarityProvider,
    acceptable_similarity: f64,
) -> AlignmentPath {
    let source = strings(source);
    let target = strings(target);
    let scores = provider.sentence_scores(&source, &target);
    let matrix = SimilarityMatrix::from_scores(&scores, source.len(), target.len())
        .expect("provider returns a full table");
    align_sentence_matrix(&matrix, &source, &target, provider, params(acceptable_similarity))
}

fn node(source: &[usize], target: &[usize]) -> AlignmentNode {
    AlignmentNode::new(source.to_vec(), target.to_vec())
}

fn assert_monotonic(path: &AlignmentPath) {
    for current in path.iter() {
        assert!(!current.source.is_empty() && !current.target.is_empty());
        assert!(current.source.windows(2).all(|w| w[0] < w[1]));
        assert!(current.target.windows(2).all(|w| w[0] < w[1]));
    }
    for pair in path.nodes.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.source.iter().max() < b.source.iter().min(), "{a:?} -> {b:?}");
        assert!(a.target.iter().max() < b.target.iter().min(), "{a:?} -> {b:?}");
    }
}

#[test]
fn identical_lists_align_one_to_one() {
    let path = align(&["a", "b", "c"], &["a", "b", "c"], &TableSimilarity::default(), 0.3);
    assert_eq!(path.nodes, vec![node(&[0], &[0]), node(&[1], &[1]), node(&[2], &[2])]);
}

#[test]
fn split_sentence_becomes_one_to_many() {
    let provider = TableSimilarity::default()
        .with("a b", "a", 0.4)
        .with("a b", "b", 0.4)
        .with("a b", "a b", 0.6);
    let path = align(&["a b", "c"], &["a", "b", "c"], &provider, 0.3);
    assert_eq!(path.nodes, vec![node(&[0], &[0, 1]), node(&[1], &[2])]);
}

#[test]
fn merged_sentences_become_many_to_one() {
    let provider = TableSimilarity::default()
        .with("a", "a b", 0.4)
        .with("b", "a b", 0.4);
    let path = align(&["a", "b", "c"], &["a b", "c"], &provider, 0.2);
    assert_eq!(path.nodes, vec![node(&[0, 1], &[0]), node(&[2], &[1])]);
}

/// Pairwise table that disagrees with the buffer scores of `text`.
struct SkewedTable {
    text: TableSimilarity,
    cells: Vec<Vec<f64>>,
}

impl SimilarityProvider for SkewedTable {
    fn text_similarity(&self, a: &str, b: &str) -> f64 {
        self.text.text_similarity(a, b)
    }

    fn sentence_scores(&self, _source: &[String], _target: &[String]) -> Vec<Vec<f64>> {
        self.cells.clone()
    }
}

#[test]
fn regression_floor_comes_from_buffer_scores() {
    // The table claims 0.9 for ("a b", "a"), but the buffers only score 0.4,
    // so growing the target to "a b" at 0.6 is not a regression.
    let provider = SkewedTable {
        text: TableSimilarity::default()
            .with("a b", "a", 0.4)
            .with("a b", "a b", 0.6),
        cells: vec![vec![0.9, 0.1, 0.0], vec![0.0, 0.0, 1.0]],
    };
    let path = align(&["a b", "c"], &["a", "b", "c"], &provider, 0.3);
    assert_eq!(path.nodes, vec![node(&[0], &[0, 1]), node(&[1], &[2])]);
}

#[test]
fn extension_absorbs_while_score_improves() {
    let provider = TableSimilarity::default()
        .with("p", "p1", 0.5)
        .with("p", "p1 p2", 0.6)
        .with("p", "p1 p2 p3", 0.7);
    let path = align(&["p", "q"], &["p1", "p2", "p3", "q"], &provider, 0.2);
    assert_eq!(path.nodes, vec![node(&[0], &[0, 1, 2]), node(&[1], &[3])]);
}

#[test]
fn extension_stops_when_diagonal_is_stronger() {
    let provider = TableSimilarity::default()
        .with("p", "p1", 0.5)
        .with("p", "p1 p2", 0.6)
        .with("p", "p1 p2 q", 0.65);
    let path = align(&["p", "q"], &["p1", "p2", "q"], &provider, 0.2);
    assert_eq!(path.nodes, vec![node(&[0], &[0, 1]), node(&[1], &[2])]);
}

#[test]
fn unmatched_pair_is_skipped_by_resynchronization() {
    let path = align(
        &["a", "noise", "c"],
        &["a", "junk", "c"],
        &TableSimilarity::default(),
        0.2,
    );
    assert_eq!(path.nodes, vec![node(&[0], &[0]), node(&[2], &[2])]);
}

#[test]
fn leading_unmatched_sentences_are_not_aligned() {
    let path = align(&["intro", "a", "b"], &["a", "b"], &TableSimilarity::default(), 0.2);
    assert_eq!(path.nodes, vec![node(&[1], &[0]), node(&[2], &[1])]);
}

#[test]
fn final_node_extends_along_remaining_axis() {
    let provider = TableSimilarity::default().with("b", "b b2", 0.96);
    let path = align(&["a", "b"], &["a", "b", "b2"], &provider, 0.2);
    assert_eq!(path.nodes, vec![node(&[0], &[0]), node(&[1], &[1, 2])]);
}

#[test]
fn final_extension_respects_slack() {
    let provider = TableSimilarity::default().with("b", "b b2", 0.5);
    let path = align(&["a", "b"], &["a", "b", "b2"], &provider, 0.2);
    assert_eq!(path.nodes, vec![node(&[0], &[0]), node(&[1], &[1])]);
}

#[test]
fn final_node_at_threshold_is_dropped() {
    let provider = TableSimilarity::default().with("b", "b", 0.2);
    let path = align(&["a", "b"], &["a", "b"], &provider, 0.2);
    assert_eq!(path.nodes, vec![node(&[0], &[0])]);
}

#[test]
fn exhausted_resynchronization_keeps_current_node() {
    let path = align(&["a", "x"], &["a", "y"], &TableSimilarity::default(), 0.2);
    assert_eq!(path.nodes, vec![node(&[0], &[0])]);
}

#[test]
fn empty_lists_give_empty_path() {
    let path = align(&[], &[], &TableSimilarity::default(), 0.2);
    assert!(path.is_empty());
}

#[test]
fn single_pair_below_threshold_gives_empty_path() {
    let path = align(&["a"], &["b"], &TableSimilarity::default(), 0.2);
    assert!(path.is_empty());
}

#[test]
fn single_pair_above_threshold_is_aligned() {
    let path = align(&["a"], &["a"], &TableSimilarity::default(), 0.2);
    assert_eq!(path.nodes, vec![node(&[0], &[0])]);
}

#[test]
fn mismatched_matrix_gives_empty_path() {
    let source = strings(&["a", "b"]);
    let target = strings(&["a", "b"]);
    let matrix = SimilarityMatrix::from_scores(&[vec![1.0]], 1, 1).expect("1 x 1 table");
    let path = align_sentence_matrix(
        &matrix,
        &source,
        &target,
        &TableSimilarity::default(),
        params(0.2),
    );
    assert!(path.is_empty());
}

struct UndefinedSimilarity;

impl SimilarityProvider for UndefinedSimilarity {
    fn text_similarity(&self, _a: &str, _b: &str) -> f64 {
        f64::NAN
    }
}

#[test]
fn undefined_scores_never_align() {
    let path = align(&["a", "b"], &["a", "b"], &UndefinedSimilarity, 0.2);
    assert!(path.is_empty());
}

/// Deterministic pseudo-random scores keyed on the text pair.
struct HashedSimilarity;

impl SimilarityProvider for HashedSimilarity {
    fn text_similarity(&self, a: &str, b: &str) -> f64 {
        let mut hasher = DefaultHasher::new();
        (a, b).hash(&mut hasher);
        (hasher.finish() % 1000) as f64 / 1000.0
    }
}

fn joined(spans: &[&str], indices: &[usize]) -> String {
    indices.iter().map(|&i| spans[i]).collect::<Vec<_>>().join(" ")
}

/// Every node starts on a cell that clears the threshold, and its grouped
/// buffers lose at most the slack for each sentence absorbed after the first.
fn assert_respects_threshold(
    path: &AlignmentPath,
    source: &[&str],
    target: &[&str],
    provider: &dyn SimilarityProvider,
    acceptable_similarity: f64,
) {
    let slack = params(acceptable_similarity).similarity_slack;
    for current in path.iter() {
        let seed = provider.text_similarity(source[current.source[0]], target[current.target[0]]);
        assert!(seed >= acceptable_similarity, "{current:?} seed {seed}");

        let score = provider.text_similarity(
            &joined(source, &current.source),
            &joined(target, &current.target),
        );
        let absorbed = current.source.len() + current.target.len() - 2;
        let floor = acceptable_similarity - slack * absorbed as f64 - 1e-9;
        assert!(score >= floor, "{current:?} scored {score}, floor {floor}");
    }
}

#[test]
fn emitted_nodes_respect_threshold() {
    for (rows, cols) in [(3, 3), (5, 8), (9, 4), (12, 12)] {
        let source: Vec<String> = (0..rows).map(|i| format!("s{i}")).collect();
        let target: Vec<String> = (0..cols).map(|j| format!("t{j}")).collect();
        let source: Vec<&str> = source.iter().map(String::as_str).collect();
        let target: Vec<&str> = target.iter().map(String::as_str).collect();
        for threshold in [0.2, 0.4, 0.7] {
            let path = align(&source, &target, &HashedSimilarity, threshold);
            assert_respects_threshold(&path, &source, &target, &HashedSimilarity, threshold);
        }
    }
}

#[test]
fn hashed_scores_produce_monotonic_paths() {
    for (rows, cols) in [(1, 5), (4, 4), (6, 3), (7, 9), (12, 10)] {
        let source: Vec<String> = (0..rows).map(|i| format!("s{i}")).collect();
        let target: Vec<String> = (0..cols).map(|j| format!("t{j}")).collect();
        let source: Vec<&str> = source.iter().map(String::as_str).collect();
        let target: Vec<&str> = target.iter().map(String::as_str).collect();
        for threshold in [0.1, 0.3, 0.6] {
            let path = align(&source, &target, &HashedSimilarity, threshold);
            assert_monotonic(&path);
            let again = align(&source, &target, &HashedSimilarity, threshold);
            assert_eq!(path, again);
        }
    }
}
