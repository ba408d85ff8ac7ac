use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::error::AlignmentError;
use crate::types::{AlignmentPath, NodeShape};

const OUTLIER_TOP_N: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub paragraphs: PairReport,
    pub sentences: Vec<PairReport>,
    pub aggregates: AggregateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub source_path: String,
    pub target_path: String,
    pub paragraph_acceptable_similarity: f64,
    pub sentence_acceptable_similarity: f64,
    pub similarity_slack: f64,
    pub paragraph_pair_count: usize,
}

/// Summary of one alignment path over `source_count` x `target_count` spans.
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub id: String,
    pub source_count: u32,
    pub target_count: u32,
    pub node_count: u32,
    pub shapes: ShapeCounts,
    pub coverage: CoverageMetrics,
    pub structural: StructuralMetrics,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShapeCounts {
    pub one_to_one: u32,
    pub one_to_many: u32,
    pub many_to_one: u32,
    pub many_to_many: u32,
}

impl ShapeCounts {
    fn record(&mut self, shape: NodeShape) {
        match shape {
            NodeShape::OneToOne => self.one_to_one += 1,
            NodeShape::OneToMany => self.one_to_many += 1,
            NodeShape::ManyToOne => self.many_to_one += 1,
            NodeShape::ManyToMany => self.many_to_many += 1,
        }
    }

    fn add(&mut self, other: &ShapeCounts) {
        self.one_to_one += other.one_to_one;
        self.one_to_many += other.one_to_many;
        self.many_to_one += other.many_to_one;
        self.many_to_many += other.many_to_many;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageMetrics {
    pub aligned_source: u32,
    pub aligned_target: u32,
    pub unaligned_source: u32,
    pub unaligned_target: u32,
    pub source_ratio: f32,
    pub target_ratio: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuralMetrics {
    pub monotonicity_violations: u32,
    pub duplicated_source_indices: u32,
    pub duplicated_target_indices: u32,
    pub out_of_range_indices: u32,
}

impl StructuralMetrics {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub counts: AggregateCounts,
    pub shapes: ShapeCounts,
    pub source_ratio: Option<MetricDistribution>,
    pub target_ratio: Option<MetricDistribution>,
    pub node_count: Option<MetricDistribution>,
    pub outliers: Vec<OutlierEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateCounts {
    pub total: u32,
    pub empty_paths: u32,
    pub with_structural_issues: u32,
    pub nodes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricDistribution {
    pub mean: f32,
    pub min: f32,
    pub p50: f32,
    pub p90: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlierEntry {
    pub id: String,
    pub value: f32,
}

pub fn compute_pair_report(
    id: &str,
    path: &AlignmentPath,
    source_count: usize,
    target_count: usize,
) -> PairReport {
    let mut notes = Vec::new();
    if source_count == 0 {
        notes.push("empty_source".to_string());
    }
    if target_count == 0 {
        notes.push("empty_target".to_string());
    }
    if path.is_empty() && source_count > 0 && target_count > 0 {
        notes.push("no_alignment".to_string());
    }

    let mut shapes = ShapeCounts::default();
    for node in path {
        shapes.record(node.shape());
    }

    let structural = compute_structural_metrics(path, source_count, target_count);
    if !structural.is_clean() {
        notes.push(format!(
            "structural_issues:order={} dup_source={} dup_target={} out_of_range={}",
            structural.monotonicity_violations,
            structural.duplicated_source_indices,
            structural.duplicated_target_indices,
            structural.out_of_range_indices
        ));
    }

    let aligned_source = distinct_in_range(path.iter().flat_map(|n| n.source.iter()), source_count);
    let aligned_target = distinct_in_range(path.iter().flat_map(|n| n.target.iter()), target_count);

    PairReport {
        id: id.to_string(),
        source_count: to_u32(source_count),
        target_count: to_u32(target_count),
        node_count: to_u32(path.len()),
        shapes,
        coverage: CoverageMetrics {
            aligned_source: to_u32(aligned_source),
            aligned_target: to_u32(aligned_target),
            unaligned_source: to_u32(source_count - aligned_source),
            unaligned_target: to_u32(target_count - aligned_target),
            source_ratio: ratio(aligned_source, source_count),
            target_ratio: ratio(aligned_target, target_count),
        },
        structural,
        notes,
    }
}

pub fn aggregate_reports(pairs: &[PairReport]) -> AggregateReport {
    let mut shapes = ShapeCounts::default();
    let mut nodes = 0u32;
    let mut source_ratio = Vec::with_capacity(pairs.len());
    let mut target_ratio = Vec::with_capacity(pairs.len());
    let mut node_count = Vec::with_capacity(pairs.len());

    for pair in pairs {
        shapes.add(&pair.shapes);
        nodes += pair.node_count;
        node_count.push(pair.node_count as f64);
        if pair.source_count > 0 {
            source_ratio.push(pair.coverage.source_ratio as f64);
        }
        if pair.target_count > 0 {
            target_ratio.push(pair.coverage.target_ratio as f64);
        }
    }

    AggregateReport {
        counts: AggregateCounts {
            total: to_u32(pairs.len()),
            empty_paths: to_u32(pairs.iter().filter(|p| p.node_count == 0).count()),
            with_structural_issues: to_u32(
                pairs.iter().filter(|p| !p.structural.is_clean()).count(),
            ),
            nodes,
        },
        shapes,
        source_ratio: distribution_or_none(&source_ratio),
        target_ratio: distribution_or_none(&target_ratio),
        node_count: distribution_or_none(&node_count),
        outliers: lowest_coverage(pairs, OUTLIER_TOP_N),
    }
}

fn compute_structural_metrics(
    path: &AlignmentPath,
    source_count: usize,
    target_count: usize,
) -> StructuralMetrics {
    let mut metrics = StructuralMetrics::default();

    for node in path {
        if !strictly_increasing(&node.source) || !strictly_increasing(&node.target) {
            metrics.monotonicity_violations += 1;
        }
        metrics.out_of_range_indices += to_u32(
            node.source.iter().filter(|&&idx| idx >= source_count).count()
                + node.target.iter().filter(|&&idx| idx >= target_count).count(),
        );
    }
    for pair in path.nodes.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        let source_ordered = max_of(&current.source) < min_of(&next.source);
        let target_ordered = max_of(&current.target) < min_of(&next.target);
        if !(source_ordered && target_ordered) {
            metrics.monotonicity_violations += 1;
        }
    }

    metrics.duplicated_source_indices = duplicates(path.iter().flat_map(|n| n.source.iter()));
    metrics.duplicated_target_indices = duplicates(path.iter().flat_map(|n| n.target.iter()));
    metrics
}

fn strictly_increasing(indices: &[usize]) -> bool {
    indices.windows(2).all(|w| w[0] < w[1])
}

fn max_of(indices: &[usize]) -> Option<usize> {
    indices.iter().copied().max()
}

fn min_of(indices: &[usize]) -> Option<usize> {
    indices.iter().copied().min()
}

fn duplicates<'a>(indices: impl Iterator<Item = &'a usize>) -> u32 {
    let mut seen = HashSet::new();
    to_u32(indices.filter(|idx| !seen.insert(**idx)).count())
}

fn distinct_in_range<'a>(indices: impl Iterator<Item = &'a usize>, count: usize) -> usize {
    indices
        .filter(|&&idx| idx < count)
        .collect::<HashSet<_>>()
        .len()
}

fn ratio(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) as f32
    }
}

fn lowest_coverage(pairs: &[PairReport], top_n: usize) -> Vec<OutlierEntry> {
    let mut entries: Vec<OutlierEntry> = pairs
        .iter()
        .filter(|pair| pair.source_count > 0 && pair.target_count > 0)
        .map(|pair| OutlierEntry {
            id: pair.id.clone(),
            value: pair.coverage.source_ratio.min(pair.coverage.target_ratio),
        })
        .collect();

    entries.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    entries.truncate(top_n);
    entries
}

fn distribution_or_none(values: &[f64]) -> Option<MetricDistribution> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(MetricDistribution {
        mean: checked_f32(mean(&sorted), "aggregate.mean").ok()?,
        min: checked_f32(sorted[0], "aggregate.min").ok()?,
        p50: checked_f32(percentile_sorted(&sorted, 0.5), "aggregate.p50").ok()?,
        p90: checked_f32(percentile_sorted(&sorted, 0.9), "aggregate.p90").ok()?,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let clamped = percentile.clamp(0.0, 1.0);
    let max_index = (sorted_values.len() - 1) as f64;
    let rank = clamped * max_index;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn checked_f32(value: f64, metric_name: &str) -> Result<f32, AlignmentError> {
    if !value.is_finite() {
        return Err(AlignmentError::NonFiniteMetric {
            metric: metric_name.to_string(),
            value,
        });
    }
    Ok(value as f32)
}
