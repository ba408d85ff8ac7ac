use crate::types::{AlignmentNode, AlignmentPath, Coordinate};

/// Run-length compaction of visited coordinates into grouped nodes.
///
/// A coordinate that repeats the current node's source index extends its
/// target group (1-N), one that repeats its target index extends the source
/// group (N-1). Anything else closes the node. Input must be monotonically
/// non-decreasing on both axes, which the vicinity search guarantees.
pub fn compact_path(coordinates: &[Coordinate]) -> AlignmentPath {
    let mut nodes: Vec<AlignmentNode> = Vec::with_capacity(coordinates.len());

    for &at in coordinates {
        let Some(current) = nodes.last_mut() else {
            nodes.push(AlignmentNode::singleton(at));
            continue;
        };

        if current.source.contains(&at.source) {
            if !current.target.contains(&at.target) {
                current.target.push(at.target);
            }
            tracing::debug!(
                source = at.source,
                target = at.target,
                "compaction: extended target group"
            );
        } else if current.target.contains(&at.target) {
            current.source.push(at.source);
            tracing::debug!(
                source = at.source,
                target = at.target,
                "compaction: extended source group"
            );
        } else {
            nodes.push(AlignmentNode::singleton(at));
        }
    }

    AlignmentPath::new(nodes)
}
