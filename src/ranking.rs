//! Beneficiary attribution and ratio-based ranking.
//!
//! With the network rooted at the grid source, cutting a segment disconnects
//! exactly one subtree; the households in that subtree are the segment's
//! beneficiaries. Damaged segments outside Phase 0 are then ordered by
//! beneficiaries per unit of repair cost, with deterministic tie-breaking.

use crate::graph::{NetworkGraph, NodeIdx, SegmentIdx};
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct RankedSegment {
    pub segment: SegmentIdx,
    pub beneficiaries: u64,
    pub ratio: f64,
}

/// Per-segment beneficiary counts, indexed by segment position.
///
/// Runs one depth-first pass from the source and accumulates subtree
/// household sums in reverse visit order. Segments not reachable from the
/// source (a disconnected pocket of the dataset) are attributed zero
/// beneficiaries and therefore rank last.
pub fn attribute_beneficiaries(graph: &NetworkGraph, source: NodeIdx) -> Vec<u64> {
    let n = graph.nodes().len();
    let mut visited = vec![false; n];
    // Edge leading into each node from its parent, for reachable non-roots.
    let mut parent_edge: Vec<Option<SegmentIdx>> = vec![None; n];
    let mut order: Vec<NodeIdx> = Vec::with_capacity(n);
    let mut stack = vec![source];
    visited[source.index()] = true;

    while let Some(node) = stack.pop() {
        order.push(node);
        for &seg_idx in graph.neighbors(node) {
            let next = graph.segment(seg_idx).other_end(node);
            if !visited[next.index()] {
                visited[next.index()] = true;
                parent_edge[next.index()] = Some(seg_idx);
                stack.push(next);
            }
        }
    }

    // Children appear after their parent in DFS order, so a reverse sweep
    // folds each subtree sum into its parent before the parent is read.
    let mut subtree: Vec<u64> = graph
        .nodes()
        .iter()
        .map(|node| u64::from(node.households))
        .collect();
    let mut attribution = vec![0u64; graph.segments().len()];
    for &node in order.iter().rev() {
        if let Some(seg_idx) = parent_edge[node.index()] {
            attribution[seg_idx.index()] = subtree[node.index()];
            let parent = graph.segment(seg_idx).other_end(node);
            subtree[parent.index()] += subtree[node.index()];
        }
    }
    attribution
}

/// Rank every damaged segment outside Phase 0.
///
/// Order: ratio descending, then beneficiary count descending, then segment
/// id ascending. This is the sole admission order for phases 1–4.
pub fn rank_segments(
    graph: &NetworkGraph,
    attribution: &[u64],
    phase0: &HashSet<SegmentIdx>,
) -> Vec<RankedSegment> {
    let mut ranked: Vec<RankedSegment> = graph
        .damaged_segments()
        .filter(|s| !phase0.contains(s))
        .map(|s| {
            let beneficiaries = attribution[s.index()];
            let ratio = beneficiaries as f64 / graph.segment(s).cost.total_cost;
            RankedSegment {
                segment: s,
                beneficiaries,
                ratio,
            }
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.ratio
            .partial_cmp(&a.ratio)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.beneficiaries.cmp(&a.beneficiaries))
            .then_with(|| graph.segment(a.segment).id.cmp(&graph.segment(b.segment).id))
    });
    ranked
}
