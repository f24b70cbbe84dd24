//! Hospital supply-path resolution and the Phase-0 autonomy check.
//!
//! The network is supplied as a tree, so a single depth-first traversal from
//! the grid source finds the one simple path to the hospital. Every damaged
//! segment on that path is repaired in Phase 0, regardless of how its
//! beneficiaries-per-cost ratio would rank it.

use crate::error::{PlanError, PlanResult};
use crate::graph::{NetworkGraph, NodeIdx, SegmentIdx};
use serde::Serialize;
use tracing::warn;

/// Backup generator window at the hospital.
pub const HOSPITAL_AUTONOMY_HOURS: f64 = 20.0;
/// Safety margin shaved off the autonomy window.
pub const HOSPITAL_SAFETY_MARGIN: f64 = 0.20;

/// Phase-0 deadline: 20 h reduced by the 20% margin, i.e. 16 h.
pub fn autonomy_target_hours() -> f64 {
    HOSPITAL_AUTONOMY_HOURS * (1.0 - HOSPITAL_SAFETY_MARGIN)
}

/// The ordered segment sequence from the grid source to the hospital.
#[derive(Debug, Clone)]
pub struct HospitalPath {
    pub segments: Vec<SegmentIdx>,
}

impl HospitalPath {
    /// Damaged segments on the path; these and only these form Phase 0.
    pub fn damaged(&self, graph: &NetworkGraph) -> Vec<SegmentIdx> {
        self.segments
            .iter()
            .copied()
            .filter(|&s| graph.segment(s).damaged)
            .collect()
    }
}

/// Find the unique source→hospital path by iterative depth-first search.
pub fn resolve_path(
    graph: &NetworkGraph,
    source: NodeIdx,
    hospital: NodeIdx,
) -> PlanResult<HospitalPath> {
    let n = graph.nodes().len();
    let mut visited = vec![false; n];
    let mut parent_edge: Vec<Option<SegmentIdx>> = vec![None; n];
    let mut stack = vec![source];
    visited[source.index()] = true;

    while let Some(node) = stack.pop() {
        if node == hospital {
            break;
        }
        for &seg_idx in graph.neighbors(node) {
            let next = graph.segment(seg_idx).other_end(node);
            if !visited[next.index()] {
                visited[next.index()] = true;
                parent_edge[next.index()] = Some(seg_idx);
                stack.push(next);
            }
        }
    }

    if !visited[hospital.index()] {
        return Err(PlanError::UnreachableNode {
            from: graph.node(source).id.clone(),
            to: graph.node(hospital).id.clone(),
        });
    }

    // Walk parent edges back from the hospital, then flip to source-first.
    // The source is the only visited node without a parent edge, so the walk
    // terminates there.
    let mut segments = Vec::new();
    let mut cursor = hospital;
    while let Some(seg_idx) = parent_edge[cursor.index()] {
        segments.push(seg_idx);
        cursor = graph.segment(seg_idx).other_end(cursor);
    }
    segments.reverse();
    Ok(HospitalPath { segments })
}

/// Outcome of the Phase-0 autonomy validation.
///
/// Crews work the Phase-0 segments in parallel, so the binding figure is the
/// longest single-segment duration, compared against the 16 h deadline.
/// Exceeding it does not abort the run; the plan is produced and flagged.
#[derive(Debug, Clone, Serialize)]
pub struct AutonomyCheck {
    pub phase0_cost: f64,
    pub critical_duration_hours: f64,
    pub target_hours: f64,
    pub within_margin: bool,
}

pub fn check_autonomy(graph: &NetworkGraph, phase0: &[SegmentIdx]) -> AutonomyCheck {
    let phase0_cost: f64 = phase0.iter().map(|&s| graph.segment(s).cost.total_cost).sum();
    let critical_duration_hours = phase0
        .iter()
        .map(|&s| graph.segment(s).cost.duration_hours)
        .fold(0.0_f64, f64::max);
    let target_hours = autonomy_target_hours();
    let within_margin = critical_duration_hours <= target_hours;
    if !within_margin {
        warn!(
            critical_duration_hours,
            target_hours, "hospital reconnection exceeds the generator autonomy margin"
        );
    }
    AutonomyCheck {
        phase0_cost,
        critical_duration_hours,
        target_hours,
        within_margin,
    }
}
