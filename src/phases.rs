//! Budget-bounded phase assignment.
//!
//! A single forward pass over the ranked segments fills phases 1–3 under
//! cumulative cost caps (40%/20%/20% of the remaining budget); Phase 4 has no
//! cap and absorbs everything left. A segment that does not fit the open
//! phase closes it and becomes the first member of the next phase — the first
//! segment of an empty phase is always admitted, so one oversized repair can
//! never starve a phase. No segment is revisited once placed.

use crate::graph::{NetworkGraph, SegmentIdx};
use crate::ranking::RankedSegment;

/// Cost shares for phases 1–3. Phase 4 takes the remainder, uncapped.
pub const PHASE_SHARES: [f64; 3] = [0.40, 0.20, 0.20];

/// One execution phase with its running totals.
#[derive(Debug, Clone)]
pub struct Phase {
    pub ordinal: usize,
    pub segments: Vec<SegmentIdx>,
    pub cost: f64,
    pub beneficiaries: u64,
    /// Longest member duration; crews work segments in parallel.
    pub critical_duration_hours: f64,
}

impl Phase {
    pub fn new(ordinal: usize) -> Self {
        Phase {
            ordinal,
            segments: Vec::new(),
            cost: 0.0,
            beneficiaries: 0,
            critical_duration_hours: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn admit(&mut self, graph: &NetworkGraph, segment: SegmentIdx, beneficiaries: u64) {
        let seg = graph.segment(segment);
        self.segments.push(segment);
        self.cost += seg.cost.total_cost;
        self.beneficiaries += beneficiaries;
        self.critical_duration_hours = self.critical_duration_hours.max(seg.cost.duration_hours);
    }
}

/// Budget caps for phases 1–4 given the remaining (non-Phase-0) budget.
pub fn phase_caps(budget: f64) -> [f64; 4] {
    [
        PHASE_SHARES[0] * budget,
        PHASE_SHARES[1] * budget,
        PHASE_SHARES[2] * budget,
        f64::INFINITY,
    ]
}

/// Assign the ranked segments to phases 1–4.
///
/// `budget` is the total cost of all damaged segments minus the Phase-0 cost.
pub fn allocate(graph: &NetworkGraph, ranked: &[RankedSegment], budget: f64) -> Vec<Phase> {
    let caps = phase_caps(budget);
    let mut phases: Vec<Phase> = (1..=4).map(Phase::new).collect();
    let mut current = 0usize;

    for item in ranked {
        let cost = graph.segment(item.segment).cost.total_cost;
        let over_cap = phases[current].cost + cost > caps[current];
        if over_cap && !phases[current].is_empty() && current < phases.len() - 1 {
            // Close the phase; the segment opens the next one and is admitted
            // there unconditionally.
            current += 1;
        }
        phases[current].admit(graph, item.segment, item.beneficiaries);
    }
    phases
}
