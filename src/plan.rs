//! Final plan assembly and report rows.
//!
//! Purely derived from the graph and the upstream phase assignments: Phase 0
//! (the hospital path), the allocated phases 1–4, global totals, and the
//! per-segment / per-phase tables handed to the output layer.

use crate::graph::{NetworkGraph, SegmentIdx};
use crate::hospital::AutonomyCheck;
use crate::phases::Phase;
use crate::types::{PhaseSummaryRow, PlanRow, RunSummary};
use crate::util::format_number;

#[derive(Debug, Clone)]
pub struct Plan {
    /// Phases 0 through 4, in order.
    pub phases: Vec<Phase>,
    pub total_cost: f64,
    pub total_beneficiaries: u64,
    pub autonomy: AutonomyCheck,
}

/// Fold Phase 0 and the allocated phases into the final read-only plan.
pub fn assemble(
    graph: &NetworkGraph,
    phase0_segments: &[SegmentIdx],
    attribution: &[u64],
    allocated: Vec<Phase>,
    autonomy: AutonomyCheck,
) -> Plan {
    let mut phase0 = Phase::new(0);
    for &seg in phase0_segments {
        phase0.admit(graph, seg, attribution[seg.index()]);
    }
    let mut phases = Vec::with_capacity(1 + allocated.len());
    phases.push(phase0);
    phases.extend(allocated);

    let total_cost = phases.iter().map(|p| p.cost).sum();
    let total_beneficiaries = phases.iter().map(|p| p.beneficiaries).sum();
    Plan {
        phases,
        total_cost,
        total_beneficiaries,
        autonomy,
    }
}

impl Plan {
    pub fn damaged_segment_count(&self) -> usize {
        self.phases.iter().map(|p| p.segments.len()).sum()
    }

    /// Per-segment table, ordered by phase, then beneficiaries descending,
    /// then segment id for full determinism.
    pub fn plan_rows(&self, graph: &NetworkGraph, attribution: &[u64]) -> Vec<PlanRow> {
        let mut entries: Vec<(usize, u64, SegmentIdx)> = Vec::new();
        for phase in &self.phases {
            for &seg in &phase.segments {
                entries.push((phase.ordinal, attribution[seg.index()], seg));
            }
        }
        entries.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| graph.segment(a.2).id.cmp(&graph.segment(b.2).id))
        });

        entries
            .into_iter()
            .map(|(phase, beneficiaries, seg_idx)| {
                let seg = graph.segment(seg_idx);
                PlanRow {
                    segment_id: seg.id.clone(),
                    material: seg.material.as_str().to_string(),
                    length_m: format_number(seg.length_m, 2),
                    material_cost: format_number(seg.cost.material_cost, 2),
                    labor_cost: format_number(seg.cost.labor_cost, 2),
                    total_cost: format_number(seg.cost.total_cost, 2),
                    duration_hours: format_number(seg.cost.duration_hours, 2),
                    beneficiaries,
                    hospital_path: phase == 0,
                    phase,
                }
            })
            .collect()
    }

    /// Per-phase synthesis table.
    pub fn phase_rows(&self, graph: &NetworkGraph) -> Vec<PhaseSummaryRow> {
        self.phases
            .iter()
            .map(|phase| {
                let material_cost: f64 = phase
                    .segments
                    .iter()
                    .map(|&s| graph.segment(s).cost.material_cost)
                    .sum();
                let labor_cost: f64 = phase
                    .segments
                    .iter()
                    .map(|&s| graph.segment(s).cost.labor_cost)
                    .sum();
                let pct = if self.total_cost > 0.0 {
                    100.0 * phase.cost / self.total_cost
                } else {
                    0.0
                };
                PhaseSummaryRow {
                    phase: phase.ordinal,
                    segment_count: phase.segments.len(),
                    total_cost: format_number(phase.cost, 2),
                    material_cost: format_number(material_cost, 2),
                    labor_cost: format_number(labor_cost, 2),
                    beneficiaries: phase.beneficiaries,
                    critical_duration_hours: format_number(phase.critical_duration_hours, 2),
                    pct_of_total: format_number(pct, 2),
                }
            })
            .collect()
    }

    pub fn run_summary(&self) -> RunSummary {
        RunSummary {
            damaged_segments: self.damaged_segment_count(),
            total_cost: self.total_cost,
            total_beneficiaries: self.total_beneficiaries,
            hospital: self.autonomy.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{CostModel, MaterialKind};
    use crate::graph::{GraphBuilder, NodeRole};
    use crate::hospital::{check_autonomy, resolve_path};
    use crate::phases::allocate;
    use crate::ranking::{attribute_beneficiaries, rank_segments};
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn full_pipeline(graph: &NetworkGraph) -> Plan {
        let source = graph.source_node().unwrap();
        let hospital = graph.hospital_node().unwrap();
        let path = resolve_path(graph, source, hospital).unwrap();
        let phase0 = path.damaged(graph);
        let autonomy = check_autonomy(graph, &phase0);
        let attribution = attribute_beneficiaries(graph, source);
        let phase0_set: HashSet<SegmentIdx> = phase0.iter().copied().collect();
        let ranked = rank_segments(graph, &attribution, &phase0_set);
        let budget: f64 = ranked
            .iter()
            .map(|r| graph.segment(r.segment).cost.total_cost)
            .sum();
        let allocated = allocate(graph, &ranked, budget);
        assemble(graph, &phase0, &attribution, allocated, autonomy)
    }

    //  src -- j1 -- hosp
    //          \
    //           h1, h2
    fn town() -> NetworkGraph {
        let mut b = GraphBuilder::new(CostModel::default());
        b.add_node("src", NodeRole::Source, 0).unwrap();
        b.add_node("j1", NodeRole::Junction, 0).unwrap();
        b.add_node("hosp", NodeRole::Hospital, 1).unwrap();
        b.add_node("h1", NodeRole::Housing, 20).unwrap();
        b.add_node("h2", NodeRole::Housing, 6).unwrap();
        b.add_segment("trunk", "src", "j1", MaterialKind::Conduit, 12.0, true)
            .unwrap();
        b.add_segment("hline", "j1", "hosp", MaterialKind::SemiAerial, 5.0, true)
            .unwrap();
        b.add_segment("d1", "j1", "h1", MaterialKind::Aerial, 8.0, true)
            .unwrap();
        b.add_segment("d2", "j1", "h2", MaterialKind::Aerial, 14.0, true)
            .unwrap();
        b.build()
    }

    #[test]
    fn hospital_path_segments_are_phase_zero_regardless_of_rank() {
        let g = town();
        let plan = full_pipeline(&g);
        let phase0_ids: Vec<&str> = plan.phases[0]
            .segments
            .iter()
            .map(|&s| g.segment(s).id.as_str())
            .collect();
        // The trunk serves everyone and the hospital line serves one node;
        // both are Phase 0 because they sit on the hospital path.
        assert_eq!(phase0_ids, vec!["trunk", "hline"]);
    }

    #[test]
    fn every_damaged_segment_is_planned_exactly_once() {
        let g = town();
        let plan = full_pipeline(&g);
        let mut seen = HashSet::new();
        for p in &plan.phases {
            for &s in &p.segments {
                assert!(seen.insert(s));
            }
        }
        assert_eq!(seen.len(), g.damaged_segments().count());
        assert_eq!(plan.damaged_segment_count(), 4);
    }

    #[test]
    fn totals_and_percentages_are_consistent() {
        let g = town();
        let plan = full_pipeline(&g);
        let expected_total: f64 = g
            .damaged_segments()
            .map(|s| g.segment(s).cost.total_cost)
            .sum();
        assert_relative_eq!(plan.total_cost, expected_total, epsilon = 1e-9);

        let rows = plan.phase_rows(&g);
        assert_eq!(rows.len(), 5);
        let pct_sum: f64 = rows
            .iter()
            .map(|r| r.pct_of_total.replace(',', "").parse::<f64>().unwrap())
            .sum();
        assert_relative_eq!(pct_sum, 100.0, epsilon = 0.05);
    }

    #[test]
    fn plan_rows_are_phase_ordered_and_flag_the_hospital_path() {
        let g = town();
        let plan = full_pipeline(&g);
        let attribution = attribute_beneficiaries(&g, g.source_node().unwrap());
        let rows = plan.plan_rows(&g, &attribution);
        assert_eq!(rows.len(), 4);
        let phases: Vec<usize> = rows.iter().map(|r| r.phase).collect();
        let mut sorted = phases.clone();
        sorted.sort_unstable();
        assert_eq!(phases, sorted);
        for row in &rows {
            assert_eq!(row.hospital_path, row.phase == 0);
        }
    }

    #[test]
    fn rerunning_the_pipeline_is_deterministic() {
        let g = town();
        let attribution = attribute_beneficiaries(&g, g.source_node().unwrap());
        let first = full_pipeline(&g).plan_rows(&g, &attribution);
        let second = full_pipeline(&g).plan_rows(&g, &attribution);
        let ids = |rows: &[crate::types::PlanRow]| {
            rows.iter()
                .map(|r| (r.segment_id.clone(), r.phase))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn zero_damage_produces_five_empty_phases() {
        let mut b = GraphBuilder::new(CostModel::default());
        b.add_node("src", NodeRole::Source, 0).unwrap();
        b.add_node("hosp", NodeRole::Hospital, 0).unwrap();
        b.add_segment("s1", "src", "hosp", MaterialKind::Aerial, 5.0, false)
            .unwrap();
        let g = b.build();
        let plan = full_pipeline(&g);
        assert_eq!(plan.phases.len(), 5);
        assert!(plan.phases.iter().all(|p| p.is_empty()));
        assert_relative_eq!(plan.total_cost, 0.0);
    }

    #[test]
    fn hospital_only_damage_leaves_later_phases_empty() {
        let mut b = GraphBuilder::new(CostModel::default());
        b.add_node("src", NodeRole::Source, 0).unwrap();
        b.add_node("hosp", NodeRole::Hospital, 2).unwrap();
        b.add_node("h1", NodeRole::Housing, 9).unwrap();
        b.add_segment("hline", "src", "hosp", MaterialKind::Conduit, 6.0, true)
            .unwrap();
        b.add_segment("ok", "src", "h1", MaterialKind::Aerial, 4.0, false)
            .unwrap();
        let g = b.build();
        let plan = full_pipeline(&g);
        assert_eq!(plan.phases[0].segments.len(), 1);
        for p in &plan.phases[1..] {
            assert!(p.is_empty());
        }
        let summary = plan.run_summary();
        assert_eq!(summary.damaged_segments, 1);
        assert_relative_eq!(summary.hospital.phase0_cost, plan.total_cost);
    }
}
