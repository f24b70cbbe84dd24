//! CSV ingestion for the three input tables.
//!
//! `buildings.csv` supplies the nodes, `segments.csv` the repairable line
//! attributes, and `network.csv` the tree edges tying them together. Unlike a
//! cleaning pass that skips bad rows, malformed records here are fatal: a
//! plan computed over silently-dropped data would be wrong, not approximate.

use crate::cost::CostModel;
use crate::error::{PlanError, PlanResult};
use crate::graph::{GraphBuilder, NetworkGraph, NodeRole};
use crate::types::{RawBuildingRow, RawEdgeRow, RawSegmentRow};
use crate::util::{parse_bool_safe, parse_f64_safe, parse_u32_safe};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub buildings: usize,
    pub segments: usize,
    pub edges: usize,
    pub damaged_segments: usize,
    /// Segment records never referenced by a network edge; they are logged
    /// and left out of the graph.
    pub orphan_segments: usize,
}

struct SegmentRecord {
    material: crate::cost::MaterialKind,
    length_m: f64,
    damaged: bool,
}

fn required<'a>(field: &'a Option<String>, what: &str, row: usize) -> PlanResult<&'a str> {
    match field.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(PlanError::InvalidInput(format!(
            "{what} missing on row {row}"
        ))),
    }
}

pub fn load_network(
    buildings_path: &Path,
    segments_path: &Path,
    network_path: &Path,
    cost_model: CostModel,
) -> PlanResult<(NetworkGraph, LoadReport)> {
    let mut builder = GraphBuilder::new(cost_model);

    // Nodes first: segment endpoints are resolved against them.
    let mut buildings = 0usize;
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(buildings_path)?;
    for (i, result) in rdr.deserialize::<RawBuildingRow>().enumerate() {
        let row_no = i + 2; // header is row 1
        let row = result?;
        let id = required(&row.id, "building id", row_no)?;
        let role = parse_role(required(&row.kind, "building kind", row_no)?)?;
        // An absent household count means zero (junctions, the source).
        let households = match row.households.as_deref().map(str::trim) {
            None | Some("") => 0,
            some => parse_u32_safe(some).ok_or_else(|| {
                PlanError::InvalidInput(format!("bad household count on row {row_no}"))
            })?,
        };
        builder.add_node(id, role, households)?;
        buildings += 1;
    }

    // Segment attributes, keyed by id for the join with the edge table.
    let mut records: HashMap<String, SegmentRecord> = HashMap::new();
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(segments_path)?;
    for (i, result) in rdr.deserialize::<RawSegmentRow>().enumerate() {
        let row_no = i + 2;
        let row = result?;
        let id = required(&row.id, "segment id", row_no)?;
        if records.contains_key(id) {
            return Err(PlanError::DuplicateId {
                kind: "segment",
                id: id.to_string(),
            });
        }
        let material = required(&row.material, "segment material", row_no)?.parse()?;
        let length_m = parse_f64_safe(row.length_m.as_deref()).ok_or_else(|| {
            PlanError::InvalidInput(format!("bad segment length on row {row_no}"))
        })?;
        let damaged = parse_bool_safe(row.damaged.as_deref()).ok_or_else(|| {
            PlanError::InvalidInput(format!("bad damaged flag on row {row_no}"))
        })?;
        records.insert(
            id.to_string(),
            SegmentRecord {
                material,
                length_m,
                damaged,
            },
        );
    }
    let total_records = records.len();

    // Tree edges join the two tables; the builder validates endpoints and
    // the cost model validates lengths.
    let mut edges = 0usize;
    let mut damaged_segments = 0usize;
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(network_path)?;
    for (i, result) in rdr.deserialize::<RawEdgeRow>().enumerate() {
        let row_no = i + 2;
        let row = result?;
        let node_a = required(&row.node_a, "edge endpoint", row_no)?;
        let node_b = required(&row.node_b, "edge endpoint", row_no)?;
        let segment_id = required(&row.segment_id, "edge segment id", row_no)?;
        let record = records.remove(segment_id).ok_or_else(|| {
            PlanError::InvalidInput(format!(
                "network row {row_no} references unknown or already-used segment {segment_id}"
            ))
        })?;
        builder.add_segment(
            segment_id,
            node_a,
            node_b,
            record.material,
            record.length_m,
            record.damaged,
        )?;
        edges += 1;
        if record.damaged {
            damaged_segments += 1;
        }
    }

    let orphan_segments = records.len();
    if orphan_segments > 0 {
        let mut ids: Vec<&String> = records.keys().collect();
        ids.sort();
        warn!(count = orphan_segments, ?ids, "segment records without a network edge were ignored");
    }

    let report = LoadReport {
        buildings,
        segments: total_records - orphan_segments,
        edges,
        damaged_segments,
        orphan_segments,
    };
    Ok((builder.build(), report))
}

fn parse_role(s: &str) -> PlanResult<NodeRole> {
    match s.to_ascii_lowercase().as_str() {
        "housing" => Ok(NodeRole::Housing),
        "hospital" => Ok(NodeRole::Hospital),
        "junction" => Ok(NodeRole::Junction),
        "source" => Ok(NodeRole::Source),
        other => Err(PlanError::InvalidInput(format!(
            "unknown building kind: {other:?} (expected housing, hospital, junction, or source)"
        ))),
    }
}
