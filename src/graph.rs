//! Frozen in-memory network graph.
//!
//! Nodes (buildings, junctions, the grid source) and segments (repairable
//! lines) are added through [`GraphBuilder`] and validated on `build()`; the
//! resulting [`NetworkGraph`] is read-only. Downstream components address
//! nodes and segments by index handles, keeping the graph as the single owner
//! of all records.

use crate::cost::{CostBreakdown, CostModel, MaterialKind};
use crate::error::{PlanError, PlanResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(pub usize);

impl NodeIdx {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentIdx(pub usize);

impl SegmentIdx {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Housing,
    Hospital,
    Junction,
    Source,
}

impl NodeRole {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Housing => "housing",
            NodeRole::Hospital => "hospital",
            NodeRole::Junction => "junction",
            NodeRole::Source => "source",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub role: NodeRole,
    /// Households served when this node is energized.
    pub households: u32,
}

impl Node {
    pub fn is_hospital(&self) -> bool {
        self.role == NodeRole::Hospital
    }
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub id: String,
    pub a: NodeIdx,
    pub b: NodeIdx,
    pub material: MaterialKind,
    pub length_m: f64,
    pub damaged: bool,
    /// Cached once at build time; segments are immutable afterwards.
    pub cost: CostBreakdown,
}

impl Segment {
    /// The endpoint opposite `from`.
    pub fn other_end(&self, from: NodeIdx) -> NodeIdx {
        if self.a == from {
            self.b
        } else {
            self.a
        }
    }
}

#[derive(Debug)]
pub struct GraphBuilder {
    cost_model: CostModel,
    nodes: Vec<Node>,
    node_index: HashMap<String, NodeIdx>,
    segments: Vec<Segment>,
    segment_index: HashMap<String, SegmentIdx>,
}

impl GraphBuilder {
    pub fn new(cost_model: CostModel) -> Self {
        GraphBuilder {
            cost_model,
            nodes: Vec::new(),
            node_index: HashMap::new(),
            segments: Vec::new(),
            segment_index: HashMap::new(),
        }
    }

    pub fn add_node(&mut self, id: &str, role: NodeRole, households: u32) -> PlanResult<NodeIdx> {
        if self.node_index.contains_key(id) {
            return Err(PlanError::DuplicateId {
                kind: "node",
                id: id.to_string(),
            });
        }
        let idx = NodeIdx(self.nodes.len());
        self.nodes.push(Node {
            id: id.to_string(),
            role,
            households,
        });
        self.node_index.insert(id.to_string(), idx);
        Ok(idx)
    }

    /// Add a segment between two already-registered nodes. The cost breakdown
    /// is computed here, exactly once per segment.
    pub fn add_segment(
        &mut self,
        id: &str,
        node_a: &str,
        node_b: &str,
        material: MaterialKind,
        length_m: f64,
        damaged: bool,
    ) -> PlanResult<SegmentIdx> {
        if self.segment_index.contains_key(id) {
            return Err(PlanError::DuplicateId {
                kind: "segment",
                id: id.to_string(),
            });
        }
        let a = self.resolve_endpoint(id, node_a)?;
        let b = self.resolve_endpoint(id, node_b)?;
        let cost = self.cost_model.breakdown(material, length_m)?;
        let idx = SegmentIdx(self.segments.len());
        self.segments.push(Segment {
            id: id.to_string(),
            a,
            b,
            material,
            length_m,
            damaged,
            cost,
        });
        self.segment_index.insert(id.to_string(), idx);
        Ok(idx)
    }

    fn resolve_endpoint(&self, segment_id: &str, node_id: &str) -> PlanResult<NodeIdx> {
        self.node_index
            .get(node_id)
            .copied()
            .ok_or_else(|| PlanError::DanglingReference {
                segment: segment_id.to_string(),
                node: node_id.to_string(),
            })
    }

    /// Freeze the graph. After this point nothing mutates nodes or segments.
    pub fn build(self) -> NetworkGraph {
        let mut adjacency: Vec<Vec<SegmentIdx>> = vec![Vec::new(); self.nodes.len()];
        for (i, seg) in self.segments.iter().enumerate() {
            adjacency[seg.a.index()].push(SegmentIdx(i));
            adjacency[seg.b.index()].push(SegmentIdx(i));
        }
        NetworkGraph {
            nodes: self.nodes,
            node_index: self.node_index,
            segments: self.segments,
            segment_index: self.segment_index,
            adjacency,
        }
    }
}

#[derive(Debug)]
pub struct NetworkGraph {
    nodes: Vec<Node>,
    node_index: HashMap<String, NodeIdx>,
    segments: Vec<Segment>,
    segment_index: HashMap<String, SegmentIdx>,
    adjacency: Vec<Vec<SegmentIdx>>,
}

impl NetworkGraph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    pub fn segment(&self, idx: SegmentIdx) -> &Segment {
        &self.segments[idx.index()]
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeIdx> {
        self.node_index.get(id).copied()
    }

    pub fn segment_by_id(&self, id: &str) -> Option<SegmentIdx> {
        self.segment_index.get(id).copied()
    }

    /// Segments incident to a node, in segment insertion order.
    pub fn neighbors(&self, node: NodeIdx) -> &[SegmentIdx] {
        &self.adjacency[node.index()]
    }

    pub fn damaged_segments(&self) -> impl Iterator<Item = SegmentIdx> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.damaged)
            .map(|(i, _)| SegmentIdx(i))
    }

    /// The unique grid-source node. The dataset must contain exactly one.
    pub fn source_node(&self) -> PlanResult<NodeIdx> {
        self.unique_role_node(NodeRole::Source, "grid source")
    }

    /// The unique hospital node. The dataset must contain exactly one.
    pub fn hospital_node(&self) -> PlanResult<NodeIdx> {
        self.unique_role_node(NodeRole::Hospital, "hospital")
    }

    fn unique_role_node(&self, role: NodeRole, label: &str) -> PlanResult<NodeIdx> {
        let mut found = None;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.role == role {
                if found.is_some() {
                    return Err(PlanError::InvalidInput(format!(
                        "dataset contains more than one {label} node"
                    )));
                }
                found = Some(NodeIdx(i));
            }
        }
        found.ok_or_else(|| PlanError::InvalidInput(format!("dataset contains no {label} node")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> GraphBuilder {
        GraphBuilder::new(CostModel::default())
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let mut b = builder();
        b.add_node("n1", NodeRole::Housing, 3).unwrap();
        let err = b.add_node("n1", NodeRole::Junction, 0).unwrap_err();
        assert!(matches!(err, PlanError::DuplicateId { kind: "node", .. }));
    }

    #[test]
    fn rejects_duplicate_segment_ids() {
        let mut b = builder();
        b.add_node("n1", NodeRole::Source, 0).unwrap();
        b.add_node("n2", NodeRole::Housing, 5).unwrap();
        b.add_segment("s1", "n1", "n2", MaterialKind::Aerial, 10.0, true)
            .unwrap();
        let err = b
            .add_segment("s1", "n1", "n2", MaterialKind::Conduit, 4.0, false)
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::DuplicateId {
                kind: "segment",
                ..
            }
        ));
    }

    #[test]
    fn rejects_dangling_endpoints() {
        let mut b = builder();
        b.add_node("n1", NodeRole::Source, 0).unwrap();
        let err = b
            .add_segment("s1", "n1", "ghost", MaterialKind::Aerial, 10.0, true)
            .unwrap_err();
        match err {
            PlanError::DanglingReference { segment, node } => {
                assert_eq!(segment, "s1");
                assert_eq!(node, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn neighbors_and_damaged_filter() {
        let mut b = builder();
        b.add_node("src", NodeRole::Source, 0).unwrap();
        b.add_node("j1", NodeRole::Junction, 0).unwrap();
        b.add_node("h1", NodeRole::Housing, 8).unwrap();
        b.add_segment("s1", "src", "j1", MaterialKind::Aerial, 10.0, true)
            .unwrap();
        b.add_segment("s2", "j1", "h1", MaterialKind::Conduit, 5.0, false)
            .unwrap();
        let g = b.build();

        let j1 = g.node_by_id("j1").unwrap();
        let incident: Vec<&str> = g
            .neighbors(j1)
            .iter()
            .map(|&s| g.segment(s).id.as_str())
            .collect();
        assert_eq!(incident, vec!["s1", "s2"]);

        let damaged: Vec<&str> = g
            .damaged_segments()
            .map(|s| g.segment(s).id.as_str())
            .collect();
        assert_eq!(damaged, vec!["s1"]);
    }

    #[test]
    fn requires_exactly_one_source_and_hospital() {
        let mut b = builder();
        b.add_node("src", NodeRole::Source, 0).unwrap();
        b.add_node("hosp", NodeRole::Hospital, 0).unwrap();
        let g = b.build();
        assert_eq!(g.source_node().unwrap(), g.node_by_id("src").unwrap());
        assert_eq!(g.hospital_node().unwrap(), g.node_by_id("hosp").unwrap());

        let mut b = builder();
        b.add_node("src", NodeRole::Source, 0).unwrap();
        let g = b.build();
        assert!(g.hospital_node().is_err());

        let mut b = builder();
        b.add_node("s1", NodeRole::Source, 0).unwrap();
        b.add_node("s2", NodeRole::Source, 0).unwrap();
        b.add_node("hosp", NodeRole::Hospital, 0).unwrap();
        let g = b.build();
        assert!(g.source_node().is_err());
    }
}
