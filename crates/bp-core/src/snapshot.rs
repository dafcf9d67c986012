//! Whole-canvas save/load.
//!
//! A `CanvasSnapshot` is a flat, serialisable view of a `CanvasGraph`:
//! nodes in canvas order with their parent ids, plus the flow edges.
//! Loading rebuilds the graph and validates it completely before handing it
//! back, so a bad snapshot never leaves a half-loaded canvas behind.

use crate::id::{EdgeId, NodeId};
use crate::model::{CanvasGraph, CanvasNode, FlowEdge};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("duplicate node id `{0}`")]
    DuplicateNode(NodeId),
    #[error("duplicate edge id `{0}`")]
    DuplicateEdge(EdgeId),
    #[error("node `{child}` references missing parent `{parent}`")]
    MissingParent { child: NodeId, parent: NodeId },
    #[error("node `{parent}` cannot contain other nodes (child `{child}`)")]
    InvalidContainer { child: NodeId, parent: NodeId },
    #[error("containment cycle through `{0}`")]
    ParentCycle(NodeId),
    #[error("edge `{edge}` references missing node `{node}`")]
    DanglingEdge { edge: EdgeId, node: NodeId },
}

/// One node plus the id of its parent, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node: CanvasNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
}

impl CanvasSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Compact MessagePack encoding. Structs are written as maps so the
    /// format stays self-describing.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

impl CanvasGraph {
    /// Capture the whole canvas.
    pub fn to_snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            nodes: self
                .nodes()
                .map(|node| NodeRecord {
                    node: node.clone(),
                    parent: self.parent_id(node.id),
                })
                .collect(),
            edges: self.edges().to_vec(),
        }
    }

    /// Rebuild a canvas from a snapshot, rejecting duplicate ids, missing
    /// or non-container parents, containment cycles and dangling edges.
    pub fn from_snapshot(snapshot: &CanvasSnapshot) -> Result<Self, SnapshotError> {
        let mut graph = CanvasGraph::new();

        for record in &snapshot.nodes {
            if graph.add_node(record.node.clone()).is_none() {
                return Err(SnapshotError::DuplicateNode(record.node.id));
            }
        }

        for record in &snapshot.nodes {
            let child = record.node.id;
            let Some(parent) = record.parent else {
                continue;
            };
            let Some(parent_node) = graph.get(parent) else {
                return Err(SnapshotError::MissingParent { child, parent });
            };
            if parent == child || graph.is_ancestor_of(child, parent) {
                return Err(SnapshotError::ParentCycle(child));
            }
            if !parent_node.is_container() {
                return Err(SnapshotError::InvalidContainer { child, parent });
            }
            if !graph.set_parent(child, Some(parent)) {
                return Err(SnapshotError::InvalidContainer { child, parent });
            }
        }

        for edge in &snapshot.edges {
            for endpoint in [edge.source, edge.target] {
                if !graph.contains(endpoint) {
                    return Err(SnapshotError::DanglingEdge {
                        edge: edge.id,
                        node: endpoint,
                    });
                }
            }
            if !graph.add_edge(edge.clone()) {
                return Err(SnapshotError::DuplicateEdge(edge.id));
            }
        }

        log::debug!(
            "loaded snapshot: {} nodes, {} edges",
            graph.len(),
            graph.edges().len()
        );
        Ok(graph)
    }
}
