//! Empty vs meaningful node classification.
//!
//! A node is "empty" when deleting it loses nothing the user typed, bound
//! or connected. Bulk deletion only asks for confirmation when at least one
//! meaningful node is involved.

use crate::id::NodeId;
use crate::model::{CanvasNode, FlowEdge, NodeKind};
use std::collections::HashSet;

/// Whether `node` carries no user content. Rules apply in order:
///
/// 1. a flow edge touching the node makes it meaningful
/// 2. so does a non-blank description
/// 3. so does a binding to a table
/// 4. otherwise the kind decides: pages and components are empty while
///    they keep their default label (components also need no code),
///    functions are empty without code, data nodes and widgets are empty.
///
/// Text is compared trimmed: a whitespace-only label counts as the default
/// label, and whitespace-only code counts as no code.
pub fn is_empty(node: &CanvasNode, edges: &[FlowEdge]) -> bool {
    let connected = edges.iter().any(|e| e.touches(node.id));
    is_empty_with(node, connected)
}

fn is_empty_with(node: &CanvasNode, connected: bool) -> bool {
    if connected {
        return false;
    }
    let data = &node.data;
    if !data.description.trim().is_empty() {
        return false;
    }
    if data.binding.as_ref().is_some_and(|b| !b.table.is_empty()) {
        return false;
    }

    let default_label = data.kind.default_label();
    let has_default_label =
        data.label.trim().is_empty() || default_label.is_some_and(|d| data.label == d);
    let has_code = data.kind.code().is_some_and(|c| !c.trim().is_empty());

    match &data.kind {
        NodeKind::Page => has_default_label,
        NodeKind::Component { .. } => has_default_label && !has_code,
        NodeKind::Function { .. } => !has_code,
        NodeKind::Data => true,
        NodeKind::Widget { .. } => true,
    }
}

/// Nodes split by [`is_empty`], each side in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub empty: Vec<NodeId>,
    pub meaningful: Vec<NodeId>,
}

impl Partition {
    pub fn has_meaningful(&self) -> bool {
        !self.meaningful.is_empty()
    }
}

/// Classify a batch of nodes. Edge endpoints are indexed once up front.
pub fn partition<'a, I>(nodes: I, edges: &[FlowEdge]) -> Partition
where
    I: IntoIterator<Item = &'a CanvasNode>,
{
    let connected: HashSet<NodeId> = edges
        .iter()
        .flat_map(|e| [e.source, e.target])
        .collect();

    let mut out = Partition::default();
    for node in nodes {
        if is_empty_with(node, connected.contains(&node.id)) {
            out.empty.push(node.id);
        } else {
            out.meaningful.push(node.id);
        }
    }
    out
}
