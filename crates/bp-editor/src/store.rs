//! Canvas state store.
//!
//! `CanvasStore` owns the canvas graph together with the editor state around
//! it: the node shown in the detail panel, the drop-target highlight, the
//! clipboard, grid configuration and per-project canvases. Every mutation
//! goes through a method on the store; calls that reference missing nodes
//! or would break containment are no-ops reported through the return value.
//!
//! The drag, selection, clipboard and project operations live in their own
//! modules as further `impl CanvasStore` blocks.

use crate::clipboard::Clipboard;
use bp_core::catalog::validate_binding;
use bp_core::grid::{GridChild, GridConfig};
use bp_core::id::{EdgeId, NodeId};
use bp_core::model::*;
use bp_core::payload::DndPayload;
use bp_core::snapshot::{CanvasSnapshot, SnapshotError};
use std::collections::HashMap;

/// A patch from the canvas widget for one node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    Position { id: NodeId, position: Position },
    Select { id: NodeId, selected: bool },
    Dimensions { id: NodeId, size: Size },
    Remove { id: NodeId },
}

/// A patch from the canvas widget for one edge.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeChange {
    Select { id: EdgeId, selected: bool },
    Remove { id: EdgeId },
}

pub struct CanvasStore {
    pub(crate) graph: CanvasGraph,

    /// Node shown in the detail panel.
    pub(crate) selected_node: Option<NodeId>,

    /// Container currently highlighted as a drop target.
    pub(crate) highlighted: Option<NodeId>,

    pub(crate) clipboard: Option<Clipboard>,

    pub(crate) grid: GridConfig,

    /// Canvases of projects that are not currently open.
    pub(crate) projects: HashMap<String, CanvasSnapshot>,

    /// Bumped once per state-changing operation.
    revision: u64,

    /// Stamp of the most recent paste; stamps only ever grow.
    pub(crate) last_paste_stamp: u64,
}

impl CanvasStore {
    /// Create an empty store with the default grid.
    pub fn new() -> Self {
        Self::with_grid(GridConfig::default())
    }

    pub fn with_grid(grid: GridConfig) -> Self {
        Self {
            graph: CanvasGraph::new(),
            selected_node: None,
            highlighted: None,
            clipboard: None,
            grid,
            projects: HashMap::new(),
            revision: 0,
            last_paste_stamp: 0,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }

    // ─── Read access ─────────────────────────────────────────────────────

    pub fn graph(&self) -> &CanvasGraph {
        &self.graph
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Nodes in canvas order.
    pub fn nodes(&self) -> impl Iterator<Item = &CanvasNode> + '_ {
        self.graph.nodes()
    }

    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.graph.get(id)
    }

    pub fn edges(&self) -> &[FlowEdge] {
        self.graph.edges()
    }

    /// Ids of the selected nodes, in canvas order.
    pub fn selection(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .filter(|n| n.selected)
            .map(|n| n.id)
            .collect()
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn highlighted_node(&self) -> Option<NodeId> {
        self.highlighted
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected_node
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.graph.parent_id(id)
    }

    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.children(id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Children of `parent` as the grid sees them, optionally leaving one out.
    pub(crate) fn grid_children(&self, parent: NodeId, without: Option<NodeId>) -> Vec<GridChild> {
        self.graph
            .children(parent)
            .into_iter()
            .filter(|c| Some(*c) != without)
            .filter_map(|c| self.graph.get(c).map(|n| GridChild::new(c, n.position)))
            .collect()
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Append a top-level node. Rejected if the id is already taken.
    pub fn add_node(&mut self, node: CanvasNode) -> bool {
        let id = node.id;
        if self.graph.add_node(node).is_none() {
            return false;
        }
        log::debug!("added node {id}");
        self.touch();
        true
    }

    /// Shallow-merge `patch` into the node's data. Geometry and containment
    /// are never touched. A binding to an unknown table or column rejects
    /// the whole patch.
    pub fn update_node(&mut self, id: NodeId, patch: &NodePatch) -> bool {
        if let Some(Some(binding)) = &patch.binding
            && !validate_binding(binding)
        {
            log::warn!("update_node: {id} has an invalid binding to `{}`", binding.table);
            return false;
        }
        let Some(node) = self.graph.get_mut(id) else {
            return false;
        };
        node.data.apply(patch);
        self.touch();
        true
    }

    /// Remove a node together with its descendants and incident edges.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        self.remove_nodes([id]) > 0
    }

    /// Remove the given nodes, all of their descendants and every edge that
    /// touches a removed node, as one step. Returns how many nodes went.
    pub fn remove_nodes<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        let removed = self.graph.remove_nodes(ids);
        if removed.is_empty() {
            return 0;
        }
        if self.selected_node.is_some_and(|s| removed.contains(&s)) {
            self.selected_node = None;
        }
        if self.highlighted.is_some_and(|h| removed.contains(&h)) {
            self.highlighted = None;
        }
        log::debug!("removed {} node(s)", removed.len());
        self.touch();
        removed.len()
    }

    /// Set the node shown in the detail panel. Unknown ids are rejected.
    pub fn set_selected_node(&mut self, id: Option<NodeId>) -> bool {
        if let Some(id) = id
            && !self.graph.contains(id)
        {
            return false;
        }
        self.selected_node = id;
        true
    }

    pub fn set_highlighted_node(&mut self, id: Option<NodeId>) -> bool {
        if let Some(id) = id
            && !self.graph.contains(id)
        {
            return false;
        }
        self.highlighted = id;
        true
    }

    /// Attach `child` to `parent` (or detach it with `None`) and store
    /// `position` verbatim: parent-relative when attaching, absolute when
    /// detaching. Invalid containment is rejected before anything changes.
    pub fn set_node_parent(
        &mut self,
        child: NodeId,
        parent: Option<NodeId>,
        position: Position,
    ) -> bool {
        if !self.place(child, parent, position) {
            return false;
        }
        self.touch();
        true
    }

    /// `set_node_parent` without the revision bump, for compound operations.
    pub(crate) fn place(&mut self, child: NodeId, parent: Option<NodeId>, position: Position) -> bool {
        if !self.graph.set_parent(child, parent) {
            return false;
        }
        if let Some(node) = self.graph.get_mut(child) {
            node.position = position;
        }
        true
    }

    /// Set a container's explicit size verbatim. Leaves keep the default
    /// footprint; see `resize_container` for a resize that respects the grid.
    pub fn resize_node(&mut self, id: NodeId, size: Size) -> bool {
        let Some(node) = self.graph.get_mut(id).filter(|n| n.is_container()) else {
            return false;
        };
        node.size = Some(size);
        self.touch();
        true
    }

    /// Manually resize a container. The size is clamped so every current
    /// child still gets a slot, and the children are re-laid onto the
    /// resulting grid. Returns the size actually applied.
    pub fn resize_container(&mut self, id: NodeId, size: Size) -> Option<Size> {
        if !self.graph.get(id)?.is_container() {
            return None;
        }
        let children = self.grid_children(id, None);
        let cols = self.grid.columns(size);
        let needed = self.grid.required_container_size(children.len(), cols);
        let applied = Size::new(size.width.max(needed.width), size.height.max(needed.height));

        let placement = self.grid.redistribute(&children, applied);
        for (child, position) in placement {
            if let Some(node) = self.graph.get_mut(child) {
                node.position = position;
            }
        }
        if let Some(node) = self.graph.get_mut(id) {
            node.size = Some(applied);
        }
        log::debug!(
            "resized container {id} to {}x{} ({} children)",
            applied.width,
            applied.height,
            children.len()
        );
        self.touch();
        Some(applied)
    }

    /// Apply node patches from the canvas widget. Patches naming unknown
    /// nodes are skipped. Returns how many were applied.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) -> usize {
        let mut applied = 0;
        for change in changes {
            let ok = match change {
                NodeChange::Position { id, position } => match self.graph.get_mut(*id) {
                    Some(node) => {
                        node.position = *position;
                        true
                    }
                    None => false,
                },
                NodeChange::Select { id, selected } => match self.graph.get_mut(*id) {
                    Some(node) => {
                        node.selected = *selected;
                        true
                    }
                    None => false,
                },
                NodeChange::Dimensions { id, size } => match self.graph.get_mut(*id) {
                    Some(node) => {
                        node.size = Some(*size);
                        true
                    }
                    None => false,
                },
                NodeChange::Remove { id } => {
                    let removed = self.graph.remove_nodes([*id]);
                    if self.selected_node.is_some_and(|s| removed.contains(&s)) {
                        self.selected_node = None;
                    }
                    if self.highlighted.is_some_and(|h| removed.contains(&h)) {
                        self.highlighted = None;
                    }
                    !removed.is_empty()
                }
            };
            if ok {
                applied += 1;
            }
        }
        if applied > 0 {
            self.touch();
        }
        applied
    }

    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) -> usize {
        let mut applied = 0;
        for change in changes {
            let ok = match change {
                EdgeChange::Select { id, selected } => match self.graph.edge_mut(*id) {
                    Some(edge) => {
                        edge.selected = *selected;
                        true
                    }
                    None => false,
                },
                EdgeChange::Remove { id } => self.graph.remove_edge(*id),
            };
            if ok {
                applied += 1;
            }
        }
        if applied > 0 {
            self.touch();
        }
        applied
    }

    // ─── Edges ───────────────────────────────────────────────────────────

    /// Connect `source` → `target`. Repeating a connection returns the
    /// existing edge.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        if !self.graph.contains(source) || !self.graph.contains(target) {
            return None;
        }
        if let Some(existing) = self.graph.find_edge(source, target) {
            return Some(existing.id);
        }
        let id = NodeId::generate("edge");
        if !self.graph.add_edge(FlowEdge::new(id, source, target)) {
            return None;
        }
        log::debug!("connected {source} -> {target}");
        self.touch();
        Some(id)
    }

    /// Append a named action to an edge. Blank labels are ignored.
    pub fn add_edge_action(&mut self, edge: EdgeId, label: &str) -> Option<NodeId> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let e = self.graph.edge_mut(edge)?;
        let id = NodeId::generate("action");
        e.actions.push(EdgeAction {
            id,
            label: label.to_string(),
        });
        self.touch();
        Some(id)
    }

    pub fn rename_edge_action(&mut self, edge: EdgeId, action: NodeId, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        let Some(a) = self
            .graph
            .edge_mut(edge)
            .and_then(|e| e.actions.iter_mut().find(|a| a.id == action))
        else {
            return false;
        };
        a.label = label.to_string();
        self.touch();
        true
    }

    pub fn remove_edge_action(&mut self, edge: EdgeId, action: NodeId) -> bool {
        let Some(e) = self.graph.edge_mut(edge) else {
            return false;
        };
        let before = e.actions.len();
        e.actions.retain(|a| a.id != action);
        if e.actions.len() == before {
            return false;
        }
        self.touch();
        true
    }

    // ─── Selection flags ─────────────────────────────────────────────────

    pub fn select_all(&mut self) {
        let ids = self.graph.node_ids().to_vec();
        for id in ids {
            if let Some(node) = self.graph.get_mut(id) {
                node.selected = true;
            }
        }
        self.touch();
    }

    /// Clear node and edge selection, and the detail-panel node.
    pub fn deselect_all(&mut self) {
        let ids = self.graph.node_ids().to_vec();
        for id in ids {
            if let Some(node) = self.graph.get_mut(id) {
                node.selected = false;
            }
        }
        let edge_ids: Vec<EdgeId> = self.graph.edges().iter().map(|e| e.id).collect();
        for id in edge_ids {
            if let Some(edge) = self.graph.edge_mut(id) {
                edge.selected = false;
            }
        }
        self.selected_node = None;
        self.touch();
    }

    // ─── Drag and drop from the palette ──────────────────────────────────

    /// Create a node from a palette payload at `position` (canvas
    /// coordinates). Returns the new node's id.
    pub fn drop_payload(&mut self, payload: DndPayload, position: Position) -> Option<NodeId> {
        let id = NodeId::generate(&payload.node_type);
        let node = payload.into_node(id, position)?;
        self.add_node(node).then_some(id)
    }

    // ─── Save / load ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> CanvasSnapshot {
        self.graph.to_snapshot()
    }

    /// Replace the whole canvas. On error the current canvas is kept.
    pub fn load(&mut self, snapshot: &CanvasSnapshot) -> Result<(), SnapshotError> {
        let graph = CanvasGraph::from_snapshot(snapshot)?;
        self.graph = graph;
        self.selected_node = None;
        self.highlighted = None;
        self.touch();
        Ok(())
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new()
    }
}
