//! Core canvas data model for blueprint documents.
//!
//! Nodes live in a `StableDiGraph` whose edges are parent→child containment
//! links, so containment is always a forest. Behavioural connections between
//! nodes (`FlowEdge`) are kept in a separate list and carry no containment
//! meaning. A node's `position` is relative to its parent's origin when it
//! has a parent, and absolute otherwise.

use crate::catalog::WidgetCategory;
use crate::id::{EdgeId, NodeId};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::{Add, Sub};

// ─── Geometry ────────────────────────────────────────────────────────────

/// A 2D point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ZERO: Position = Position::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Footprint of a leaf node that has no explicit size.
pub const DEFAULT_NODE_SIZE: Size = Size::new(288.0, 100.0);

/// Footprint of a container node that has no explicit size.
/// Also the smallest size the grid ever gives a container.
pub const DEFAULT_CONTAINER_SIZE: Size = Size::new(320.0, 180.0);

/// Absolute axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(origin: Position, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// AABB overlap with a non-zero area. Touching edges do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

// ─── Node data ───────────────────────────────────────────────────────────

/// Label a freshly created page node carries until the user renames it.
pub const DEFAULT_PAGE_LABEL: &str = "New screen";
/// Label a freshly created component node carries until the user renames it.
pub const DEFAULT_COMPONENT_LABEL: &str = "New component";
pub const DEFAULT_FUNCTION_LABEL: &str = "New function";
pub const DEFAULT_DATA_LABEL: &str = "Select data";

/// A binding from a node to a table of the static data schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableBinding {
    pub table: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
}

impl TableBinding {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }
}

/// What a node represents. Determines editing affordances and whether the
/// node may contain other nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "camelCase")]
pub enum NodeKind {
    /// A screen of the application.
    Page,
    /// A UI component; hosts child nodes on a grid.
    Component {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    /// A behaviour (function/action) leaf.
    Function {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    /// A data node, meaningful once bound to a table.
    Data,
    /// A widget from the widget registry.
    #[serde(rename = "muiComponent")]
    Widget {
        widget: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<WidgetCategory>,
        #[serde(default)]
        container: bool,
    },
}

impl NodeKind {
    /// Whether nodes of this kind may act as a parent.
    pub fn is_container(&self) -> bool {
        match self {
            NodeKind::Component { .. } => true,
            NodeKind::Widget { container, .. } => *container,
            NodeKind::Page | NodeKind::Function { .. } | NodeKind::Data => false,
        }
    }

    /// Attached code, for the kinds that carry any.
    pub fn code(&self) -> Option<&str> {
        match self {
            NodeKind::Component { code } | NodeKind::Function { code } => code.as_deref(),
            NodeKind::Page | NodeKind::Data | NodeKind::Widget { .. } => None,
        }
    }

    /// The wire tag (`nodeType`) of this kind.
    pub fn type_tag(&self) -> &'static str {
        match self {
            NodeKind::Page => "page",
            NodeKind::Component { .. } => "component",
            NodeKind::Function { .. } => "function",
            NodeKind::Data => "data",
            NodeKind::Widget { .. } => "muiComponent",
        }
    }

    /// The label the system assigns when a node of this kind is created.
    pub fn default_label(&self) -> Option<&'static str> {
        match self {
            NodeKind::Page => Some(DEFAULT_PAGE_LABEL),
            NodeKind::Component { .. } => Some(DEFAULT_COMPONENT_LABEL),
            NodeKind::Function { .. } => Some(DEFAULT_FUNCTION_LABEL),
            NodeKind::Data => Some(DEFAULT_DATA_LABEL),
            NodeKind::Widget { .. } => None,
        }
    }
}

/// User-editable attributes of a node. Label, description and the optional
/// table binding are common to every kind; the rest lives in `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<TableBinding>,
    pub kind: NodeKind,
}

impl NodeData {
    pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            binding: None,
            kind,
        }
    }

    pub fn page() -> Self {
        Self::new(DEFAULT_PAGE_LABEL, NodeKind::Page)
    }

    pub fn component() -> Self {
        Self::new(DEFAULT_COMPONENT_LABEL, NodeKind::Component { code: None })
    }

    pub fn function() -> Self {
        Self::new(DEFAULT_FUNCTION_LABEL, NodeKind::Function { code: None })
    }

    pub fn data() -> Self {
        Self::new(DEFAULT_DATA_LABEL, NodeKind::Data)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_binding(mut self, binding: TableBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Shallow-merge a patch. `code` is ignored for kinds without code.
    pub fn apply(&mut self, patch: &NodePatch) {
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(binding) = &patch.binding {
            self.binding = binding.clone();
        }
        if let Some(new_code) = &patch.code {
            match &mut self.kind {
                NodeKind::Component { code } | NodeKind::Function { code } => {
                    *code = new_code.clone();
                }
                NodeKind::Page | NodeKind::Data | NodeKind::Widget { .. } => {}
            }
        }
    }
}

/// A partial update to `NodeData`. `None` leaves a field untouched; for the
/// optional fields, `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub binding: Option<Option<TableBinding>>,
    pub code: Option<Option<String>>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }
}

// ─── Canvas nodes ────────────────────────────────────────────────────────

/// A single vertex on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: NodeId,
    pub data: NodeData,
    /// Parent-relative when the node has a parent, absolute otherwise.
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub selected: bool,
    /// Kept inside the parent's extent while dragged. Set iff parented.
    #[serde(default)]
    pub bound_to_parent: bool,
}

impl CanvasNode {
    pub fn new(id: NodeId, data: NodeData) -> Self {
        Self {
            id,
            data,
            position: Position::ZERO,
            size: None,
            selected: false,
            bound_to_parent: false,
        }
    }

    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn is_container(&self) -> bool {
        self.data.kind.is_container()
    }

    /// Size used for hit testing: the explicit size, or a per-kind default.
    pub fn footprint(&self) -> Size {
        match self.size {
            Some(size) => size,
            None if self.is_container() => DEFAULT_CONTAINER_SIZE,
            None => DEFAULT_NODE_SIZE,
        }
    }
}

// ─── Flow edges ──────────────────────────────────────────────────────────

/// A named action attached to a flow edge (e.g. "on submit").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAction {
    pub id: NodeId,
    pub label: String,
}

/// A directed behavioural/navigational connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub actions: SmallVec<[EdgeAction; 2]>,
}

impl FlowEdge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            selected: false,
            actions: SmallVec::new(),
        }
    }

    /// Whether `node` is either endpoint.
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }
}

// ─── Canvas graph ────────────────────────────────────────────────────────

/// The complete canvas: nodes, containment forest and flow edges.
///
/// Graph edges go from parent → child. Nodes are additionally kept in
/// canvas (insertion) order, which every "first match" rule relies on.
#[derive(Debug, Clone)]
pub struct CanvasGraph {
    graph: StableDiGraph<CanvasNode, ()>,
    id_index: HashMap<NodeId, NodeIndex>,
    /// Canvas order of node ids.
    order: Vec<NodeId>,
    /// Insertion sequence per node, for ordering child lists.
    seq: HashMap<NodeId, u64>,
    next_seq: u64,
    edges: Vec<FlowEdge>,
}

impl CanvasGraph {
    /// Create an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            id_index: HashMap::new(),
            order: Vec::new(),
            seq: HashMap::new(),
            next_seq: 0,
            edges: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Get the index for a NodeId.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Look up a node by id.
    pub fn get(&self, id: NodeId) -> Option<&CanvasNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Look up a node mutably by id. Structure (parent, membership) can only
    /// be changed through the graph's own methods.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CanvasNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Nodes in canvas order.
    pub fn nodes(&self) -> impl Iterator<Item = &CanvasNode> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Node ids in canvas order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Append a top-level node. Returns `None` (and changes nothing) if a
    /// node with the same id already exists.
    pub fn add_node(&mut self, mut node: CanvasNode) -> Option<NodeIndex> {
        let id = node.id;
        if self.id_index.contains_key(&id) {
            log::warn!("add_node: duplicate id {id}, ignored");
            return None;
        }
        node.bound_to_parent = false;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        self.order.push(id);
        self.seq.insert(id, self.next_seq);
        self.next_seq += 1;
        Some(idx)
    }

    /// Get the parent id of a node.
    pub fn parent_id(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.index_of(id)?;
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .map(|p| self.graph[p].id)
    }

    /// Direct children of a node, in canvas order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        let mut children: Vec<NodeId> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|c| self.graph[c].id)
            .collect();
        children.sort_by_key(|c| self.seq.get(c).copied().unwrap_or(u64::MAX));
        children
    }

    /// Check if `ancestor` is a parent/grandparent/etc. of `descendant`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        if ancestor == descendant {
            return false;
        }
        let mut current = descendant;
        let mut steps = 0;
        while let Some(parent) = self.parent_id(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
            steps += 1;
            debug_assert!(steps <= self.len(), "cycle in parent chain at {current}");
            if steps > self.len() {
                break;
            }
        }
        false
    }

    /// Whether `parent` may become the parent of `child`: both exist, they
    /// differ, the parent is container-capable and not inside the child.
    pub fn can_contain(&self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(child) {
            return false;
        }
        match self.get(parent) {
            Some(p) => p.is_container() && !self.is_ancestor_of(child, parent),
            None => false,
        }
    }

    /// Attach `child` to `parent`, or detach it with `None`. Updates the
    /// `bound_to_parent` tag; positions are the caller's concern.
    /// Returns false, without mutating, for invalid containment.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> bool {
        let Some(child_idx) = self.index_of(child) else {
            return false;
        };
        let new_parent_idx = match parent {
            Some(p) => {
                if !self.can_contain(p, child) {
                    log::warn!("set_parent: {p} cannot contain {child}");
                    return false;
                }
                self.index_of(p)
            }
            None => None,
        };

        let old_links: Vec<_> = self
            .graph
            .edges_directed(child_idx, Direction::Incoming)
            .map(|e| petgraph::visit::EdgeRef::id(&e))
            .collect();
        for link in old_links {
            self.graph.remove_edge(link);
        }
        if let Some(p_idx) = new_parent_idx {
            self.graph.add_edge(p_idx, child_idx, ());
        }
        self.graph[child_idx].bound_to_parent = new_parent_idx.is_some();

        debug_assert!(self.is_forest(), "containment is no longer a forest");
        true
    }

    /// Transitive closure of `roots` over containment: the roots that exist
    /// plus every descendant, in breadth-first discovery order.
    pub fn descendants<I>(&self, roots: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut out = Vec::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();

        for id in roots {
            if let Some(idx) = self.index_of(id)
                && seen.insert(id)
            {
                out.push(id);
                queue.push_back(idx);
            }
        }
        while let Some(idx) = queue.pop_front() {
            for child_idx in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                let child = self.graph[child_idx].id;
                if seen.insert(child) {
                    out.push(child);
                    queue.push_back(child_idx);
                }
            }
        }
        out
    }

    /// Remove the given nodes, all of their descendants and every flow edge
    /// touching a removed node. Returns the removed ids.
    pub fn remove_nodes<I>(&mut self, ids: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let doomed = self.descendants(ids);
        if doomed.is_empty() {
            return doomed;
        }
        let doomed_set: HashSet<NodeId> = doomed.iter().copied().collect();
        for id in &doomed {
            if let Some(idx) = self.id_index.remove(id) {
                self.graph.remove_node(idx);
            }
            self.seq.remove(id);
        }
        self.order.retain(|id| !doomed_set.contains(id));
        self.edges
            .retain(|e| !doomed_set.contains(&e.source) && !doomed_set.contains(&e.target));
        doomed
    }

    /// Absolute position: the node's position plus those of all ancestors.
    pub fn absolute_position(&self, id: NodeId) -> Option<Position> {
        let mut pos = self.get(id)?.position;
        let mut current = id;
        let mut steps = 0;
        while let Some(parent) = self.parent_id(current) {
            pos = pos + self.get(parent)?.position;
            current = parent;
            steps += 1;
            if steps > self.len() {
                debug_assert!(false, "cycle in parent chain at {current}");
                break;
            }
        }
        Some(pos)
    }

    /// Absolute bounding box of a node.
    pub fn absolute_bounds(&self, id: NodeId) -> Option<Bounds> {
        let node = self.get(id)?;
        Some(Bounds::new(self.absolute_position(id)?, node.footprint()))
    }

    /// True when every node has at most one parent and there is no cycle.
    pub fn is_forest(&self) -> bool {
        let single_parent = self.graph.node_indices().all(|idx| {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .count()
                <= 1
        });
        single_parent && !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    // ─── Flow edges ──────────────────────────────────────────────────────

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut FlowEdge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// The first edge from `source` to `target`, if any.
    pub fn find_edge(&self, source: NodeId, target: NodeId) -> Option<&FlowEdge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    /// Append a flow edge. Rejected if an endpoint is missing or the id is
    /// already used.
    pub fn add_edge(&mut self, edge: FlowEdge) -> bool {
        if !self.contains(edge.source) || !self.contains(edge.target) {
            log::warn!("add_edge: {} has a missing endpoint", edge.id);
            return false;
        }
        if self.edge(edge.id).is_some() {
            log::warn!("add_edge: duplicate edge id {}", edge.id);
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        self.edges.len() != before
    }

    /// Whether any flow edge touches `id`.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.edges.iter().any(|e| e.touches(id))
    }
}

impl Default for CanvasGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> CanvasNode {
        CanvasNode::new(NodeId::intern(id), NodeData::page())
    }

    fn container(id: &str) -> CanvasNode {
        CanvasNode::new(NodeId::intern(id), NodeData::component())
            .with_size(DEFAULT_CONTAINER_SIZE)
    }

    #[test]
    fn canvas_graph_basics() {
        let mut g = CanvasGraph::new();
        g.add_node(leaf("m_a"));
        g.add_node(leaf("m_b"));

        assert_eq!(g.len(), 2);
        assert!(g.get(NodeId::intern("m_a")).is_some());
        let ids: Vec<&str> = g.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["m_a", "m_b"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut g = CanvasGraph::new();
        assert!(g.add_node(leaf("m_dup")).is_some());
        assert!(g.add_node(leaf("m_dup")).is_none());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn set_parent_rejects_invalid_containment() {
        let mut g = CanvasGraph::new();
        g.add_node(container("m_box"));
        g.add_node(leaf("m_page"));
        g.add_node(leaf("m_other"));
        let bx = NodeId::intern("m_box");
        let page = NodeId::intern("m_page");
        let other = NodeId::intern("m_other");

        // Self-parenting
        assert!(!g.set_parent(bx, Some(bx)));
        // Non-container parent
        assert!(!g.set_parent(other, Some(page)));
        // Missing parent
        assert!(!g.set_parent(page, Some(NodeId::intern("m_missing"))));
        assert_eq!(g.parent_id(page), None);

        assert!(g.set_parent(page, Some(bx)));
        assert_eq!(g.parent_id(page), Some(bx));
        assert!(g.get(page).unwrap().bound_to_parent);

        assert!(g.set_parent(page, None));
        assert_eq!(g.parent_id(page), None);
        assert!(!g.get(page).unwrap().bound_to_parent);
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut g = CanvasGraph::new();
        g.add_node(container("m_outer"));
        g.add_node(container("m_inner"));
        let outer = NodeId::intern("m_outer");
        let inner = NodeId::intern("m_inner");

        assert!(g.set_parent(inner, Some(outer)));
        assert!(!g.set_parent(outer, Some(inner)));
        assert!(g.is_forest());
        assert!(g.is_ancestor_of(outer, inner));
        assert!(!g.is_ancestor_of(inner, outer));
    }

    #[test]
    fn reparent_keeps_a_single_parent() {
        let mut g = CanvasGraph::new();
        g.add_node(container("m_p1"));
        g.add_node(container("m_p2"));
        g.add_node(leaf("m_kid"));
        let kid = NodeId::intern("m_kid");

        assert!(g.set_parent(kid, Some(NodeId::intern("m_p1"))));
        assert!(g.set_parent(kid, Some(NodeId::intern("m_p2"))));
        assert_eq!(g.parent_id(kid), Some(NodeId::intern("m_p2")));
        assert!(g.children(NodeId::intern("m_p1")).is_empty());
        assert!(g.is_forest());
    }

    #[test]
    fn remove_cascades_to_descendants_and_edges() {
        let mut g = CanvasGraph::new();
        g.add_node(container("m_root_c"));
        g.add_node(container("m_mid_c"));
        g.add_node(leaf("m_deep"));
        g.add_node(leaf("m_free"));
        let root = NodeId::intern("m_root_c");
        let mid = NodeId::intern("m_mid_c");
        let deep = NodeId::intern("m_deep");
        let free = NodeId::intern("m_free");
        g.set_parent(mid, Some(root));
        g.set_parent(deep, Some(mid));
        assert!(g.add_edge(FlowEdge::new(NodeId::intern("m_e1"), deep, free)));
        assert!(g.add_edge(FlowEdge::new(NodeId::intern("m_e2"), free, free)));

        let removed = g.remove_nodes([root]);
        assert_eq!(removed, vec![root, mid, deep]);
        assert_eq!(g.len(), 1);
        assert!(g.contains(free));
        assert_eq!(g.edges().len(), 1);
        assert!(g.edges().iter().all(|e| g.contains(e.source) && g.contains(e.target)));
    }

    #[test]
    fn absolute_position_sums_the_parent_chain() {
        let mut g = CanvasGraph::new();
        g.add_node(container("m_abs_outer").at(Position::new(100.0, 100.0)));
        g.add_node(container("m_abs_inner").at(Position::new(10.0, 20.0)));
        g.add_node(leaf("m_abs_leaf").at(Position::new(1.0, 2.0)));
        let outer = NodeId::intern("m_abs_outer");
        let inner = NodeId::intern("m_abs_inner");
        let l = NodeId::intern("m_abs_leaf");
        g.set_parent(inner, Some(outer));
        g.set_parent(l, Some(inner));

        assert_eq!(g.absolute_position(l), Some(Position::new(111.0, 122.0)));
        let b = g.absolute_bounds(l).unwrap();
        assert_eq!(b.width, DEFAULT_NODE_SIZE.width);
    }

    #[test]
    fn add_edge_requires_both_endpoints() {
        let mut g = CanvasGraph::new();
        g.add_node(leaf("m_src"));
        let src = NodeId::intern("m_src");
        assert!(!g.add_edge(FlowEdge::new(
            NodeId::intern("m_dangling"),
            src,
            NodeId::intern("m_nowhere")
        )));
        assert!(g.edges().is_empty());
    }

    #[test]
    fn bounds_intersection_excludes_touching_edges() {
        let a = Bounds::new(Position::ZERO, Size::new(10.0, 10.0));
        let b = Bounds::new(Position::new(10.0, 0.0), Size::new(10.0, 10.0));
        let c = Bounds::new(Position::new(5.0, 5.0), Size::new(10.0, 10.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(a.contains(5.0, 5.0));
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let mut data = NodeData::component().with_description("card");
        data.apply(&NodePatch {
            code: Some(Some("fn card() {}".into())),
            ..Default::default()
        });
        assert_eq!(data.description, "card");
        assert_eq!(data.kind.code(), Some("fn card() {}"));

        let mut page = NodeData::page();
        page.apply(&NodePatch {
            code: Some(Some("ignored".into())),
            label: Some("Login".into()),
            ..Default::default()
        });
        assert_eq!(page.label, "Login");
        assert_eq!(page.kind.code(), None);
    }
}
