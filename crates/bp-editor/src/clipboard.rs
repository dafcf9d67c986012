//! Copy/paste of the selection.
//!
//! Copy snapshots the selected nodes, all of their descendants and the edges
//! running between copied nodes. Paste inserts a fresh copy of that snapshot
//! with new ids, shifted by [`PASTE_OFFSET`], and makes it the selection.
//! The clipboard survives pastes and project switches.

use crate::store::CanvasStore;
use bp_core::id::{NodeId, now_millis};
use bp_core::model::{CanvasNode, FlowEdge, Position};
use std::collections::{HashMap, HashSet};

/// Offset applied to every pasted node.
pub const PASTE_OFFSET: Position = Position::new(50.0, 50.0);

#[derive(Debug, Clone)]
struct ClipNode {
    node: CanvasNode,
    parent: Option<NodeId>,
}

/// Immutable snapshot taken at copy time.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    nodes: Vec<ClipNode>,
    edges: Vec<FlowEdge>,
}

impl Clipboard {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl CanvasStore {
    /// Copy the selection and its descendants. An empty selection leaves
    /// the clipboard as it was. Returns the number of nodes copied.
    pub fn copy_selection(&mut self) -> usize {
        let selected = self.selection();
        if selected.is_empty() {
            return 0;
        }
        let closure: HashSet<NodeId> = self.graph.descendants(selected).into_iter().collect();

        // Nodes whose parent stays behind are captured in canvas coordinates.
        let nodes: Vec<ClipNode> = self
            .graph
            .nodes()
            .filter(|n| closure.contains(&n.id))
            .map(|n| {
                let mut node = n.clone();
                let parent = self.graph.parent_id(n.id).filter(|p| closure.contains(p));
                if parent.is_none() {
                    node.position = self.graph.absolute_position(n.id).unwrap_or(n.position);
                    node.bound_to_parent = false;
                }
                ClipNode { node, parent }
            })
            .collect();
        let edges: Vec<FlowEdge> = self
            .graph
            .edges()
            .iter()
            .filter(|e| closure.contains(&e.source) && closure.contains(&e.target))
            .cloned()
            .collect();

        log::debug!("copied {} node(s), {} edge(s)", nodes.len(), edges.len());
        let count = nodes.len();
        self.clipboard = Some(Clipboard { nodes, edges });
        count
    }

    /// Paste the clipboard. Existing nodes are deselected and the pasted
    /// ones become the selection. Returns the new ids in clipboard order.
    pub fn paste(&mut self) -> Vec<NodeId> {
        let Some(clip) = self.clipboard.clone().filter(|c| !c.is_empty()) else {
            return Vec::new();
        };

        let stamp = self.next_paste_stamp(&clip);
        let id_map: HashMap<NodeId, NodeId> = clip
            .nodes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.node.id, NodeId::derive_copy(c.node.id, stamp, i)))
            .collect();

        let existing = self.graph.node_ids().to_vec();
        for id in existing {
            if let Some(node) = self.graph.get_mut(id) {
                node.selected = false;
            }
        }

        let mut pasted = Vec::with_capacity(clip.nodes.len());
        for entry in &clip.nodes {
            let Some(&new_id) = id_map.get(&entry.node.id) else {
                continue;
            };
            let mut node = entry.node.clone();
            node.id = new_id;
            node.position = node.position + PASTE_OFFSET;
            node.selected = true;
            if self.graph.add_node(node).is_some() {
                pasted.push(new_id);
            }
        }

        // Parents are linked once every copy exists.
        for entry in &clip.nodes {
            let Some(parent) = entry.parent.and_then(|p| id_map.get(&p).copied()) else {
                continue;
            };
            if let Some(&child) = id_map.get(&entry.node.id) {
                self.graph.set_parent(child, Some(parent));
            }
        }

        for edge in &clip.edges {
            let (Some(&source), Some(&target)) = (id_map.get(&edge.source), id_map.get(&edge.target))
            else {
                continue;
            };
            let mut copy = edge.clone();
            copy.id = NodeId::generate("edge");
            copy.source = source;
            copy.target = target;
            copy.selected = false;
            self.graph.add_edge(copy);
        }

        log::debug!("pasted {} node(s) with stamp {stamp}", pasted.len());
        self.touch();
        pasted
    }

    /// A stamp larger than any used before whose derived ids are all free.
    fn next_paste_stamp(&mut self, clip: &Clipboard) -> u64 {
        let mut stamp = now_millis().max(self.last_paste_stamp + 1);
        while clip
            .nodes
            .iter()
            .enumerate()
            .any(|(i, c)| self.graph.contains(NodeId::derive_copy(c.node.id, stamp, i)))
        {
            stamp += 1;
        }
        self.last_paste_stamp = stamp;
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NodeChange;
    use bp_core::model::{NodeData, Size};

    fn select(store: &mut CanvasStore, ids: &[NodeId]) {
        let changes: Vec<_> = ids
            .iter()
            .map(|id| NodeChange::Select {
                id: *id,
                selected: true,
            })
            .collect();
        store.apply_node_changes(&changes);
    }

    #[test]
    fn copy_with_nothing_selected_keeps_the_clipboard() {
        let mut store = CanvasStore::new();
        let a = NodeId::intern("cb_keep");
        store.add_node(CanvasNode::new(a, NodeData::page()));
        select(&mut store, &[a]);
        assert_eq!(store.copy_selection(), 1);

        store.deselect_all();
        assert_eq!(store.copy_selection(), 0);
        assert!(store.has_clipboard());
    }

    #[test]
    fn paste_without_clipboard_does_nothing() {
        let mut store = CanvasStore::new();
        let rev = store.revision();
        assert!(store.paste().is_empty());
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn copy_includes_descendants_and_keeps_structure() {
        let mut store = CanvasStore::new();
        let parent = NodeId::intern("cb_card");
        let child = NodeId::intern("cb_title");
        store.add_node(
            CanvasNode::new(parent, NodeData::component())
                .at(Position::new(100.0, 100.0))
                .with_size(Size::new(320.0, 187.0)),
        );
        store.add_node(CanvasNode::new(child, NodeData::page()));
        store.set_node_parent(child, Some(parent), Position::new(12.0, 75.0));
        select(&mut store, &[parent]);

        assert_eq!(store.copy_selection(), 2);
        let pasted = store.paste();
        assert_eq!(pasted.len(), 2);

        let new_parent = pasted[0];
        let new_child = pasted[1];
        assert_eq!(store.parent_of(new_child), Some(new_parent));
        assert!(store.node(new_child).unwrap().bound_to_parent);
        assert_eq!(
            store.node(new_parent).unwrap().position,
            Position::new(150.0, 150.0)
        );
        assert_eq!(store.selection(), pasted);
    }

    #[test]
    fn copied_child_without_its_parent_becomes_top_level() {
        let mut store = CanvasStore::new();
        let parent = NodeId::intern("cb_frame");
        let child = NodeId::intern("cb_orphan");
        store.add_node(CanvasNode::new(parent, NodeData::component()));
        store.add_node(CanvasNode::new(child, NodeData::page()));
        store.set_node_parent(child, Some(parent), Position::new(12.0, 75.0));
        select(&mut store, &[child]);

        store.copy_selection();
        let pasted = store.paste();
        assert_eq!(pasted.len(), 1);
        assert_eq!(store.parent_of(pasted[0]), None);
        assert!(!store.node(pasted[0]).unwrap().bound_to_parent);
    }

    #[test]
    fn orphaned_child_keeps_its_place_relative_to_the_group() {
        let mut store = CanvasStore::new();
        let card = NodeId::intern("cb_mixed_card");
        let child = NodeId::intern("cb_mixed_child");
        let page = NodeId::intern("cb_mixed_page");
        store.add_node(
            CanvasNode::new(card, NodeData::component())
                .at(Position::new(400.0, 300.0))
                .with_size(Size::new(320.0, 187.0)),
        );
        store.add_node(CanvasNode::new(child, NodeData::page()));
        store.set_node_parent(child, Some(card), Position::new(12.0, 75.0));
        store.add_node(CanvasNode::new(page, NodeData::page()).at(Position::new(0.0, 0.0)));
        select(&mut store, &[child, page]);

        store.copy_selection();
        let pasted = store.paste();
        assert_eq!(pasted.len(), 2);

        // Canvas order: the child was added before the page
        let (new_child, new_page) = (pasted[0], pasted[1]);
        assert_eq!(store.parent_of(new_child), None);
        assert_eq!(
            store.graph().absolute_position(new_child),
            Some(Position::new(412.0, 375.0) + PASTE_OFFSET)
        );
        assert_eq!(
            store.graph().absolute_position(new_page),
            Some(Position::ZERO + PASTE_OFFSET)
        );
        // The source child is untouched
        assert_eq!(store.node(child).unwrap().position, Position::new(12.0, 75.0));
    }

    #[test]
    fn repeated_pastes_get_distinct_ids() {
        let mut store = CanvasStore::new();
        let a = NodeId::intern("cb_twice");
        store.add_node(CanvasNode::new(a, NodeData::page()));
        select(&mut store, &[a]);
        store.copy_selection();

        let first = store.paste();
        let second = store.paste();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_ne!(first[0], second[0]);
        assert_eq!(store.nodes().count(), 3);
        assert_eq!(store.selection(), second);
    }
}
