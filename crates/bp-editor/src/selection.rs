//! Bulk deletion of the selected nodes.
//!
//! Deleting only empty nodes happens immediately. If any selected node holds
//! user content, the caller gets a plan with the counts to show in a
//! confirmation prompt, and commits it with `confirm_delete`.

use crate::store::CanvasStore;
use bp_core::classify::partition;
use bp_core::id::NodeId;

/// A pending bulk delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    /// Directly selected nodes, in canvas order.
    pub selected: Vec<NodeId>,
    /// Everything that goes: the selection plus all descendants.
    pub cascade: Vec<NodeId>,
    /// Selected nodes that carry user content.
    pub meaningful: Vec<NodeId>,
}

impl DeletePlan {
    pub fn needs_confirmation(&self) -> bool {
        !self.meaningful.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn meaningful_count(&self) -> usize {
        self.meaningful.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Nothing was selected.
    Nothing,
    /// Deleted this many nodes, descendants included.
    Deleted(usize),
    /// Some selected nodes hold content; ask before calling `confirm_delete`.
    NeedsConfirmation(DeletePlan),
}

impl CanvasStore {
    /// Describe what deleting the current selection would do. Only the
    /// directly selected nodes are classified.
    pub fn plan_delete(&self) -> Option<DeletePlan> {
        let selected = self.selection();
        if selected.is_empty() {
            return None;
        }
        let nodes = selected.iter().filter_map(|id| self.graph.get(*id));
        let parts = partition(nodes, self.graph.edges());
        let cascade = self.graph.descendants(selected.iter().copied());
        Some(DeletePlan {
            selected,
            cascade,
            meaningful: parts.meaningful,
        })
    }

    /// Delete the selection right away when it is all empty nodes.
    pub fn delete_selection(&mut self) -> DeleteOutcome {
        match self.plan_delete() {
            None => DeleteOutcome::Nothing,
            Some(plan) if plan.needs_confirmation() => {
                log::debug!(
                    "delete needs confirmation: {} of {} selected hold content",
                    plan.meaningful_count(),
                    plan.selected_count()
                );
                DeleteOutcome::NeedsConfirmation(plan)
            }
            Some(plan) => DeleteOutcome::Deleted(self.remove_nodes(plan.selected)),
        }
    }

    /// Commit a plan. Nodes that disappeared since planning are skipped.
    pub fn confirm_delete(&mut self, plan: &DeletePlan) -> usize {
        self.remove_nodes(plan.selected.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NodeChange;
    use bp_core::model::{CanvasNode, NodeData, Position};

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
    fn nothing_selected_is_a_no_op() {
        let mut store = CanvasStore::new();
        store.add_node(CanvasNode::new(NodeId::intern("sel_idle"), NodeData::page()));
        let rev = store.revision();
        assert_eq!(store.delete_selection(), DeleteOutcome::Nothing);
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn empty_nodes_are_deleted_immediately() {
        let mut store = CanvasStore::new();
        let a = NodeId::intern("sel_a");
        let b = NodeId::intern("sel_b");
        store.add_node(CanvasNode::new(a, NodeData::page()));
        store.add_node(CanvasNode::new(b, NodeData::function()).at(Position::new(0.0, 200.0)));
        select(&mut store, &[a, b]);

        assert_eq!(store.delete_selection(), DeleteOutcome::Deleted(2));
        assert_eq!(store.nodes().count(), 0);
    }

    #[test]
    fn content_requires_confirmation() {
        let mut store = CanvasStore::new();
        let plain = NodeId::intern("sel_plain");
        let described = NodeId::intern("sel_described");
        store.add_node(CanvasNode::new(plain, NodeData::page()));
        store.add_node(CanvasNode::new(
            described,
            NodeData::page().with_description("checkout flow"),
        ));
        select(&mut store, &[plain, described]);

        let DeleteOutcome::NeedsConfirmation(plan) = store.delete_selection() else {
            panic!("expected a confirmation request");
        };
        assert_eq!(plan.selected_count(), 2);
        assert_eq!(plan.meaningful, vec![described]);
        assert_eq!(store.nodes().count(), 2);

        assert_eq!(store.confirm_delete(&plan), 2);
        assert_eq!(store.nodes().count(), 0);
    }
}
