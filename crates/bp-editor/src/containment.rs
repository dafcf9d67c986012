//! Drag-time container membership.
//!
//! While a node is dragged, `drag_move` tracks which container it is over
//! and highlights it. On release, `drag_end` commits the membership change:
//! snapping into the container's grid, moving to another container, or
//! leaving its container for the open canvas. Each commit also resizes the
//! affected containers to fit their children.

use crate::store::CanvasStore;
use bp_core::id::NodeId;
use bp_core::model::{Position, Size};
use std::collections::HashSet;

/// What a drag release did to containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing changed.
    Unchanged,
    /// Re-dropped inside its own container and snapped to a free slot.
    Snapped { parent: NodeId },
    /// Moved into a container, possibly out of another one.
    Attached {
        parent: NodeId,
        previous: Option<NodeId>,
    },
    /// Dropped outside its container onto the open canvas.
    Detached { former_parent: NodeId },
}

impl CanvasStore {
    /// Containers whose absolute bounds overlap the node's, in canvas order.
    /// The node itself and its descendants never qualify.
    pub fn intersecting_containers(&self, id: NodeId) -> Vec<NodeId> {
        let graph = &self.graph;
        let Some(dragged) = graph.absolute_bounds(id) else {
            return Vec::new();
        };
        let own: HashSet<NodeId> = graph.descendants([id]).into_iter().collect();

        graph
            .nodes()
            .filter(|n| n.is_container() && !own.contains(&n.id))
            .filter(|n| {
                graph
                    .absolute_bounds(n.id)
                    .is_some_and(|b| b.intersects(&dragged))
            })
            .map(|n| n.id)
            .collect()
    }

    /// Move a dragged node to `position` (in its current coordinate space)
    /// and highlight the first container under it. Returns the highlight.
    pub fn drag_move(&mut self, id: NodeId, position: Position) -> Option<NodeId> {
        let Some(node) = self.graph.get_mut(id) else {
            self.highlighted = None;
            return None;
        };
        node.position = position;
        self.highlighted = self.intersecting_containers(id).first().copied();
        log::trace!("drag {id} to ({}, {}) over {:?}", position.x, position.y, self.highlighted);
        self.touch();
        self.highlighted
    }

    /// Commit a drag release. Clears the highlight in every case.
    pub fn drag_end(&mut self, id: NodeId) -> DropOutcome {
        self.highlighted = None;
        if !self.graph.contains(id) {
            return DropOutcome::Unchanged;
        }

        let target = self.intersecting_containers(id).first().copied();
        let current = self.graph.parent_id(id);

        let outcome = match target {
            Some(parent) if Some(parent) == current => self.snap_within(id, parent),
            Some(parent) if parent == id => DropOutcome::Unchanged,
            Some(parent) => self.attach(id, parent, current),
            None => match current {
                Some(former) => self.detach(id, former),
                None => DropOutcome::Unchanged,
            },
        };

        if outcome != DropOutcome::Unchanged {
            log::debug!("drag end {id}: {outcome:?}");
            self.touch();
        }
        outcome
    }

    fn snap_within(&mut self, id: NodeId, parent: NodeId) -> DropOutcome {
        let Some(position) = self.graph.get(id).map(|n| n.position) else {
            return DropOutcome::Unchanged;
        };
        let siblings = self.grid_children(parent, Some(id));
        let size = self.grid.fit_container(siblings.len() + 1);
        let slot = self
            .grid
            .nearest_empty_slot(position, &siblings, size, Some(id));

        if !self.place(id, Some(parent), slot) {
            return DropOutcome::Unchanged;
        }
        self.set_size(parent, size);
        DropOutcome::Snapped { parent }
    }

    fn attach(&mut self, id: NodeId, parent: NodeId, previous: Option<NodeId>) -> DropOutcome {
        let (Some(abs_node), Some(abs_parent)) = (
            self.graph.absolute_position(id),
            self.graph.absolute_position(parent),
        ) else {
            return DropOutcome::Unchanged;
        };
        let relative = abs_node - abs_parent;
        let siblings = self.grid_children(parent, Some(id));
        let size = self.grid.fit_container(siblings.len() + 1);
        let slot = self
            .grid
            .nearest_empty_slot(relative, &siblings, size, Some(id));

        if !self.place(id, Some(parent), slot) {
            return DropOutcome::Unchanged;
        }
        self.set_size(parent, size);
        if let Some(former) = previous {
            self.shrink_to_fit(former);
        }
        DropOutcome::Attached { parent, previous }
    }

    fn detach(&mut self, id: NodeId, former: NodeId) -> DropOutcome {
        let Some(absolute) = self.graph.absolute_position(id) else {
            return DropOutcome::Unchanged;
        };
        if !self.place(id, None, absolute) {
            return DropOutcome::Unchanged;
        }
        self.shrink_to_fit(former);
        DropOutcome::Detached {
            former_parent: former,
        }
    }

    fn shrink_to_fit(&mut self, container: NodeId) {
        let remaining = self.graph.children(container).len();
        let size = self.grid.fit_container(remaining);
        self.set_size(container, size);
    }

    fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(node) = self.graph.get_mut(id) {
            node.size = Some(size);
        }
    }
}
