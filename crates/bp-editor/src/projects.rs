//! Per-project canvases.
//!
//! The store holds one open canvas. Switching projects parks the open
//! canvas under the project being left and restores the one being entered
//! (or starts empty). The clipboard is kept, so nodes can be copied from
//! one project into another.

use crate::store::CanvasStore;
use bp_core::model::CanvasGraph;
use bp_core::snapshot::SnapshotError;

impl CanvasStore {
    /// Park the open canvas under `from` and open the canvas stored for
    /// `to`. A project with nothing stored opens empty; `None` for `to`
    /// opens an empty scratch canvas.
    pub fn switch_project(&mut self, from: Option<&str>, to: Option<&str>) -> Result<(), SnapshotError> {
        if from.is_some() && from == to {
            return Ok(());
        }
        let next = match to.and_then(|id| self.projects.get(id)) {
            Some(snapshot) => CanvasGraph::from_snapshot(snapshot)?,
            None => CanvasGraph::new(),
        };

        if let Some(from) = from {
            self.projects.insert(from.to_string(), self.graph.to_snapshot());
        }
        self.graph = next;
        self.selected_node = None;
        self.highlighted = None;
        log::debug!("switched project {from:?} -> {to:?}");
        self.touch();
        Ok(())
    }

    /// Forget the canvas stored for a project.
    pub fn remove_project_data(&mut self, id: &str) -> bool {
        self.projects.remove(id).is_some()
    }

    pub fn has_project_data(&self, id: &str) -> bool {
        self.projects.contains_key(id)
    }
}
