pub mod catalog;
pub mod classify;
pub mod grid;
pub mod id;
pub mod model;
pub mod payload;
pub mod snapshot;

pub use catalog::{
    DATA_SOURCES, TableDef, WIDGETS, WidgetCategory, WidgetDef, lookup_table, lookup_widget,
    validate_binding, widgets_in,
};
pub use classify::{Partition, is_empty, partition};
pub use grid::{GridChild, GridConfig, GridSlot, Padding};
pub use id::{EdgeId, NodeId};
pub use model::*;
pub use payload::{DND_NODE_MIME, DndPayload};
pub use snapshot::{CanvasSnapshot, NodeRecord, SnapshotError};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
