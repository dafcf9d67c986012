//! Drag-and-drop payload exchanged between the palette and the canvas.
//!
//! The palette serialises a `DndPayload` as JSON under [`DND_NODE_MIME`];
//! the canvas parses it on drop and turns it into a node.

use crate::catalog::{WidgetCategory, WidgetDef, lookup_widget};
use crate::id::NodeId;
use crate::model::{CanvasNode, NodeData, NodeKind, Position, Size};
use serde::{Deserialize, Serialize};

/// MIME type the payload travels under.
pub const DND_NODE_MIME: &str = "application/aisync-node";

/// Default size of a dropped container widget.
pub const WIDGET_CONTAINER_SIZE: Size = Size::new(400.0, 300.0);
/// Default size of a dropped component.
pub const COMPONENT_SIZE: Size = Size::new(300.0, 200.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DndPayload {
    /// `page`, `component`, `function`, `data` or `muiComponent`.
    pub node_type: String,
    /// Presentation type hint for the host canvas.
    pub flow_type: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mui_component_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mui_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_container: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl DndPayload {
    /// Parse a payload. Empty or malformed input yields `None`.
    pub fn from_json(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(raw) {
            Ok(payload) => Some(payload),
            Err(err) => {
                log::debug!("ignoring malformed drop payload: {err}");
                None
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Payload for one of the built-in node kinds.
    pub fn for_kind(kind: &NodeKind) -> Self {
        let (flow_type, size) = match kind {
            NodeKind::Page => ("action", None),
            NodeKind::Component { .. } => ("function", Some(COMPONENT_SIZE)),
            NodeKind::Function { .. } => ("function", None),
            NodeKind::Data => ("data", None),
            NodeKind::Widget { container, .. } => {
                ("mui", container.then_some(WIDGET_CONTAINER_SIZE))
            }
        };
        Self {
            node_type: kind.type_tag().to_string(),
            flow_type: flow_type.to_string(),
            label: kind.default_label().unwrap_or_default().to_string(),
            mui_component_type: None,
            mui_category: None,
            is_container: None,
            width: size.map(|s| s.width),
            height: size.map(|s| s.height),
        }
    }

    /// Payload for a palette widget.
    pub fn for_widget(def: &WidgetDef) -> Self {
        let size = def.is_container.then_some(WIDGET_CONTAINER_SIZE);
        Self {
            node_type: "muiComponent".to_string(),
            flow_type: "mui".to_string(),
            label: def.label.to_string(),
            mui_component_type: Some(def.key.to_string()),
            mui_category: Some(def.category.id().to_string()),
            is_container: Some(def.is_container),
            width: size.map(|s| s.width),
            height: size.map(|s| s.height),
        }
    }

    /// The node kind this payload describes. Unknown node types, and widget
    /// payloads without a widget key, yield `None`.
    pub fn kind(&self) -> Option<NodeKind> {
        let kind = match self.node_type.as_str() {
            "page" => NodeKind::Page,
            "component" => NodeKind::Component { code: None },
            "function" => NodeKind::Function { code: None },
            "data" => NodeKind::Data,
            "muiComponent" => {
                let widget = self.mui_component_type.clone()?;
                let registered = lookup_widget(&widget);
                let category = self
                    .mui_category
                    .as_deref()
                    .and_then(WidgetCategory::from_id)
                    .or(registered.map(|w| w.category));
                let container = self
                    .is_container
                    .or(registered.map(|w| w.is_container))
                    .unwrap_or(false);
                NodeKind::Widget {
                    widget,
                    category,
                    container,
                }
            }
            other => {
                log::debug!("unknown node type in drop payload: {other}");
                return None;
            }
        };
        Some(kind)
    }

    /// Size the dropped node starts with: the payload's explicit size, or the
    /// per-kind container default.
    fn size_for(&self, kind: &NodeKind) -> Option<Size> {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            return Some(Size::new(width, height));
        }
        match kind {
            NodeKind::Component { .. } => Some(COMPONENT_SIZE),
            NodeKind::Widget {
                container: true, ..
            } => Some(WIDGET_CONTAINER_SIZE),
            _ => None,
        }
    }

    /// Build the node to insert at `position` (canvas coordinates).
    pub fn into_node(self, id: NodeId, position: Position) -> Option<CanvasNode> {
        let kind = self.kind()?;
        let size = self.size_for(&kind);
        let label = if self.label.trim().is_empty() {
            kind.default_label().unwrap_or_default().to_string()
        } else {
            self.label
        };
        let mut node = CanvasNode::new(id, NodeData::new(label, kind)).at(position);
        node.size = size;
        Some(node)
    }
}
