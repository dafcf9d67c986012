//! Static lookup data: the data-source schema nodes can bind to, and the
//! widget registry the palette offers.
//!
//! Both tables are read-only and known at compile time. Widget previews are
//! a rendering concern and live with the host UI; this module only carries
//! what the canvas engine needs (category, container capability, default
//! props).

use crate::model::TableBinding;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Data sources ────────────────────────────────────────────────────────

/// SQL column type of a data-source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    Text,
    Integer,
    Float,
    Timestamptz,
    Jsonb,
}

impl ColumnType {
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Uuid => "UUID",
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "FLOAT",
            ColumnType::Timestamptz => "TIMESTAMPTZ",
            ColumnType::Jsonb => "JSONB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub key: &'static str,
    pub label: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

const fn col(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef { name, ty }
}

use ColumnType::{Float, Integer, Jsonb, Text, Timestamptz, Uuid};

/// Tables a data node can be bound to.
pub static DATA_SOURCES: &[TableDef] = &[
    TableDef {
        key: "projects",
        label: "Projects",
        columns: &[
            col("id", Uuid),
            col("name", Text),
            col("description", Text),
            col("version", Text),
            col("risk_score", Integer),
            col("created_at", Timestamptz),
            col("updated_at", Timestamptz),
        ],
    },
    TableDef {
        key: "nodes",
        label: "Nodes",
        columns: &[
            col("id", Uuid),
            col("project_id", Uuid),
            col("type", Text),
            col("label", Text),
            col("position_x", Float),
            col("position_y", Float),
            col("data", Jsonb),
            col("status", Text),
            col("created_at", Timestamptz),
            col("updated_at", Timestamptz),
        ],
    },
    TableDef {
        key: "edges",
        label: "Connections",
        columns: &[
            col("id", Uuid),
            col("project_id", Uuid),
            col("source_id", Uuid),
            col("target_id", Uuid),
            col("label", Text),
            col("created_at", Timestamptz),
        ],
    },
    TableDef {
        key: "decision_logs",
        label: "Decision logs",
        columns: &[
            col("id", Uuid),
            col("project_id", Uuid),
            col("node_id", Uuid),
            col("version", Text),
            col("background", Text),
            col("considerations", Text),
            col("final_decision", Text),
            col("created_at", Timestamptz),
        ],
    },
    TableDef {
        key: "chat_messages",
        label: "Chat messages",
        columns: &[
            col("id", Uuid),
            col("project_id", Uuid),
            col("role", Text),
            col("content", Text),
            col("agent_type", Text),
            col("created_at", Timestamptz),
        ],
    },
];

pub fn lookup_table(key: &str) -> Option<&'static TableDef> {
    DATA_SOURCES.iter().find(|t| t.key == key)
}

/// A binding is valid when its table exists and every selected column
/// belongs to that table.
pub fn validate_binding(binding: &TableBinding) -> bool {
    match lookup_table(&binding.table) {
        Some(table) => binding.columns.iter().all(|c| table.column(c).is_some()),
        None => false,
    }
}

// ─── Widget registry ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetCategory {
    Layout,
    Inputs,
    DataDisplay,
    Navigation,
    Feedback,
    Surfaces,
}

impl WidgetCategory {
    /// Palette order.
    pub const ALL: [WidgetCategory; 6] = [
        WidgetCategory::Layout,
        WidgetCategory::Inputs,
        WidgetCategory::DataDisplay,
        WidgetCategory::Navigation,
        WidgetCategory::Feedback,
        WidgetCategory::Surfaces,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WidgetCategory::Layout => "Layout",
            WidgetCategory::Inputs => "Inputs",
            WidgetCategory::DataDisplay => "Data Display",
            WidgetCategory::Navigation => "Navigation",
            WidgetCategory::Feedback => "Feedback",
            WidgetCategory::Surfaces => "Surfaces",
        }
    }

    /// Parse the wire id (`"dataDisplay"` etc).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn id(self) -> &'static str {
        match self {
            WidgetCategory::Layout => "layout",
            WidgetCategory::Inputs => "inputs",
            WidgetCategory::DataDisplay => "dataDisplay",
            WidgetCategory::Navigation => "navigation",
            WidgetCategory::Feedback => "feedback",
            WidgetCategory::Surfaces => "surfaces",
        }
    }
}

impl fmt::Display for WidgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetDef {
    pub key: &'static str,
    pub label: &'static str,
    pub category: WidgetCategory,
    pub is_container: bool,
    pub default_props: &'static [(&'static str, &'static str)],
}

const fn widget(
    key: &'static str,
    label: &'static str,
    category: WidgetCategory,
    is_container: bool,
) -> WidgetDef {
    WidgetDef {
        key,
        label,
        category,
        is_container,
        default_props: &[],
    }
}

const fn with_props(
    def: WidgetDef,
    default_props: &'static [(&'static str, &'static str)],
) -> WidgetDef {
    WidgetDef {
        default_props,
        ..def
    }
}

use WidgetCategory::{DataDisplay, Feedback, Inputs, Layout, Navigation, Surfaces};

pub static WIDGETS: &[WidgetDef] = &[
    // Layout (all containers)
    widget("Container", "Container", Layout, true),
    widget("Box", "Box", Layout, true),
    widget("Grid", "Grid", Layout, true),
    widget("Stack", "Stack", Layout, true),
    // Inputs
    with_props(
        widget("Button", "Button", Inputs, false),
        &[("variant", "contained"), ("children", "Button")],
    ),
    widget("IconButton", "IconButton", Inputs, false),
    widget("Fab", "FAB", Inputs, false),
    with_props(
        widget("TextField", "TextField", Inputs, false),
        &[("label", "Label"), ("variant", "outlined")],
    ),
    with_props(
        widget("Select", "Select", Inputs, false),
        &[("label", "Select")],
    ),
    widget("Checkbox", "Checkbox", Inputs, false),
    widget("Radio", "Radio", Inputs, false),
    widget("Switch", "Switch", Inputs, false),
    widget("Slider", "Slider", Inputs, false),
    widget("Rating", "Rating", Inputs, false),
    widget("Autocomplete", "Autocomplete", Inputs, false),
    widget("ToggleButton", "ToggleButton", Inputs, false),
    widget("ToggleButtonGroup", "ToggleButtonGroup", Inputs, false),
    // Data display
    with_props(
        widget("Typography", "Typography", DataDisplay, false),
        &[("variant", "h6"), ("children", "Text")],
    ),
    widget("Table", "Table", DataDisplay, true),
    widget("List", "List", DataDisplay, true),
    widget("ListItem", "ListItem", DataDisplay, false),
    with_props(widget("Chip", "Chip", DataDisplay, false), &[("label", "Chip")]),
    widget("Avatar", "Avatar", DataDisplay, false),
    widget("Badge", "Badge", DataDisplay, false),
    widget("Divider", "Divider", DataDisplay, false),
    widget("Tooltip", "Tooltip", DataDisplay, false),
    widget("ImageList", "ImageList", DataDisplay, true),
    // Navigation
    widget("AppBar", "AppBar", Navigation, true),
    widget("Toolbar", "Toolbar", Navigation, true),
    widget("Tabs", "Tabs", Navigation, false),
    widget("Breadcrumbs", "Breadcrumbs", Navigation, false),
    widget("Drawer", "Drawer", Navigation, true),
    widget("Menu", "Menu", Navigation, false),
    widget("BottomNavigation", "BottomNavigation", Navigation, false),
    widget("Link", "Link", Navigation, false),
    widget("Pagination", "Pagination", Navigation, false),
    widget("SpeedDial", "SpeedDial", Navigation, false),
    widget("Stepper", "Stepper", Navigation, false),
    // Feedback
    with_props(
        widget("Alert", "Alert", Feedback, false),
        &[("severity", "info"), ("children", "Alert message")],
    ),
    widget("Dialog", "Dialog", Feedback, true),
    widget("Snackbar", "Snackbar", Feedback, false),
    widget("LinearProgress", "LinearProgress", Feedback, false),
    widget("CircularProgress", "CircularProgress", Feedback, false),
    widget("Skeleton", "Skeleton", Feedback, false),
    widget("Backdrop", "Backdrop", Feedback, false),
    // Surfaces
    widget("Card", "Card", Surfaces, true),
    widget("Paper", "Paper", Surfaces, true),
    widget("Accordion", "Accordion", Surfaces, true),
];

pub fn lookup_widget(key: &str) -> Option<&'static WidgetDef> {
    WIDGETS.iter().find(|w| w.key == key)
}

/// Widgets of one category, in registry order.
pub fn widgets_in(category: WidgetCategory) -> impl Iterator<Item = &'static WidgetDef> {
    WIDGETS.iter().filter(move |w| w.category == category)
}
