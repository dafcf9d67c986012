//! Grid geometry for container children.
//!
//! A container lays its children out on a fixed-size grid below a header
//! band. Everything here is pure: slots are recomputed from the container
//! size on demand and never stored. Coordinates are container-local.

use crate::id::NodeId;
use crate::model::{DEFAULT_CONTAINER_SIZE, DEFAULT_NODE_SIZE, Position, Size};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Inner padding of a container. The top band holds the container header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 75.0,
            left: 12.0,
            right: 12.0,
            bottom: 12.0,
        }
    }
}

/// Grid layout parameters. Every field falls back to its default when
/// missing from a serialized config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Footprint of one child slot.
    pub child: Size,
    pub gap_x: f32,
    pub gap_y: f32,
    pub padding: Padding,
    /// Smallest size a container is ever given.
    pub min_container: Size,
    /// Column count used when sizing a container for its children.
    pub default_cols: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            child: DEFAULT_NODE_SIZE,
            gap_x: 12.0,
            gap_y: 12.0,
            padding: Padding::default(),
            min_container: DEFAULT_CONTAINER_SIZE,
            default_cols: 1,
        }
    }
}

/// A computed child slot, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSlot {
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
}

impl GridSlot {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A child as seen by the grid: its id and container-local position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridChild {
    pub id: NodeId,
    pub position: Position,
}

impl GridChild {
    pub fn new(id: NodeId, position: Position) -> Self {
        Self { id, position }
    }
}

impl GridConfig {
    /// Number of columns that fit in a container (at least one).
    pub fn columns(&self, container: Size) -> usize {
        let avail = container.width - self.padding.left - self.padding.right;
        fit_count(avail, self.child.width, self.gap_x)
    }

    /// Number of rows that fit in a container (at least one).
    pub fn rows(&self, container: Size) -> usize {
        let avail = container.height - self.padding.top - self.padding.bottom;
        fit_count(avail, self.child.height, self.gap_y)
    }

    /// Anchor of the slot at `(row, col)`. Defined for any row, including
    /// rows beyond the container's visible grid.
    pub fn slot_at(&self, row: usize, col: usize) -> GridSlot {
        GridSlot {
            row,
            col,
            x: self.padding.left + col as f32 * (self.child.width + self.gap_x),
            y: self.padding.top + row as f32 * (self.child.height + self.gap_y),
        }
    }

    /// All slots that fit in `container`, row-major.
    pub fn slots(&self, container: Size) -> Vec<GridSlot> {
        self.slot_grid(self.rows(container), self.columns(container))
    }

    fn slot_grid(&self, rows: usize, cols: usize) -> Vec<GridSlot> {
        let mut slots = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                slots.push(self.slot_at(row, col));
            }
        }
        slots
    }

    /// Indices of the slots currently taken. Each child claims the slot
    /// closest to its position; two children may claim the same slot.
    pub fn occupied_slots(&self, children: &[GridChild], container: Size) -> BTreeSet<usize> {
        occupancy(&self.slots(container), children)
    }

    /// The unoccupied slot nearest to `candidate`, ignoring `exclude` (the
    /// node being placed) when computing occupancy. When the container's
    /// grid is full, rows are appended below until a free slot exists.
    pub fn nearest_empty_slot(
        &self,
        candidate: Position,
        children: &[GridChild],
        container: Size,
        exclude: Option<NodeId>,
    ) -> Position {
        let others: Vec<GridChild> = children
            .iter()
            .filter(|c| Some(c.id) != exclude)
            .copied()
            .collect();
        let cols = self.columns(container);
        let fit_rows = self.rows(container);
        // With this many rows there are more slots than placed children.
        let max_rows = fit_rows.max(others.len() / cols + 1);

        for rows in fit_rows..=max_rows {
            let slots = self.slot_grid(rows, cols);
            let occupied = occupancy(&slots, &others);
            if let Some(slot) = nearest(
                slots
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !occupied.contains(i))
                    .map(|(_, s)| s),
                candidate,
            ) {
                return slot.position();
            }
        }
        // Unreachable: `max_rows` always leaves a free slot.
        self.slot_at(max_rows, 0).position()
    }

    /// The first unoccupied slot in row-major order, extending the grid
    /// below when it is full.
    pub fn first_empty_slot(&self, children: &[GridChild], container: Size) -> Position {
        let cols = self.columns(container);
        let fit_rows = self.rows(container);
        let max_rows = fit_rows.max(children.len() / cols + 1);
        let slots = self.slot_grid(max_rows, cols);
        let occupied = occupancy(&slots, children);
        slots
            .iter()
            .enumerate()
            .find(|(i, _)| !occupied.contains(i))
            .map(|(_, s)| s.position())
            .unwrap_or_else(|| self.slot_at(max_rows, 0).position())
    }

    /// Snap a position to the nearest slot regardless of occupancy.
    pub fn snap(&self, position: Position, container: Size) -> Position {
        nearest(self.slots(container).iter(), position)
            .map(GridSlot::position)
            .unwrap_or_else(|| self.slot_at(0, 0).position())
    }

    /// The size a container needs to hold `child_count` children laid out
    /// in `cols` columns. Never below the minimum container size.
    pub fn required_container_size(&self, child_count: usize, cols: usize) -> Size {
        if child_count == 0 {
            return self.min_container;
        }
        let cols = cols.max(1);
        let rows = child_count.div_ceil(cols);

        let content_w = cols as f32 * self.child.width + (cols - 1) as f32 * self.gap_x;
        let content_h = rows as f32 * self.child.height + (rows - 1) as f32 * self.gap_y;
        Size::new(
            self.min_container
                .width
                .max(content_w + self.padding.left + self.padding.right),
            self.min_container
                .height
                .max(content_h + self.padding.top + self.padding.bottom),
        )
    }

    /// Sizing with the configured default column count.
    pub fn fit_container(&self, child_count: usize) -> Size {
        self.required_container_size(child_count, self.default_cols)
    }

    /// Re-lay children top-left first into the slots of a resized
    /// container. Children past the last slot continue on new rows with the
    /// same column count.
    pub fn redistribute(
        &self,
        children: &[GridChild],
        container: Size,
    ) -> HashMap<NodeId, Position> {
        let cols = self.columns(container);
        let mut sorted: Vec<&GridChild> = children.iter().collect();
        sorted.sort_by(|a, b| {
            a.position
                .y
                .total_cmp(&b.position.y)
                .then(a.position.x.total_cmp(&b.position.x))
        });

        sorted
            .into_iter()
            .enumerate()
            .map(|(i, child)| (child.id, self.slot_at(i / cols, i % cols).position()))
            .collect()
    }
}

fn fit_count(available: f32, item: f32, gap: f32) -> usize {
    let n = ((available + gap) / (item + gap)).floor();
    if n.is_finite() && n >= 1.0 {
        n as usize
    } else {
        1
    }
}

/// Closest slot to `target`; ties keep the earliest slot.
fn nearest<'a>(slots: impl Iterator<Item = &'a GridSlot>, target: Position) -> Option<&'a GridSlot> {
    let mut best: Option<(&GridSlot, f32)> = None;
    for slot in slots {
        let d = slot.position().distance_to(target);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((slot, d)),
        }
    }
    best.map(|(slot, _)| slot)
}

fn occupancy(slots: &[GridSlot], children: &[GridChild]) -> BTreeSet<usize> {
    children
        .iter()
        .filter_map(|child| {
            let mut best: Option<(usize, f32)> = None;
            for (i, slot) in slots.iter().enumerate() {
                let d = slot.position().distance_to(child.position);
                match best {
                    Some((_, best_d)) if d >= best_d => {}
                    _ => best = Some((i, d)),
                }
            }
            best.map(|(i, _)| i)
        })
        .collect()
}
