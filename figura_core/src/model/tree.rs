// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural edits: insert, delete, z-order, move and align.

use kurbo::{Rect, Vec2};

use super::GraphicModel;
use crate::edit::{EditOp, ReversibleEdit};
use crate::error::EditError;
use crate::node::{NodeId, NodeKind, PropertyChange, PropertyKey, PropertyValue};

/// Where [`GraphicModel::change_z_order`] moves a node among its siblings.
///
/// Later siblings draw over earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZOrder {
    /// To the end of the child list, drawn last.
    Front,
    /// To the start of the child list, drawn first.
    Back,
    /// One step towards the front.
    Forward,
    /// One step towards the back.
    Backward,
}

/// How [`GraphicModel::align`] lines nodes up with the focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Left edges.
    Left,
    /// Right edges.
    Right,
    /// Top edges.
    Top,
    /// Bottom edges.
    Bottom,
    /// Horizontal centers.
    HorizontalCenter,
    /// Vertical centers.
    VerticalCenter,
}

impl Alignment {
    /// The translation that aligns `r` with `anchor`.
    fn offset(self, anchor: Rect, r: Rect) -> Vec2 {
        match self {
            Self::Left => Vec2::new(anchor.x0 - r.x0, 0.0),
            Self::Right => Vec2::new(anchor.x1 - r.x1, 0.0),
            // Physical y grows upward.
            Self::Top => Vec2::new(0.0, anchor.y1 - r.y1),
            Self::Bottom => Vec2::new(0.0, anchor.y0 - r.y0),
            Self::HorizontalCenter => Vec2::new(anchor.center().x - r.center().x, 0.0),
            Self::VerticalCenter => Vec2::new(0.0, anchor.center().y - r.center().y),
        }
    }
}

impl GraphicModel {
    /// Inserts the detached node `child` under `parent` at `index` and
    /// selects it. An out-of-range index appends.
    ///
    /// Inserting a plottable rescales the parent's auto-ranged axes as part
    /// of the same edit. Returns `false` if `parent` is not live or the
    /// insertion is not allowed.
    pub fn insert(&mut self, parent: NodeId, child: NodeId, index: usize) -> bool {
        if !self.is_live(parent) || !self.store.is_alive(child) {
            tracing::debug!(?parent, ?child, "insert rejected: not live");
            return false;
        }
        let before = self.selection.clone();
        let mut edit = ReversibleEdit::new(format!("Insert {}", self.store.kind(child).name()));
        if let Err(error) = self.insert_recorded(&mut edit, parent, child, index) {
            tracing::debug!(%error, "insert rejected");
            return false;
        }
        self.selection.set(child);
        self.commit(edit, before)
    }

    /// Creates a node of type `kind`, appends it under `parent` and selects
    /// it.
    pub fn insert_new(&mut self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        if !self.is_live(parent) || !self.store.kind(parent).can_insert(kind) {
            return None;
        }
        let child = self.store.create(kind);
        if self.insert(parent, child, usize::MAX) {
            Some(child)
        } else {
            self.store.destroy(child);
            None
        }
    }

    /// Deletes every selected node that can be removed: regular children
    /// whose ancestors are not selected too. Returns whether anything was
    /// deleted.
    pub fn delete(&mut self) -> bool {
        let nodes = self.top_level_selection(|m, n| m.store.data(n).role().is_none());
        self.delete_nodes("Delete", &nodes)
    }

    /// Deletes one node. Returns `false` if it is not a live regular child.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.is_live(id) && self.delete_nodes("Delete", &[id])
    }

    /// Moves the selected regular children within their parents' child
    /// lists. Returns whether anything moved.
    pub fn change_z_order(&mut self, order: ZOrder) -> bool {
        let before = self.selection.clone();
        let description = match order {
            ZOrder::Front => "Bring to front",
            ZOrder::Back => "Send to back",
            ZOrder::Forward => "Bring forward",
            ZOrder::Backward => "Send backward",
        };
        let mut edit = ReversibleEdit::new(description);
        for n in self.top_level_selection(|m, n| m.store.child_index(n).is_some()) {
            let (Some(from), Some(parent)) = (self.store.child_index(n), self.store.parent(n)) else {
                continue;
            };
            let last = self.store.children(parent).len() - 1;
            let to = match order {
                ZOrder::Front => last,
                ZOrder::Back => 0,
                ZOrder::Forward => (from + 1).min(last),
                ZOrder::Backward => from.saturating_sub(1),
            };
            if to == from {
                continue;
            }
            match self.store.move_child(n, to) {
                Ok((from, to)) => edit.push(EditOp::Reorder { child: n, from, to }),
                Err(error) => tracing::debug!(%error, "reorder skipped"),
            }
        }
        self.commit(edit, before)
    }

    /// Moves the selected positionable nodes by `(dx, dy)` milli-inches.
    /// Returns whether anything moved.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> bool {
        let before = self.selection.clone();
        let mut edit = ReversibleEdit::new("Move");
        let delta = Vec2::new(dx, dy);
        for n in self.top_level_selection(Self::is_positionable) {
            match self.translate(n, delta) {
                Ok(changes) => edit.extend_changes(changes),
                Err(error) => tracing::debug!(%error, ?n, "move skipped"),
            }
        }
        self.commit(edit, before)
    }

    /// Lines the selected positionable nodes up with the focus node's
    /// bounds. Returns whether anything moved.
    pub fn align(&mut self, alignment: Alignment) -> bool {
        let anchor_id = self.focus();
        let Some(anchor) = self.store.bounds(anchor_id) else {
            return false;
        };
        let before = self.selection.clone();
        let mut edit = ReversibleEdit::new("Align");
        for n in self.top_level_selection(Self::is_positionable) {
            if n == anchor_id {
                continue;
            }
            let Some(b) = self.store.bounds(n) else {
                continue;
            };
            let delta = alignment.offset(anchor, b);
            if delta == Vec2::ZERO {
                continue;
            }
            match self.translate(n, delta) {
                Ok(changes) => edit.extend_changes(changes),
                Err(error) => tracing::debug!(%error, ?n, "align skipped"),
            }
        }
        self.commit(edit, before)
    }

    // -- Helpers --

    pub(super) fn insert_recorded(
        &mut self,
        edit: &mut ReversibleEdit,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), EditError> {
        let index = self.store.insert(parent, child, index)?;
        edit.push(EditOp::Insert { parent, child, index });
        if self.store.kind(child).is_plottable() {
            edit.extend_changes(self.store.auto_range(parent)?.changes);
        }
        Ok(())
    }

    fn remove_recorded(&mut self, edit: &mut ReversibleEdit, child: NodeId) -> Result<NodeId, EditError> {
        let plottable = self.store.kind(child).is_plottable();
        let (parent, index) = self.store.remove(child)?;
        edit.push(EditOp::Remove { parent, child, index });
        if plottable {
            edit.extend_changes(self.store.auto_range(parent)?.changes);
        }
        Ok(parent)
    }

    /// Removes `nodes` as one edit. The selection keeps its live nodes, or
    /// falls back to the last removed node's parent.
    pub(super) fn delete_nodes(&mut self, description: &str, nodes: &[NodeId]) -> bool {
        let before = self.selection.clone();
        let mut edit = ReversibleEdit::new(description);
        let mut fallback = self.root;
        for &n in nodes {
            match self.remove_recorded(&mut edit, n) {
                Ok(parent) => fallback = parent,
                Err(error) => tracing::debug!(%error, ?n, "delete skipped"),
            }
        }
        if edit.is_empty() {
            return false;
        }
        let live: Vec<NodeId> = self
            .selection
            .nodes()
            .iter()
            .copied()
            .filter(|&n| self.is_live(n))
            .collect();
        if live.is_empty() {
            let target = if self.is_live(fallback) { fallback } else { self.root };
            self.selection.set(target);
        } else {
            self.selection.replace(live, self.root);
        }
        self.commit(edit, before)
    }

    /// Selected nodes passing `keep`, excluding the root and nodes with a
    /// selected ancestor, in selection order.
    pub(super) fn top_level_selection(&self, keep: impl Fn(&Self, NodeId) -> bool) -> Vec<NodeId> {
        let selected = self.selection.nodes();
        selected
            .iter()
            .copied()
            .filter(|&n| n != self.root && self.is_live(n))
            .filter(|&n| !selected.iter().any(|&a| a != n && self.store.is_ancestor(a, n)))
            .filter(|&n| keep(self, n))
            .collect()
    }

    fn is_positionable(&self, n: NodeId) -> bool {
        self.store.data(n).payload().as_positionable().is_some()
    }

    /// Shifts a node's location (and a line's end point) by `delta`
    /// milli-inches, keeping each measure's unit. Either every coordinate
    /// moves or none does.
    fn translate(&mut self, n: NodeId, delta: Vec2) -> Result<Vec<PropertyChange>, EditError> {
        let Some(vp) = self.store.enclosing_frame(n).map(|f| *f.viewport()) else {
            return Ok(Vec::new());
        };
        let mut pairs = vec![(PropertyKey::X, PropertyKey::Y)];
        if self.store.kind(n) == NodeKind::Line {
            pairs.push((PropertyKey::X2, PropertyKey::Y2));
        }
        let mut out: Vec<PropertyChange> = Vec::new();
        for (kx, ky) in pairs {
            let (Some(PropertyValue::Measure(x)), Some(PropertyValue::Measure(y))) =
                (self.store.property(n, kx), self.store.property(n, ky))
            else {
                continue;
            };
            let Some(p) = vp.measure_point(x, y) else {
                continue;
            };
            let (nx, ny) = vp.point_measure(p + delta, (x.unit, y.unit));
            for (key, m) in [(kx, nx), (ky, ny)] {
                match self.store.set_property(n, key, PropertyValue::Measure(m)) {
                    Ok(change) => out.extend(change),
                    Err(error) => {
                        for c in out.iter().rev() {
                            let _ = self.store.restore_property(c.node, c.key, c.old.clone());
                        }
                        return Err(error);
                    }
                }
            }
        }
        Ok(out)
    }
}
