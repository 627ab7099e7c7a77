// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern:
//!
//! 1. **LAYOUT** and **STYLE** — Drain dirty indices and recompute, in
//!    pre-order from the root, each node's resolved style, effective hidden
//!    flag, frame and bounds. Nodes outside the root's tree are dropped;
//!    they are marked again when inserted.
//! 2. **CONTENT** — Drain dirty indices (no recomputation; painters read the
//!    current payload directly from the store).
//! 3. **TOPOLOGY** — Drain the parents whose child lists changed.
//!
//! Every node whose bounds moved contributes its old and new bounds to the
//! damage list, as do content changes, visibility flips and removed
//! subtrees.

use kurbo::Rect;

use super::id::{INVALID, NodeId};
use super::payload::Payload;
use super::store::NodeStore;
use crate::dirty;
use crate::style::ResolvedStyle;

/// The set of changes produced by a single [`NodeStore::evaluate`] call.
///
/// Each list holds raw slot indices, in evaluation order.
#[derive(Clone, Debug, Default)]
pub struct SceneChanges {
    /// Nodes whose layout was recomputed.
    pub layout: Vec<u32>,
    /// Nodes whose inherited style was re-resolved.
    pub style: Vec<u32>,
    /// Nodes whose payload changed without affecting layout.
    pub content: Vec<u32>,
    /// Nodes whose regular child list changed.
    pub topology: Vec<u32>,
    /// Nodes that became effectively hidden.
    pub hidden: Vec<u32>,
    /// Nodes that became visible.
    pub unhidden: Vec<u32>,
    /// Physical rectangles that need redrawing.
    pub damage: Vec<Rect>,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.layout.clear();
        self.style.clear();
        self.content.clear();
        self.topology.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.damage.clear();
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
            && self.style.is_empty()
            && self.content.is_empty()
            && self.topology.is_empty()
            && self.damage.is_empty()
    }

    /// The union of all damage rectangles.
    #[must_use]
    pub fn damage_bounds(&self) -> Option<Rect> {
        self.damage.iter().copied().reduce(|a, b| a.union(b))
    }
}

impl NodeStore {
    /// Evaluates the tree under `root`, recomputing dirty state and returning
    /// the set of changes.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale.
    pub fn evaluate(&mut self, root: NodeId) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(root, &mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale.
    pub fn evaluate_into(&mut self, root: NodeId, changes: &mut SceneChanges) {
        self.validate(root);
        changes.clear();

        let layout: Vec<u32> = self
            .dirty
            .drain(dirty::LAYOUT)
            .affected()
            .deterministic()
            .run()
            .collect();
        let style: Vec<u32> = self
            .dirty
            .drain(dirty::STYLE)
            .affected()
            .deterministic()
            .run()
            .collect();

        let mut pending = vec![false; self.len as usize];
        for &idx in layout.iter().chain(&style) {
            pending[idx as usize] = true;
        }
        let mut restyled = vec![false; self.len as usize];
        for &idx in &style {
            restyled[idx as usize] = true;
        }

        for idx in self.subtree_indices(root.idx) {
            if !pending[idx as usize] {
                continue;
            }
            self.recompute(idx, changes);
            changes.layout.push(idx);
            if restyled[idx as usize] {
                changes.style.push(idx);
            }
        }

        let content: Vec<u32> = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();
        for idx in content {
            if self.is_attached_to(idx, root.idx) {
                if let Some(b) = self.bounds[idx as usize] {
                    changes.damage.push(b);
                }
                changes.content.push(idx);
            }
        }

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology = topology
            .into_iter()
            .filter(|&idx| self.is_attached_to(idx, root.idx))
            .collect();

        changes.damage.append(&mut self.pending_damage);
        tracing::trace!(
            layout = changes.layout.len(),
            content = changes.content.len(),
            damage = changes.damage.len(),
            "evaluated scene"
        );
    }

    fn recompute(&mut self, idx: u32, changes: &mut SceneChanges) {
        let i = idx as usize;
        let p = self.parent[i];
        let mut style = if p == INVALID {
            ResolvedStyle::default_root()
        } else {
            self.resolved[p as usize].clone()
        };
        self.data[i].style.resolve_onto(&mut style);

        let parent_hidden = p != INVALID && self.effective_hidden[p as usize];
        let hidden = parent_hidden || self.data[i].hidden;
        if hidden != self.effective_hidden[i] {
            if hidden {
                changes.hidden.push(idx);
            } else {
                changes.unhidden.push(idx);
            }
            self.effective_hidden[i] = hidden;
            changes.damage.extend(self.bounds[i]);
        }

        let layout = self.compute_layout(idx, &style);
        self.resolved[i] = style;
        self.frame[i] = layout.frame;
        let old = self.bounds[i];
        if old != layout.bounds {
            changes.damage.extend(old);
            changes.damage.extend(layout.bounds);
            self.bounds[i] = layout.bounds;
        }
        if let (Some(text), Payload::Calib(c)) = (layout.auto_text, &mut self.data[i].payload) {
            if c.auto_text != text {
                c.auto_text = text;
                changes.content.push(idx);
            }
        }
    }

    /// Returns whether `idx` is `root` or one of its descendants.
    fn is_attached_to(&self, mut idx: u32, root: u32) -> bool {
        if idx >= self.len {
            return false;
        }
        loop {
            if idx == root {
                return true;
            }
            idx = self.parent[idx as usize];
            if idx == INVALID {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;
    use crate::data::DataSet;
    use crate::node::{ComponentRole, NodeKind, PropertyKey, PropertyValue};
    use crate::style::Color;
    use crate::units::Measure;

    fn scene() -> (NodeStore, NodeId, NodeId) {
        let mut store = NodeStore::new();
        let fig = store.create(NodeKind::Figure);
        let g = store.create(NodeKind::Graph);
        store.insert(fig, g, 0).unwrap();
        let _ = store.evaluate(fig);
        (store, fig, g)
    }

    #[test]
    fn graph_box_resolves_against_the_page() {
        let (store, _, g) = scene();
        let rect = store.bounds(g).unwrap();
        assert_eq!(rect, Rect::new(750.0, 750.0, 3250.0, 3250.0));
        let vp = store.viewport(g).unwrap();
        assert_eq!(vp.user_to_physical(Point::new(1.0, 1.0)), Some(Point::new(3250.0, 3250.0)));
    }

    #[test]
    fn no_change_evaluate_returns_empty() {
        let (mut store, fig, _) = scene();
        let changes = store.evaluate(fig);
        assert!(changes.is_empty(), "{changes:?}");
    }

    #[test]
    fn moving_a_graph_relays_out_its_subtree() {
        let (mut store, fig, g) = scene();
        let axis = store.component(g, ComponentRole::PrimaryAxis).unwrap();
        let before = store.bounds(axis).unwrap();
        store
            .set_property(g, PropertyKey::X, PropertyValue::Measure(Measure::inches(1.75)))
            .unwrap();
        let changes = store.evaluate(fig);
        assert!(changes.layout.contains(&g.index()));
        assert!(changes.layout.contains(&axis.index()));
        let after = store.bounds(axis).unwrap();
        assert_eq!(after.x0 - before.x0, 1000.0);
        assert!(changes.damage.contains(&before));
    }

    #[test]
    fn style_changes_reach_inheriting_descendants() {
        let (mut store, fig, g) = scene();
        let axis = store.component(g, ComponentRole::PrimaryAxis).unwrap();
        store
            .set_property(g, PropertyKey::StrokeColor, PropertyValue::Color(Color::WHITE))
            .unwrap();
        let changes = store.evaluate(fig);
        assert!(changes.style.contains(&axis.index()));
        assert_eq!(store.resolved_style(axis).stroke_color, Color::WHITE);
    }

    #[test]
    fn hiding_propagates_to_descendants() {
        let (mut store, fig, g) = scene();
        let axis = store.component(g, ComponentRole::PrimaryAxis).unwrap();
        store.set_property(g, PropertyKey::Hide, PropertyValue::Bool(true)).unwrap();
        let changes = store.evaluate(fig);
        assert!(changes.hidden.contains(&axis.index()));
        assert!(store.effective_hidden(axis));
    }

    #[test]
    fn data_bounds_follow_the_viewport() {
        let (mut store, fig, g) = scene();
        let t = store.create(NodeKind::Trace);
        store.insert(g, t, 0).unwrap();
        let data = DataSet::xy(1, &[(0.0, 0.0), (0.5, 0.5)]);
        store
            .set_property(t, PropertyKey::Data, PropertyValue::Data(Some(data)))
            .unwrap();
        let _ = store.evaluate(fig);
        let b = store.bounds(t).unwrap();
        assert!(b.contains(Point::new(750.0, 750.0)));
        assert!(b.contains(Point::new(2000.0, 2000.0)));
        assert!(!b.contains(Point::new(3000.0, 3000.0)));
    }

    #[test]
    fn axis_range_change_refreshes_calibration_label() {
        let (mut store, fig, g) = scene();
        let calib = store.create(NodeKind::CalibBar);
        store.insert(g, calib, 0).unwrap();
        let x = store.component(g, ComponentRole::PrimaryAxis).unwrap();
        store
            .set_property(x, PropertyKey::Units, PropertyValue::Text("s".into()))
            .unwrap();
        let _ = store.evaluate(fig);
        let label = |s: &NodeStore| match s.data(calib).payload() {
            Payload::Calib(c) => c.label().to_owned(),
            _ => String::new(),
        };
        // 0.5in of a 2.5in box spanning one unit.
        assert_eq!(label(&store), "0.2 s");
        store.set_property(x, PropertyKey::End, PropertyValue::Number(10.0)).unwrap();
        let changes = store.evaluate(fig);
        assert_eq!(label(&store), "2 s");
        assert!(changes.content.contains(&calib.index()));
    }

    #[test]
    fn removed_subtrees_are_damaged() {
        let (mut store, fig, g) = scene();
        let rect = store.bounds(g).unwrap();
        store.remove(g).unwrap();
        let changes = store.evaluate(fig);
        let damaged = changes.damage_bounds().unwrap();
        assert_eq!(damaged.union(rect), damaged);
        assert_eq!(changes.topology, vec![fig.index()]);
    }
}
