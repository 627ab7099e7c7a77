// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities: child iteration, render order and hit-testing.
//!
//! All walks use an explicit work-list, so deep nesting never recurses.

use kurbo::{Point, Rect};

use super::id::NodeId;
use super::kind::ComponentRole;
use super::payload::Payload;
use super::store::NodeStore;

/// An iterator over the regular children or the components of a node.
///
/// Created by [`NodeStore::children`] and [`NodeStore::components`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    iter: core::slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, list: &'a [u32]) -> Self {
        Self {
            store,
            iter: list.iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.iter.next().map(|&idx| self.store.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.iter.next_back().map(|&idx| self.store.id_at(idx))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Which part of a node a render step draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPass {
    /// The node itself.
    Body,
    /// The title of a graph, drawn after everything else in the graph.
    Title,
}

/// One entry of the render order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStep {
    /// The node to draw.
    pub node: NodeId,
    /// The part of the node to draw.
    pub pass: RenderPass,
    /// Physical clip rectangle, for plottable content of a clipping graph.
    pub clip: Option<Rect>,
}

enum Work {
    Visit(u32, Option<Rect>),
    Title(u32),
}

impl NodeStore {
    /// Returns the draw order of the visible tree under `root`.
    ///
    /// Each node draws its body, then its components except the legend,
    /// then its regular children in list order, then the legend, then the
    /// graph title. Plottable children of a graph whose clip flag is set
    /// carry the graph's data box as their clip; axes, grid lines, legend and
    /// color bar are never clipped. Effectively hidden nodes are skipped
    /// along with their subtrees.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn render_order(&self, root: NodeId) -> Vec<RenderStep> {
        self.validate(root);
        let mut out = Vec::new();
        let mut stack = vec![Work::Visit(root.idx, None)];
        while let Some(work) = stack.pop() {
            let (idx, clip) = match work {
                Work::Title(idx) => {
                    out.push(RenderStep {
                        node: self.id_at(idx),
                        pass: RenderPass::Title,
                        clip: None,
                    });
                    continue;
                }
                Work::Visit(idx, clip) => (idx, clip),
            };
            if self.effective_hidden[idx as usize] {
                continue;
            }
            out.push(RenderStep {
                node: self.id_at(idx),
                pass: RenderPass::Body,
                clip,
            });

            let data = &self.data[idx as usize];
            let child_clip = match &data.payload {
                Payload::Graph(g) if g.clip => self.frame[idx as usize]
                    .as_ref()
                    .map(|f| f.viewport().rect()),
                _ => None,
            };
            let legend = self.component_idx(idx, ComponentRole::Legend);

            // Pushed in reverse so they pop in draw order.
            if data.title.is_some() && data.kind.is_container() {
                stack.push(Work::Title(idx));
            }
            if let Some(l) = legend {
                stack.push(Work::Visit(l, clip));
            }
            for &c in self.children[idx as usize].iter().rev() {
                let c_clip = if child_clip.is_some() && self.data[c as usize].kind.is_clippable() {
                    child_clip
                } else {
                    clip
                };
                stack.push(Work::Visit(c, c_clip));
            }
            for &c in self.components[idx as usize].iter().rev() {
                if Some(c) != legend {
                    stack.push(Work::Visit(c, clip));
                }
            }
        }
        out
    }

    /// Finds the node under `root` whose bounds contain `point` with the
    /// smallest area.
    ///
    /// Ties go to the deeper node. Components are only candidates when their
    /// role allows focusing through them; their own subtrees are still
    /// searched. Hidden nodes and nodes without bounds never match.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn hit_test(&self, root: NodeId, point: Point) -> Option<NodeId> {
        self.validate(root);
        let mut best: Option<(u32, f64, usize)> = None;
        let mut stack = vec![(root.idx, 0_usize)];
        while let Some((idx, depth)) = stack.pop() {
            let i = idx as usize;
            if self.effective_hidden[i] {
                continue;
            }
            let focusable = self.data[i].role.is_none_or(ComponentRole::is_focusable);
            if let Some(b) = self.bounds[i] {
                if focusable && b.contains(point) {
                    let area = b.area();
                    let better = match best {
                        None => true,
                        Some((_, a, d)) => area < a || (area == a && depth > d),
                    };
                    if better {
                        best = Some((idx, area, depth));
                    }
                }
            }
            for &c in self.components[i].iter().chain(&self.children[i]) {
                stack.push((c, depth + 1));
            }
        }
        best.map(|(idx, _, _)| self.id_at(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, PropertyKey, PropertyValue};

    fn graph_with_trace() -> (NodeStore, NodeId, NodeId, NodeId) {
        let mut store = NodeStore::new();
        let fig = store.create(NodeKind::Figure);
        let g = store.create(NodeKind::Graph);
        let t = store.create(NodeKind::Trace);
        store.insert(fig, g, 0).unwrap();
        store.insert(g, t, 0).unwrap();
        (store, fig, g, t)
    }

    #[test]
    fn legend_and_title_draw_last() {
        let (mut store, fig, g, t) = graph_with_trace();
        let legend = store.component(g, ComponentRole::Legend).unwrap();
        store
            .set_property(legend, PropertyKey::Hide, PropertyValue::Bool(false))
            .unwrap();
        store
            .set_property(g, PropertyKey::Title, PropertyValue::Text("Results".into()))
            .unwrap();
        let _ = store.evaluate(fig);

        let order = store.render_order(fig);
        let pos = |n: NodeId, pass: RenderPass| {
            order
                .iter()
                .position(|s| s.node == n && s.pass == pass)
                .unwrap()
        };
        let axis = store.component(g, ComponentRole::PrimaryAxis).unwrap();
        assert!(pos(g, RenderPass::Body) < pos(axis, RenderPass::Body));
        assert!(pos(axis, RenderPass::Body) < pos(t, RenderPass::Body));
        assert!(pos(t, RenderPass::Body) < pos(legend, RenderPass::Body));
        assert_eq!(pos(g, RenderPass::Title), order.len() - 1);
    }

    #[test]
    fn hidden_components_are_skipped() {
        let (mut store, fig, g, _) = graph_with_trace();
        let _ = store.evaluate(fig);
        let grid = store.component(g, ComponentRole::PrimaryGrid).unwrap();
        assert!(store.render_order(fig).iter().all(|s| s.node != grid));
    }

    #[test]
    fn clip_applies_to_plottables_only() {
        let (mut store, fig, g, t) = graph_with_trace();
        store
            .set_property(g, PropertyKey::Clip, PropertyValue::Bool(true))
            .unwrap();
        let _ = store.evaluate(fig);
        let order = store.render_order(fig);
        let step = |n: NodeId| *order.iter().find(|s| s.node == n).unwrap();
        let axis = store.component(g, ComponentRole::PrimaryAxis).unwrap();
        assert!(step(t).clip.is_some());
        assert!(step(axis).clip.is_none());
    }

    #[test]
    fn hit_test_prefers_smallest_area() {
        let (mut store, fig, g, _) = graph_with_trace();
        let _ = store.evaluate(fig);
        let rect = store.bounds(g).unwrap();
        // Inside the data box, away from any axis.
        assert_eq!(store.hit_test(fig, rect.center()), Some(g));
        // Far outside every graph: only the page matches.
        assert_eq!(store.hit_test(fig, Point::new(8000.0, 10_000.0)), Some(fig));
        let axis = store.component(g, ComponentRole::PrimaryAxis).unwrap();
        let axis_box = store.bounds(axis).unwrap();
        let hit = store.hit_test(fig, Point::new(rect.center().x, axis_box.y0 + 1.0)).unwrap();
        assert!(hit == axis || store.parent(hit) == Some(axis), "got {hit:?}");
    }
}
