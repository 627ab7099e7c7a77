// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Finding the nodes a multi-node edit applies to.
//!
//! When several nodes of one type are selected and a property is changed on
//! one of them (the *origin*), the change is carried to every structurally
//! equivalent node. The rules, checked in order:
//!
//! 1. The selection is a set of graphs and the origin is one of their axes,
//!    legends, color bars or grid lines, or a tick set of one of their axes:
//!    the component with the same role in every selected graph. Tick sets
//!    also match by position within the axis; graphs whose axis has no tick
//!    set at that position are skipped.
//! 2. The origin is a symbol, error bar or violin of a plotted element and
//!    the selection is a set of such elements: the component with the same
//!    role in every selected element.
//! 3. Otherwise: the selected nodes of exactly the origin's type.

use crate::node::{INVALID, NodeId, NodeKind, NodeStore};

impl NodeStore {
    /// Returns whether `nodes` holds at least two nodes, all of one type.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale.
    #[must_use]
    pub fn is_homogeneous(&self, nodes: &[NodeId]) -> bool {
        let Some((&first, rest)) = nodes.split_first() else {
            return false;
        };
        let kind = self.kind(first);
        !rest.is_empty() && rest.iter().all(|&n| self.kind(n) == kind)
    }

    /// The nodes a property change on `origin` applies to, given the current
    /// selection. See the module docs for the rules.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale.
    #[must_use]
    pub fn matching_set(&self, selection: &[NodeId], origin: NodeId) -> Vec<NodeId> {
        self.validate(origin);
        self.match_container_components(selection, origin)
            .or_else(|| self.match_sub_components(selection, origin))
            .unwrap_or_else(|| {
                let kind = self.kind(origin);
                selection
                    .iter()
                    .copied()
                    .filter(|&n| self.kind(n) == kind)
                    .collect()
            })
    }

    fn match_container_components(&self, selection: &[NodeId], origin: NodeId) -> Option<Vec<NodeId>> {
        if !selection.iter().all(|&n| self.kind(n).is_container()) {
            return None;
        }
        let o = origin.idx;
        // (component, tick-set ordinal)
        let (component, ordinal) = match self.data[o as usize].kind {
            NodeKind::Axis | NodeKind::Axis3D | NodeKind::Legend | NodeKind::ColorBar | NodeKind::GridLine => (o, None),
            NodeKind::TickSet => {
                let axis = self.parent[o as usize];
                if axis == INVALID {
                    return None;
                }
                let pos = self.children[axis as usize].iter().position(|&c| c == o)?;
                (axis, Some(pos))
            }
            _ => return None,
        };
        let role = self.data[component as usize].role?;
        let owner = self.parent[component as usize];
        if !selection.iter().any(|n| n.idx == owner) {
            return None;
        }
        let matched = selection
            .iter()
            .filter_map(|n| self.component_idx(n.idx, role))
            .filter_map(|c| match ordinal {
                None => Some(c),
                Some(i) => self.children[c as usize].get(i).copied(),
            })
            .map(|idx| self.id_at(idx))
            .collect();
        Some(matched)
    }

    fn match_sub_components(&self, selection: &[NodeId], origin: NodeId) -> Option<Vec<NodeId>> {
        let o = origin.idx;
        if !matches!(self.data[o as usize].kind, NodeKind::Symbol | NodeKind::ErrorBar | NodeKind::Violin) {
            return None;
        }
        let role = self.data[o as usize].role?;
        let owner = self.parent[o as usize];
        if owner == INVALID || !selection.iter().any(|n| n.idx == owner) {
            return None;
        }
        let owner_kind = self.data[owner as usize].kind;
        if !selection.iter().all(|&n| self.kind(n) == owner_kind) {
            return None;
        }
        Some(
            selection
                .iter()
                .filter_map(|n| self.component_idx(n.idx, role))
                .map(|idx| self.id_at(idx))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{ComponentRole, NodeKind, NodeStore};

    #[test]
    fn homogeneity_needs_two_of_a_kind() {
        let mut store = NodeStore::new();
        let a = store.create(NodeKind::Graph);
        let b = store.create(NodeKind::Graph);
        let c = store.create(NodeKind::Graph3D);
        assert!(!store.is_homogeneous(&[a]));
        assert!(store.is_homogeneous(&[a, b]));
        assert!(!store.is_homogeneous(&[a, b, c]));
    }

    #[test]
    fn axis_of_selected_graphs_matches_by_role() {
        let mut store = NodeStore::new();
        let graphs: Vec<_> = (0..3).map(|_| store.create(NodeKind::Graph)).collect();
        let origin = store.component(graphs[1], ComponentRole::SecondaryAxis).unwrap();
        let set = store.matching_set(&graphs, origin);
        let expected: Vec<_> = graphs
            .iter()
            .map(|&g| store.component(g, ComponentRole::SecondaryAxis).unwrap())
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn tick_sets_match_by_ordinal_and_skip_missing() {
        let mut store = NodeStore::new();
        let a = store.create(NodeKind::Graph);
        let b = store.create(NodeKind::Graph);
        let ax = store.component(a, ComponentRole::PrimaryAxis).unwrap();
        let second = store.create(NodeKind::TickSet);
        store.insert(ax, second, usize::MAX).unwrap();
        let set = store.matching_set(&[a, b], second);
        assert_eq!(set, vec![second], "b has only one tick set");

        let first = store.children(ax).next().unwrap();
        assert_eq!(store.matching_set(&[a, b], first).len(), 2);
    }

    #[test]
    fn symbols_of_selected_traces() {
        let mut store = NodeStore::new();
        let traces: Vec<_> = (0..2).map(|_| store.create(NodeKind::Trace)).collect();
        let origin = store.component(traces[0], ComponentRole::Symbol).unwrap();
        let set = store.matching_set(&traces, origin);
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|&s| store.kind(s) == NodeKind::Symbol));
    }

    #[test]
    fn falls_back_to_exact_type() {
        let mut store = NodeStore::new();
        let labels: Vec<_> = (0..3).map(|_| store.create(NodeKind::Label)).collect();
        assert_eq!(store.matching_set(&labels, labels[2]), labels);
        // An axis outside the selected graphs does not pull them in.
        let graphs: Vec<_> = (0..2).map(|_| store.create(NodeKind::Graph)).collect();
        let other = store.create(NodeKind::Graph);
        let axis = store.component(other, ComponentRole::PrimaryAxis).unwrap();
        assert!(store.matching_set(&graphs, axis).is_empty());
    }
}
