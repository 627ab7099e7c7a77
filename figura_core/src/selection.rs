// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selection list and "select all of the same type".

use crate::node::{ComponentRole, NodeId, NodeKind, NodeStore};

/// An ordered, never-empty list of selected nodes.
///
/// The last entry is the *focus*: the anchor for alignment and the origin
/// of multi-node edits. Whenever an operation would leave the list empty it
/// falls back to the root it was given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeId>,
}

impl Selection {
    /// A selection holding only `root`.
    #[must_use]
    pub fn new(root: NodeId) -> Self {
        Self { nodes: vec![root] }
    }

    /// The selected nodes, focus last.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The focus node.
    #[must_use]
    pub fn focus(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of selected nodes; never zero.
    #[must_use]
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether exactly one node is selected.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Selects only `id`.
    pub fn set(&mut self, id: NodeId) {
        self.nodes.clear();
        self.nodes.push(id);
    }

    /// Adds `id`, or moves it to the focus position if already selected.
    pub fn extend(&mut self, id: NodeId) {
        self.nodes.retain(|&n| n != id);
        self.nodes.push(id);
    }

    /// Removes `id`; selects `root` if nothing would remain.
    pub fn deselect(&mut self, id: NodeId, root: NodeId) {
        self.retain(|n| n != id, root);
    }

    /// Keeps the nodes for which `keep` returns `true`; selects `root` if
    /// nothing would remain.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool, root: NodeId) {
        self.nodes.retain(|&n| keep(n));
        if self.nodes.is_empty() {
            self.nodes.push(root);
        }
    }

    /// Replaces the whole selection, dropping duplicates; selects `root` if
    /// `nodes` is empty.
    pub fn replace(&mut self, nodes: impl IntoIterator<Item = NodeId>, root: NodeId) {
        self.nodes.clear();
        for n in nodes {
            self.extend(n);
        }
        if self.nodes.is_empty() {
            self.nodes.push(root);
        }
    }
}

impl NodeStore {
    /// Returns every node under `root` that counts as the same type as
    /// `origin`, in pre-order.
    ///
    /// Axes, 3D axes and grid lines must share the origin's role. Tick sets
    /// must sit at the same position under an axis of the same role. Symbols,
    /// error bars and violins must share the origin's role under an owner of
    /// the same type. Everything else matches on type alone.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use]
    pub fn same_type_nodes(&self, root: NodeId, origin: NodeId) -> Vec<NodeId> {
        self.validate(root);
        self.validate(origin);
        let key = self.type_key(origin.idx);
        self.subtree_indices(root.idx)
            .into_iter()
            .filter(|&idx| self.type_key(idx) == key)
            .map(|idx| self.id_at(idx))
            .collect()
    }

    fn type_key(&self, idx: u32) -> TypeKey {
        let data = &self.data[idx as usize];
        let parent = self.parent[idx as usize];
        let parent_data = self.data.get(parent as usize);
        match data.kind {
            NodeKind::Axis | NodeKind::Axis3D | NodeKind::GridLine => TypeKey::Role(data.kind, data.role, None),
            NodeKind::Symbol | NodeKind::ErrorBar | NodeKind::Violin => {
                TypeKey::Role(data.kind, data.role, parent_data.map(|p| p.kind))
            }
            NodeKind::TickSet => {
                let ordinal = self.children.get(parent as usize).and_then(|k| k.iter().position(|&c| c == idx));
                TypeKey::Tick(parent_data.and_then(|p| p.role), ordinal)
            }
            kind => TypeKey::Kind(kind),
        }
    }
}

#[derive(PartialEq, Eq)]
enum TypeKey {
    Kind(NodeKind),
    Role(NodeKind, Option<ComponentRole>, Option<NodeKind>),
    Tick(Option<ComponentRole>, Option<usize>),
}
