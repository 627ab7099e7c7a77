// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reversible edits: the unit the edit history records.
//!
//! A [`ReversibleEdit`] is an ordered batch of [`EditOp`]s. Redo replays the
//! ops in order; undo replays their inverses in reverse order. Property ops
//! store raw recorded values, so replaying an edit never triggers side
//! effects of its own: the dependent changes were recorded alongside the
//! primary one when the edit was made.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::EditError;
use crate::node::{NodeId, NodeStore, PropertyChange};

/// One step of a reversible edit.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOp {
    /// A property changed from `old` to `new`.
    Property(PropertyChange),
    /// `child` was inserted under `parent` at `index`.
    Insert {
        /// The new parent.
        parent: NodeId,
        /// The inserted node.
        child: NodeId,
        /// The index the child was inserted at.
        index: usize,
    },
    /// `child` was removed from `parent`, where it sat at `index`.
    Remove {
        /// The former parent.
        parent: NodeId,
        /// The removed node.
        child: NodeId,
        /// The index the child was removed from.
        index: usize,
    },
    /// `child` moved within its parent's child list.
    Reorder {
        /// The moved node.
        child: NodeId,
        /// The old index.
        from: usize,
        /// The new index.
        to: usize,
    },
}

impl EditOp {
    fn apply(&self, store: &mut NodeStore, redo: bool) -> Result<(), EditError> {
        match (self, redo) {
            (Self::Property(c), true) => store.restore_property(c.node, c.key, c.new.clone()),
            (Self::Property(c), false) => store.restore_property(c.node, c.key, c.old.clone()),
            (Self::Insert { parent, child, index }, true) | (Self::Remove { parent, child, index }, false) => {
                store.insert(*parent, *child, *index).map(|_| ())
            }
            (Self::Insert { child, .. }, false) | (Self::Remove { child, .. }, true) => {
                store.remove(*child).map(|_| ())
            }
            (Self::Reorder { child, to, .. }, true) => store.move_child(*child, *to).map(|_| ()),
            (Self::Reorder { child, from, .. }, false) => store.move_child(*child, *from).map(|_| ()),
        }
    }

    /// Every node this op refers to.
    fn nodes(&self) -> impl Iterator<Item = NodeId> {
        let (a, b) = match self {
            Self::Property(c) => (c.node, None),
            Self::Insert { parent, child, .. } | Self::Remove { parent, child, .. } => (*child, Some(*parent)),
            Self::Reorder { child, .. } => (*child, None),
        };
        core::iter::once(a).chain(b)
    }
}

/// A record sufficient to invert one user-visible operation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReversibleEdit {
    description: String,
    ops: Vec<EditOp>,
    selection_before: Vec<NodeId>,
    selection_after: Vec<NodeId>,
}

impl ReversibleEdit {
    /// Creates an empty edit.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ops: Vec::new(),
            selection_before: Vec::new(),
            selection_after: Vec::new(),
        }
    }

    /// A short human-readable description, such as `"Delete"`.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The recorded ops, in application order.
    #[must_use]
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Number of recorded ops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The property changes in this edit.
    pub fn changes(&self) -> impl Iterator<Item = &PropertyChange> {
        self.ops.iter().filter_map(|op| match op {
            EditOp::Property(c) => Some(c),
            _ => None,
        })
    }

    /// The selection to restore after undoing this edit.
    #[must_use]
    pub fn selection_before(&self) -> &[NodeId] {
        &self.selection_before
    }

    /// The selection to restore after redoing this edit.
    #[must_use]
    pub fn selection_after(&self) -> &[NodeId] {
        &self.selection_after
    }

    /// Returns whether the edit inserts, removes or reorders nodes.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        self.ops.iter().any(|op| !matches!(op, EditOp::Property(_)))
    }

    /// The nodes the edit changed, each once, in first-touched order.
    #[must_use]
    pub fn touched(&self) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        for op in &self.ops {
            let n = match op {
                EditOp::Property(c) => c.node,
                EditOp::Insert { child, .. } | EditOp::Remove { child, .. } | EditOp::Reorder { child, .. } => *child,
            };
            if !out.contains(&n) {
                out.push(n);
            }
        }
        out
    }

    /// Appends an op.
    pub fn push(&mut self, op: EditOp) {
        self.ops.push(op);
    }

    /// Appends property changes, in order.
    pub fn extend_changes(&mut self, changes: impl IntoIterator<Item = PropertyChange>) {
        self.ops.extend(changes.into_iter().map(EditOp::Property));
    }

    /// Records the selections on either side of the edit.
    pub fn set_selections(&mut self, before: Vec<NodeId>, after: Vec<NodeId>) {
        self.selection_before = before;
        self.selection_after = after;
    }

    /// Re-applies (`redo`) or inverts the edit on `store`.
    ///
    /// Stops at the first op that fails, leaving the ops before it applied.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing op.
    pub fn apply(&self, store: &mut NodeStore, redo: bool) -> Result<(), EditError> {
        if redo {
            self.ops.iter().try_for_each(|op| op.apply(store, true))
        } else {
            self.ops.iter().rev().try_for_each(|op| op.apply(store, false))
        }
    }

    /// Nodes inserted or removed by this edit.
    fn moved_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ops.iter().filter_map(|op| match op {
            EditOp::Insert { child, .. } | EditOp::Remove { child, .. } => Some(*child),
            _ => None,
        })
    }
}

/// Destroys detached subtrees that only `released` edits kept alive.
///
/// A node inserted or removed by a released edit is destroyed if it is still
/// alive, has no parent, is not `root`, and no node of its subtree is
/// referenced by a `retained` edit. Returns the number of subtrees destroyed.
pub(crate) fn release_detached(
    store: &mut NodeStore,
    root: NodeId,
    released: &[Arc<ReversibleEdit>],
    retained: &[Arc<ReversibleEdit>],
) -> usize {
    if released.is_empty() {
        return 0;
    }
    let referenced = referenced(retained);
    let mut destroyed = 0;
    for node in released.iter().flat_map(|e| e.moved_nodes()) {
        if is_releasable(store, root, node, &referenced) {
            store.destroy(node);
            destroyed += 1;
        }
    }
    if destroyed > 0 {
        tracing::debug!(destroyed, "released detached subtrees");
    }
    destroyed
}

/// Destroys the detached subtree under `node` unless a `retained` edit
/// refers to it. Returns whether it was destroyed.
pub(crate) fn discard_detached(
    store: &mut NodeStore,
    root: NodeId,
    node: NodeId,
    retained: &[Arc<ReversibleEdit>],
) -> bool {
    if !is_releasable(store, root, node, &referenced(retained)) {
        return false;
    }
    store.destroy(node);
    true
}

fn referenced(edits: &[Arc<ReversibleEdit>]) -> HashSet<NodeId> {
    edits
        .iter()
        .flat_map(|e| e.ops.iter())
        .flat_map(EditOp::nodes)
        .collect()
}

fn is_releasable(store: &NodeStore, root: NodeId, node: NodeId, referenced: &HashSet<NodeId>) -> bool {
    node != root
        && store.is_alive(node)
        && store.parent(node).is_none()
        && !store.subtree(node).iter().any(|n| referenced.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, PropertyKey, PropertyValue};

    fn fig_with_label() -> (NodeStore, NodeId, NodeId) {
        let mut store = NodeStore::new();
        let fig = store.create(NodeKind::Figure);
        let label = store.create(NodeKind::Label);
        store.insert(fig, label, 0).unwrap();
        (store, fig, label)
    }

    #[test]
    fn undo_runs_inverses_in_reverse() {
        let (mut store, fig, label) = fig_with_label();
        let mut edit = ReversibleEdit::new("Delete");
        let change = store
            .set_property(label, PropertyKey::Text, PropertyValue::Text("a".into()))
            .unwrap()
            .unwrap();
        edit.extend_changes([change]);
        let (parent, index) = store.remove(label).unwrap();
        edit.push(EditOp::Remove {
            parent,
            child: label,
            index,
        });

        edit.apply(&mut store, false).unwrap();
        assert_eq!(store.parent(label), Some(fig));
        assert_eq!(store.property(label, PropertyKey::Text), Some(PropertyValue::Text("Label".into())));

        edit.apply(&mut store, true).unwrap();
        assert_eq!(store.parent(label), None);
        assert_eq!(store.property(label, PropertyKey::Text), Some(PropertyValue::Text("a".into())));
    }

    #[test]
    fn reorder_restores_position() {
        let (mut store, fig, a) = fig_with_label();
        let b = store.create(NodeKind::Shape);
        store.insert(fig, b, 1).unwrap();
        let (from, to) = store.move_child(a, 1).unwrap();
        let mut edit = ReversibleEdit::new("Bring to front");
        edit.push(EditOp::Reorder { child: a, from, to });
        edit.apply(&mut store, false).unwrap();
        assert_eq!(store.children(fig).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn failing_op_reports_error() {
        let (mut store, fig, label) = fig_with_label();
        let mut edit = ReversibleEdit::new("Insert");
        edit.push(EditOp::Insert {
            parent: fig,
            child: label,
            index: 0,
        });
        // Redo inserts an already-attached node.
        assert!(edit.apply(&mut store, true).is_err());
    }

    #[test]
    fn release_destroys_only_unreferenced_detached_nodes() {
        let (mut store, fig, label) = fig_with_label();
        let kept = store.create(NodeKind::Shape);
        store.insert(fig, kept, 1).unwrap();
        let (p, i) = store.remove(label).unwrap();
        let (q, j) = store.remove(kept).unwrap();

        let mut gone = ReversibleEdit::new("Delete");
        gone.push(EditOp::Remove {
            parent: p,
            child: label,
            index: i,
        });
        let mut still = ReversibleEdit::new("Delete");
        still.push(EditOp::Remove {
            parent: q,
            child: kept,
            index: j,
        });
        let released = vec![Arc::new(gone), Arc::new(still.clone())];
        let retained = vec![Arc::new(still)];
        assert_eq!(release_detached(&mut store, fig, &released, &retained), 1);
        assert!(!store.is_alive(label));
        assert!(store.is_alive(kept));
    }
}
