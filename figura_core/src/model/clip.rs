// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipboard operations and whole-model replacement.

use super::GraphicModel;
use crate::data::DataSet;
use crate::edit::{ReversibleEdit, release_detached};
use crate::error::EditError;
use crate::listener::ChangeKind;
use crate::node::{NodeFragment, NodeId, NodeKind, PropertyKey, PropertyValue};
use crate::selection::Selection;

impl GraphicModel {
    /// Copies the selected regular children to the clipboard, replacing its
    /// contents. Returns the number of copied subtrees; nothing is copied
    /// (and the clipboard is left alone) if none qualifies.
    pub fn copy(&mut self) -> usize {
        let nodes = self.top_level_selection(|m, n| m.store.role(n).is_none());
        if nodes.is_empty() {
            return 0;
        }
        let fragments: Vec<NodeFragment> = nodes.iter().map(|&n| self.store.capture(n)).collect();
        tracing::debug!(count = fragments.len(), "copied to clipboard");
        self.clipboard.set(fragments);
        nodes.len()
    }

    /// Copies the selection, then deletes it as one edit.
    pub fn cut(&mut self) -> bool {
        let nodes = self.top_level_selection(|m, n| m.store.role(n).is_none());
        if nodes.is_empty() {
            return false;
        }
        self.copy();
        self.delete_nodes("Cut", &nodes)
    }

    /// Inserts a fresh copy of every clipboard fragment and selects the
    /// inserted nodes, as one edit.
    ///
    /// Each copy goes under the focus, or under its closest ancestor that
    /// accepts the copy's type. Object ids already used in this model are
    /// cleared on the copies.
    pub fn paste(&mut self) -> bool {
        let fragments = self.clipboard.contents();
        if fragments.is_empty() {
            return false;
        }
        let before = self.selection.clone();
        let mut edit = ReversibleEdit::new("Paste");
        let mut inserted = Vec::new();
        for fragment in &fragments {
            let copy = self.store.instantiate(fragment);
            self.clear_colliding_ids(copy);
            let target = self.paste_target(fragment.kind());
            let result = match target {
                Some(parent) => self.insert_recorded(&mut edit, parent, copy, usize::MAX),
                None => Err(EditError::Disallowed {
                    parent: self.store.kind(self.focus()),
                    child: fragment.kind(),
                }),
            };
            match result {
                Ok(()) => inserted.push(copy),
                Err(error) => {
                    tracing::debug!(%error, kind = ?fragment.kind(), "paste skipped");
                    if self.store.parent(copy).is_none() {
                        self.store.destroy(copy);
                    }
                }
            }
        }
        if inserted.is_empty() {
            return false;
        }
        self.selection.replace(inserted, self.root);
        self.commit(edit, before)
    }

    /// Replaces the whole figure with a copy of `figure`.
    ///
    /// Clears the history and the modified flag, selects the new root and
    /// notifies [`ChangeKind::Reload`]. Returns `false` if the fragment is
    /// not a figure.
    pub fn replace_content(&mut self, figure: &NodeFragment) -> bool {
        if figure.kind() != NodeKind::Figure {
            tracing::debug!(kind = ?figure.kind(), "replacement content is not a figure");
            return false;
        }
        let root = self.store.instantiate(figure);
        self.swap_root(root);
        true
    }

    /// Replaces the figure with an empty one.
    pub fn reset(&mut self) {
        let root = self.store.create(NodeKind::Figure);
        self.swap_root(root);
    }

    /// Stores data sets into the plottables whose object ids match, with
    /// their auto-range side effects. Returns the number of filled nodes.
    ///
    /// Not undoable: the history is cleared when anything changed.
    pub fn inject_data<S: AsRef<str>>(&mut self, data: impl IntoIterator<Item = (S, DataSet)>) -> usize {
        let mut filled = Vec::new();
        for (object_id, set) in data {
            let Some(n) = self.store.find_object_id(self.root, object_id.as_ref()) else {
                tracing::debug!(object_id = object_id.as_ref(), "no placeholder for data");
                continue;
            };
            match self
                .store
                .set_property_with_effects(n, PropertyKey::Data, PropertyValue::Data(Some(set)))
            {
                Ok(changes) if !changes.is_empty() => filled.push(n),
                Ok(_) => {}
                Err(error) => tracing::debug!(%error, ?n, "data injection skipped"),
            }
        }
        if filled.is_empty() {
            return 0;
        }
        let released = self.history.clear();
        release_detached(&mut self.store, self.root, &released, &[]);
        let damage = self.evaluate();
        self.modified = true;
        let count = filled.len();
        self.notify(ChangeKind::Define, filled, damage);
        self.notify(ChangeKind::EditHistory, Vec::new(), Vec::new());
        count
    }

    // -- Helpers --

    /// Installs `root` as the new figure and destroys the old tree.
    fn swap_root(&mut self, root: NodeId) {
        let released = self.history.clear();
        release_detached(&mut self.store, self.root, &released, &[]);
        let old = core::mem::replace(&mut self.root, root);
        self.store.destroy(old);
        self.store.set_owner(root, Some(self.id));
        self.selection = Selection::new(root);
        self.modified = false;
        let damage = self.evaluate();
        self.notify(ChangeKind::Reload, vec![root], damage);
        self.notify(ChangeKind::EditHistory, Vec::new(), Vec::new());
    }

    /// The focus or its closest ancestor that accepts a child of `kind`.
    fn paste_target(&self, kind: NodeKind) -> Option<NodeId> {
        let mut at = Some(self.focus());
        while let Some(n) = at {
            if self.store.kind(n).can_insert(kind) {
                return Some(n);
            }
            at = self.store.parent(n);
        }
        None
    }

    fn clear_colliding_ids(&mut self, copy: NodeId) {
        for n in self.store.subtree(copy) {
            let taken = match self.store.data(n).object_id() {
                Some(id) => self.store.find_object_id(self.root, id).is_some(),
                None => false,
            };
            if taken {
                let _ = self
                    .store
                    .store_property(n, PropertyKey::ObjectId, PropertyValue::Text(String::new()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::clipboard::Clipboard;
    use crate::data::DataSet;
    use crate::model::GraphicModel;
    use crate::model::tests::{graph, model};
    use crate::node::{ComponentRole, NodeKind, PropertyKey, PropertyValue};

    #[test]
    fn cut_then_undo_keeps_stale_clone() {
        let mut m = model();
        let g = graph(&mut m);
        let a = m.insert_new(g, NodeKind::Label).unwrap();
        let _b = m.insert_new(g, NodeKind::Shape).unwrap();
        m.select(a);
        assert!(m.cut());
        assert_eq!(m.clipboard().len(), 1);
        assert!(m.store().parent(a).is_none());
        assert_eq!(m.selection().nodes(), &[g]);
        assert_eq!(m.undo_description().as_deref(), Some("Cut"));

        assert!(m.undo());
        assert_eq!(m.store().parent(a), Some(g));
        assert_eq!(m.store().child_index(a), Some(0));
        assert_eq!(m.clipboard().len(), 1);
    }

    #[test]
    fn cut_never_empties_selection() {
        let mut m = model();
        let root = m.root();
        assert!(!m.cut(), "the root cannot be cut");
        let g = graph(&mut m);
        let axis = m.store().component(g, ComponentRole::PrimaryAxis).unwrap();
        m.select(axis);
        assert!(!m.cut(), "components cannot be cut");
        m.select(g);
        assert!(m.cut());
        assert_eq!(m.selection().nodes(), &[root]);
    }

    #[test]
    fn paste_selects_copies_under_accepting_ancestor() {
        let mut m = model();
        let g = graph(&mut m);
        let label = m.insert_new(g, NodeKind::Label).unwrap();
        let trace = m.insert_new(g, NodeKind::Trace).unwrap();
        m.set_selection([label, trace]);
        assert_eq!(m.copy(), 2);
        let axis = m.store().component(g, ComponentRole::PrimaryAxis).unwrap();
        m.select(axis);
        let len = m.history().len();

        assert!(m.paste());
        assert_eq!(m.history().len(), len + 1);
        let pasted = m.selection().nodes().to_vec();
        assert_eq!(pasted.len(), 2);
        for &n in &pasted {
            assert_eq!(m.store().parent(n), Some(g));
            assert!(n != label && n != trace);
        }
        assert!(m.undo());
        assert!(pasted.iter().all(|&n| m.store().parent(n).is_none()));
        assert_eq!(m.selection().nodes(), &[axis]);
    }

    #[test]
    fn paste_clears_colliding_object_ids() {
        let mut m = model();
        let root = m.root();
        let label = m.insert_new(root, NodeKind::Label).unwrap();
        assert!(m.set_property(label, PropertyKey::ObjectId, PropertyValue::Text("a".into())));
        m.copy();
        assert!(m.paste());
        let copy = m.focus();
        assert_ne!(copy, label);
        assert_eq!(m.store().data(copy).object_id(), None);
    }

    #[test]
    fn clipboard_is_shared_between_models() {
        let clipboard = Clipboard::new();
        let mut a = GraphicModel::new(clipboard.clone());
        let mut b = GraphicModel::new(clipboard);
        let _ = graph(&mut a);
        assert_eq!(a.copy(), 1);
        assert!(b.paste());
        assert_eq!(b.store().kind(b.focus()), NodeKind::Graph);
        assert_eq!(b.store().parent(b.focus()), Some(b.root()));
    }

    #[test]
    fn replace_content_clears_history() {
        let mut m = model();
        let _ = graph(&mut m);
        let snapshot = m.store().capture(m.root());
        m.reset();
        assert_eq!(m.store().children(m.root()).len(), 0);
        assert!(!m.can_undo() && !m.is_modified());

        assert!(m.replace_content(&snapshot));
        let root = m.root();
        assert_eq!(m.store().children(root).len(), 1);
        assert_eq!(m.selection().nodes(), &[root]);
        assert!(m.is_live(m.store().children(root).next().unwrap()));

        let g = m.store().children(root).next().unwrap();
        let graph_only = m.store().capture(g);
        assert!(!m.replace_content(&graph_only));
    }

    #[test]
    fn inject_data_fills_placeholders() {
        let mut m = model();
        let g = graph(&mut m);
        assert!(m.set_property(g, PropertyKey::AutoRangeX, PropertyValue::Bool(true)));
        let t = m.insert_new(g, NodeKind::Trace).unwrap();
        assert!(m.set_property(t, PropertyKey::ObjectId, PropertyValue::Text("p1".into())));
        let set = DataSet::xy(3, &[(1.0, 0.0), (9.0, 1.0)]);
        assert_eq!(m.inject_data([("p1", set.clone()), ("missing", set)]), 1);
        assert!(!m.can_undo());
        let x = m.store().component(g, ComponentRole::PrimaryAxis).unwrap();
        assert_eq!(m.store().property(x, PropertyKey::End), Some(PropertyValue::Number(9.0)));
    }
}
