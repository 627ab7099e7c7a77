// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property and style edits.

use super::GraphicModel;
use crate::edit::ReversibleEdit;
use crate::node::{NodeId, PropertyKey, PropertyValue};
use crate::styleset::StyleSet;

impl GraphicModel {
    /// The effective value of `key` on `id`, or `None` if `id` is not live
    /// or has no such property.
    #[must_use]
    pub fn property(&self, id: NodeId, key: PropertyKey) -> Option<PropertyValue> {
        if !self.is_live(id) {
            return None;
        }
        self.store.property(id, key)
    }

    /// Sets `key` on `id` as one undoable edit, with its side effects.
    ///
    /// When at least two nodes of one type are selected, the change applies
    /// to every node matching `id` in the selection. Nodes that reject the
    /// value are skipped. Object ids must be unique in the model and never
    /// apply to more than one node.
    ///
    /// Returns whether anything changed.
    pub fn set_property(&mut self, id: NodeId, key: PropertyKey, value: PropertyValue) -> bool {
        if !self.is_live(id) {
            tracing::debug!(?id, ?key, "set rejected: not live");
            return false;
        }
        let targets = if key == PropertyKey::ObjectId {
            if let PropertyValue::Text(t) = &value {
                if self.store.find_object_id(self.root, t).is_some_and(|n| n != id) {
                    tracing::debug!(object_id = t.as_str(), "set rejected: object id in use");
                    return false;
                }
            }
            vec![id]
        } else {
            self.targets(id)
        };

        let before = self.selection.clone();
        let mut edit = ReversibleEdit::new(format!("Set {key:?}"));
        for n in targets {
            match self.store.set_property_with_effects(n, key, value.clone()) {
                Ok(changes) => edit.extend_changes(changes),
                Err(error) => tracing::debug!(%error, ?n, ?key, "set skipped"),
            }
        }
        self.commit(edit, before)
    }

    /// Captures the appearance of `id`.
    #[must_use]
    pub fn capture_style(&self, id: NodeId) -> Option<StyleSet> {
        self.is_live(id).then(|| self.store.capture_style(id))
    }

    /// Applies a captured appearance to every selected node as one edit.
    /// Returns whether anything changed.
    pub fn apply_style(&mut self, set: &StyleSet) -> bool {
        let before = self.selection.clone();
        let mut edit = ReversibleEdit::new("Apply style");
        let nodes: Vec<NodeId> = self
            .selection
            .nodes()
            .iter()
            .copied()
            .filter(|&n| self.is_live(n))
            .collect();
        for n in nodes {
            match self.store.apply_style(n, set) {
                Ok(changes) => edit.extend_changes(changes),
                Err(error) => tracing::debug!(%error, ?n, "style skipped"),
            }
        }
        self.commit(edit, before)
    }

    /// The nodes a change on `id` applies to.
    fn targets(&self, id: NodeId) -> Vec<NodeId> {
        let selected = self.selection.nodes();
        if selected.len() < 2 || !self.store.is_homogeneous(selected) {
            return vec![id];
        }
        let set = self.store.matching_set(selected, id);
        if set.contains(&id) { set } else { vec![id] }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::tests::{graph, model};
    use crate::node::{ComponentRole, NodeKind, PropertyKey, PropertyValue};
    use crate::style::Color;
    use crate::units::Measure;

    #[test]
    fn rejects_stale_and_invalid() {
        let mut m = model();
        let g = graph(&mut m);
        let detached = m.create(NodeKind::Label);
        assert!(!m.set_property(detached, PropertyKey::Text, PropertyValue::Text("x".into())));
        assert!(m.property(detached, PropertyKey::Text).is_none());
        let len = m.history().len();
        assert!(!m.set_property(g, PropertyKey::X, PropertyValue::Measure(Measure::inches(1e6))));
        assert!(!m.set_property(g, PropertyKey::Text, PropertyValue::Text("x".into())));
        assert_eq!(m.history().len(), len);
    }

    #[test]
    fn object_ids_stay_unique() {
        let mut m = model();
        let a = graph(&mut m);
        let b = graph(&mut m);
        m.set_selection([a, b]);
        let id = || PropertyValue::Text("main".into());
        assert!(m.set_property(a, PropertyKey::ObjectId, id()));
        assert_eq!(m.property(b, PropertyKey::ObjectId), Some(PropertyValue::Text(String::new())));
        assert!(!m.set_property(b, PropertyKey::ObjectId, id()));
        assert!(!m.set_property(a, PropertyKey::ObjectId, id()), "unchanged");
    }

    #[test]
    fn origin_outside_selection_edits_alone() {
        let mut m = model();
        let graphs: Vec<_> = (0..3).map(|_| graph(&mut m)).collect();
        m.set_selection([graphs[0], graphs[1]]);
        let title = PropertyValue::Text("T".into());
        assert!(m.set_property(graphs[2], PropertyKey::Title, title.clone()));
        assert_eq!(m.property(graphs[2], PropertyKey::Title), Some(title));
        assert_eq!(m.property(graphs[0], PropertyKey::Title), Some(PropertyValue::Text(String::new())));
    }

    #[test]
    fn style_transfer_is_one_edit() {
        let mut m = model();
        let a = graph(&mut m);
        let b = graph(&mut m);
        let axis = m.store().component(a, ComponentRole::PrimaryAxis).unwrap();
        let red = PropertyValue::Color(Color::rgb(255, 0, 0));
        assert!(m.set_property(axis, PropertyKey::StrokeColor, red.clone()));
        let style = m.capture_style(a).unwrap();

        m.select(b);
        let len = m.history().len();
        assert!(m.apply_style(&style));
        assert_eq!(m.history().len(), len + 1);
        let target = m.store().component(b, ComponentRole::PrimaryAxis).unwrap();
        assert_eq!(m.property(target, PropertyKey::StrokeColor), Some(red));
        assert!(!m.apply_style(&style), "nothing left to change");
        assert!(m.undo());
        assert!(!m.store().is_style_explicit(target, PropertyKey::StrokeColor));
    }
}
