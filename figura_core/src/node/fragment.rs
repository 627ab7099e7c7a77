// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detached deep copies of subtrees.

use std::collections::HashMap;

use super::id::NodeId;
use super::kind::NodeKind;
use super::payload::{NodeData, Payload};
use super::store::NodeStore;

/// A store-independent deep copy of a subtree.
///
/// Fragments carry attributes and structure only: computed state, the owning
/// model and cached automatic labels are dropped. Data sets are shared with
/// the original, never copied.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeFragment {
    /// Pre-order; the root is the first entry.
    nodes: Vec<FragmentNode>,
}

#[derive(Clone, Debug, PartialEq)]
struct FragmentNode {
    data: NodeData,
    components: Vec<usize>,
    children: Vec<usize>,
}

impl NodeFragment {
    /// The type of the fragment's root.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.nodes[0].data.kind
    }

    /// The attributes of the fragment's root.
    #[must_use]
    pub fn root(&self) -> &NodeData {
        &self.nodes[0].data
    }

    /// Number of nodes in the fragment, components included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a fragment holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeStore {
    /// Deep-copies the subtree at `id` into a fragment.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn capture(&self, id: NodeId) -> NodeFragment {
        self.validate(id);
        let order = self.subtree_indices(id.idx);
        let slot: HashMap<u32, usize> = order.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();
        let nodes = order
            .iter()
            .map(|&idx| {
                let i = idx as usize;
                let mut data = self.data[i].clone();
                if let Payload::Calib(c) = &mut data.payload {
                    c.auto_text.clear();
                }
                FragmentNode {
                    data,
                    components: self.components[i].iter().map(|c| slot[c]).collect(),
                    children: self.children[i].iter().map(|c| slot[c]).collect(),
                }
            })
            .collect();
        NodeFragment { nodes }
    }

    /// Builds a new detached subtree from a fragment and returns its root.
    ///
    /// The copy has no owner and is marked for layout and style resolution
    /// like any freshly created node.
    pub fn instantiate(&mut self, fragment: &NodeFragment) -> NodeId {
        let slots: Vec<u32> = fragment
            .nodes
            .iter()
            .map(|n| self.alloc(n.data.clone()))
            .collect();
        for (node, &p) in fragment.nodes.iter().zip(&slots) {
            for &c in &node.components {
                self.components[p as usize].push(slots[c]);
                self.link(p, slots[c]);
            }
            for &c in &node.children {
                self.children[p as usize].push(slots[c]);
                self.link(p, slots[c]);
            }
        }
        self.id_at(slots[0])
    }

    /// Deep-copies the subtree at `id` into a new detached subtree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let fragment = self.capture(id);
        self.instantiate(&fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSet;
    use crate::node::{ComponentRole, ModelId, PropertyKey, PropertyValue};
    use crate::style::Color;

    #[test]
    fn clone_preserves_structure() {
        let mut store = NodeStore::new();
        let g = store.create(NodeKind::Graph);
        let t = store.create(NodeKind::Trace);
        store.insert(g, t, 0).unwrap();

        let copy = store.clone_subtree(g);
        assert_ne!(copy, g);
        assert_eq!(store.subtree(copy).len(), store.subtree(g).len());
        let roles: Vec<_> = store.components(copy).map(|c| store.role(c)).collect();
        let orig: Vec<_> = store.components(g).map(|c| store.role(c)).collect();
        assert_eq!(roles, orig);
        let kids: Vec<_> = store.children(copy).map(|c| store.kind(c)).collect();
        assert_eq!(kids, vec![NodeKind::Trace]);
        let axis = store.component(copy, ComponentRole::PrimaryAxis).unwrap();
        assert_eq!(store.parent(axis), Some(copy));
    }

    #[test]
    fn mutating_a_clone_leaves_the_original() {
        let mut store = NodeStore::new();
        let g = store.create(NodeKind::Graph);
        let copy = store.clone_subtree(g);
        let axis = store.component(copy, ComponentRole::SecondaryAxis).unwrap();
        store
            .set_property(axis, PropertyKey::StrokeColor, PropertyValue::Color(Color::WHITE))
            .unwrap();
        let orig = store.component(g, ComponentRole::SecondaryAxis).unwrap();
        assert_eq!(
            store.raw_property(orig, PropertyKey::StrokeColor),
            Some(PropertyValue::Inherit)
        );
    }

    #[test]
    fn clones_are_unowned_and_share_data() {
        let mut store = NodeStore::new();
        let fig = store.create(NodeKind::Figure);
        store.set_owner(fig, Some(ModelId::next()));
        let g = store.create(NodeKind::Graph);
        let t = store.create(NodeKind::Trace);
        store.insert(fig, g, 0).unwrap();
        store.insert(g, t, 0).unwrap();
        let data = DataSet::xy(7, &[(1.0, 2.0)]);
        store
            .set_property(t, PropertyKey::Data, PropertyValue::Data(Some(data.clone())))
            .unwrap();

        let fragment = store.capture(g);
        assert_eq!(fragment.kind(), NodeKind::Graph);
        let copy = store.instantiate(&fragment);
        assert_eq!(store.owner(copy), None);
        assert_eq!(store.parent(copy), None);
        let t2 = store.children(copy).next().unwrap();
        assert_eq!(
            store.raw_property(t2, PropertyKey::Data),
            Some(PropertyValue::Data(Some(data)))
        );
    }

    #[test]
    fn fragments_survive_destruction_of_the_source() {
        let mut store = NodeStore::new();
        let label = store.create(NodeKind::Label);
        store
            .set_property(label, PropertyKey::Text, PropertyValue::Text("tau".into()))
            .unwrap();
        let fragment = store.capture(label);
        store.destroy(label);
        let copy = store.instantiate(&fragment);
        assert_eq!(
            store.property(copy, PropertyKey::Text),
            Some(PropertyValue::Text("tau".into()))
        );
        assert_eq!(fragment.len(), 1);
    }
}
