// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style sets: captured appearance that can be applied to other nodes.
//!
//! A [`StyleSet`] holds the effective style attributes of a node plus a few
//! type-specific appearance flags (hidden, calibration auto-label, graph
//! coordinate system and polar layout, symbol shape and size). A container's
//! set also holds one nested set per component, keyed by role.
//!
//! Applying a set only touches properties the target defines and only when
//! the value differs from the target's effective value, so re-applying a set
//! records nothing. Axis, color bar and legend sets applied to a container
//! are forwarded to the matching component. Sets captured from a 2D graph
//! can be applied to a 3D graph and vice versa: primary maps to X and
//! secondary to Y, and components without a counterpart are skipped.

use std::collections::BTreeMap;

use crate::error::EditError;
use crate::node::{ComponentRole, NodeId, NodeKind, NodeStore, PropertyChange, PropertyKey, PropertyValue};

/// Non-style keys captured along with the style attributes.
const FLAG_KEYS: [PropertyKey; 6] = [
    PropertyKey::Hide,
    PropertyKey::AutoLabel,
    PropertyKey::CoordSys,
    PropertyKey::Layout,
    PropertyKey::SymbolShape,
    PropertyKey::SymbolSize,
];

/// A snapshot of a node's appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSet {
    source: NodeKind,
    role: Option<ComponentRole>,
    values: BTreeMap<PropertyKey, PropertyValue>,
    components: BTreeMap<ComponentRole, StyleSet>,
}

impl StyleSet {
    /// Creates an empty set tagged with `source`.
    #[must_use]
    pub fn new(source: NodeKind) -> Self {
        Self {
            source,
            role: None,
            values: BTreeMap::new(),
            components: BTreeMap::new(),
        }
    }

    /// The type the set was captured from.
    #[must_use]
    pub fn source(&self) -> NodeKind {
        self.source
    }

    /// The component role of the node the set was captured from.
    #[must_use]
    pub fn role(&self) -> Option<ComponentRole> {
        self.role
    }

    /// The captured value of `key`.
    #[must_use]
    pub fn get(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.values.get(&key)
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, key: PropertyKey, value: PropertyValue) {
        self.values.insert(key, value);
    }

    /// Iterates over the captured values in key order.
    pub fn values(&self) -> impl Iterator<Item = (PropertyKey, &PropertyValue)> {
        self.values.iter().map(|(&k, v)| (k, v))
    }

    /// The nested set of a container's component.
    #[must_use]
    pub fn component(&self, role: ComponentRole) -> Option<&Self> {
        self.components.get(&role)
    }

    /// Returns whether the set holds no values and no nested sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.components.is_empty()
    }

    /// Returns whether applying this set to a container forwards it to one
    /// of the container's components.
    fn forwards_to_component(&self) -> bool {
        matches!(
            self.source,
            NodeKind::Axis | NodeKind::Axis3D | NodeKind::ColorBar | NodeKind::Legend
        )
    }
}

impl NodeStore {
    /// Captures the appearance of a node, and of its components if it is a
    /// container.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn capture_style(&self, id: NodeId) -> StyleSet {
        let data = self.data(id);
        let mut set = StyleSet::new(data.kind());
        set.role = data.role();
        for key in PropertyKey::STYLE.into_iter().chain(FLAG_KEYS) {
            if let Some(v) = self.property(id, key) {
                set.values.insert(key, v);
            }
        }
        if data.kind().is_container() {
            for c in self.components(id) {
                if let Some(role) = self.role(c) {
                    set.components.insert(role, self.capture_style(c));
                }
            }
        }
        set
    }

    /// Applies a style set to a node and returns every recorded change,
    /// dependent changes included.
    ///
    /// Values the target does not define or rejects are skipped.
    ///
    /// # Errors
    ///
    /// Fails if the handle is stale.
    pub fn apply_style(&mut self, target: NodeId, set: &StyleSet) -> Result<Vec<PropertyChange>, EditError> {
        self.check(target)?;
        let kind = self.kind(target);
        if kind.is_container() && set.forwards_to_component() {
            let component = set
                .role
                .and_then(|r| r.counterpart_in(kind))
                .and_then(|r| self.component(target, r));
            return match component {
                Some(c) => self.apply_style(c, set),
                None => Ok(Vec::new()),
            };
        }

        let mut out = Vec::new();
        for (&key, value) in &set.values {
            match self.property(target, key) {
                Some(current) if current != *value => {}
                _ => continue,
            }
            match self.set_property_with_effects(target, key, value.clone()) {
                Ok(changes) => out.extend(changes),
                Err(EditError::InvalidValue(_) | EditError::Unsupported { .. }) => {
                    tracing::debug!(?target, ?key, "style value skipped");
                }
                Err(e) => return Err(e),
            }
        }

        if kind.is_container() {
            for (&role, sub) in &set.components {
                let Some(c) = role.counterpart_in(kind).and_then(|r| self.component(target, r)) else {
                    continue;
                };
                out.extend(self.apply_style(c, sub)?);
            }
        }
        Ok(out)
    }
}
