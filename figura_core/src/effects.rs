// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property changes together with their dependent changes.
//!
//! Some properties drag others along: switching a graph between polar and
//! non-polar flips axis and grid visibility, turning an auto-range flag on
//! rescales that axis, and new data in a plottable rescales its container.
//! The dependent changes are returned alongside the primary one so they end
//! up in the same reversible edit.

use crate::error::EditError;
use crate::node::{
    ComponentRole, INVALID, NodeId, NodeStore, Payload, PropertyChange, PropertyKey, PropertyValue,
};
use crate::viewport::PolarLayout;

impl NodeStore {
    /// Sets a property and applies every change that follows from it.
    ///
    /// Returns all recorded changes, the primary one first. An unchanged
    /// value yields no changes and no side effects.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if the primary change is rejected.
    pub fn set_property_with_effects(
        &mut self,
        id: NodeId,
        key: PropertyKey,
        value: PropertyValue,
    ) -> Result<Vec<PropertyChange>, EditError> {
        self.check(id)?;
        let was_polar = self.is_polar_graph(id.idx);
        let Some(change) = self.set_property(id, key, value)? else {
            return Ok(Vec::new());
        };
        let turned_on = change.new == PropertyValue::Bool(true);
        let mut out = vec![change];
        match key {
            PropertyKey::CoordSys if was_polar != self.is_polar_graph(id.idx) => {
                out.extend(self.polar_defaults(id)?);
            }
            PropertyKey::AutoRangeX if turned_on => {
                out.extend(self.auto_range_axes(id, [true, false, false])?.changes);
            }
            PropertyKey::AutoRangeY if turned_on => {
                out.extend(self.auto_range_axes(id, [false, true, false])?.changes);
            }
            PropertyKey::AutoRangeZ if turned_on => {
                out.extend(self.auto_range_axes(id, [false, false, true])?.changes);
            }
            PropertyKey::Data
            | PropertyKey::X0
            | PropertyKey::X1
            | PropertyKey::Dx
            | PropertyKey::Coefficients => {
                let p = self.parent[id.idx as usize];
                if p != INVALID {
                    out.extend(self.auto_range(self.id_at(p))?.changes);
                }
            }
            _ => {}
        }
        Ok(out)
    }

    /// Shows or hides a graph's axes and grid lines to suit its coordinate
    /// system. Polar graphs hide the axes, show the grid and reset the
    /// quadrant layout; other graphs do the reverse.
    pub(crate) fn polar_defaults(&mut self, graph: NodeId) -> Result<Vec<PropertyChange>, EditError> {
        let polar = self.is_polar_graph(graph.idx);
        let mut out = Vec::new();
        let roles = [
            (ComponentRole::PrimaryAxis, polar),
            (ComponentRole::SecondaryAxis, polar),
            (ComponentRole::PrimaryGrid, !polar),
            (ComponentRole::SecondaryGrid, !polar),
        ];
        for (role, hide) in roles {
            if let Some(c) = self.component_idx(graph.idx, role) {
                let id = self.id_at(c);
                out.extend(self.store_property(id, PropertyKey::Hide, PropertyValue::Bool(hide))?);
            }
        }
        if polar {
            out.extend(self.store_property(
                graph,
                PropertyKey::Layout,
                PropertyValue::Layout(PolarLayout::Quad1),
            )?);
        }
        Ok(out)
    }

    fn is_polar_graph(&self, idx: u32) -> bool {
        matches!(&self.data[idx as usize].payload, Payload::Graph(g) if g.coord_sys.is_polar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSet;
    use crate::node::NodeKind;
    use crate::viewport::CoordSys;

    fn hidden(store: &NodeStore, g: NodeId, role: ComponentRole) -> bool {
        let c = store.component(g, role).unwrap();
        store.data(c).is_hidden()
    }

    #[test]
    fn switching_to_polar_flips_axes_and_grids() {
        let mut store = NodeStore::new();
        let g = store.create(NodeKind::Graph);
        store
            .set_property(g, PropertyKey::Layout, PropertyValue::Layout(PolarLayout::AllQuad))
            .unwrap();
        let changes = store
            .set_property_with_effects(g, PropertyKey::CoordSys, PropertyValue::CoordSys(CoordSys::Polar))
            .unwrap();
        assert_eq!(changes[0].key, PropertyKey::CoordSys);
        assert!(hidden(&store, g, ComponentRole::PrimaryAxis));
        assert!(!hidden(&store, g, ComponentRole::PrimaryGrid));
        assert_eq!(
            store.property(g, PropertyKey::Layout),
            Some(PropertyValue::Layout(PolarLayout::Quad1))
        );
        assert_eq!(changes.len(), 6);

        // Polar to polar leaves visibility alone.
        let again = store
            .set_property_with_effects(g, PropertyKey::CoordSys, PropertyValue::CoordSys(CoordSys::SemilogR))
            .unwrap();
        assert_eq!(again.len(), 1);

        store
            .set_property_with_effects(g, PropertyKey::CoordSys, PropertyValue::CoordSys(CoordSys::Cartesian))
            .unwrap();
        assert!(!hidden(&store, g, ComponentRole::SecondaryAxis));
        assert!(hidden(&store, g, ComponentRole::SecondaryGrid));
    }

    #[test]
    fn enabling_auto_range_rescales_that_axis() {
        let mut store = NodeStore::new();
        let g = store.create(NodeKind::Graph);
        let t = store.create(NodeKind::Trace);
        store.insert(g, t, 0).unwrap();
        store
            .set_property(
                t,
                PropertyKey::Data,
                PropertyValue::Data(Some(DataSet::xy(1, &[(0.0, -5.0), (10.0, 5.0)]))),
            )
            .unwrap();
        let changes = store
            .set_property_with_effects(g, PropertyKey::AutoRangeX, PropertyValue::Bool(true))
            .unwrap();
        // The flag, then start (0 -> 0 is unchanged) and end.
        assert_eq!(changes.len(), 2);
        let x = store.component(g, ComponentRole::PrimaryAxis).unwrap();
        assert_eq!(store.property(x, PropertyKey::End), Some(PropertyValue::Number(10.0)));
        let y = store.component(g, ComponentRole::SecondaryAxis).unwrap();
        assert_eq!(store.property(y, PropertyKey::End), Some(PropertyValue::Number(1.0)));
    }

    #[test]
    fn new_data_rescales_the_container() {
        let mut store = NodeStore::new();
        let g = store.create(NodeKind::Graph);
        let f = store.create(NodeKind::Function);
        store.insert(g, f, 0).unwrap();
        store
            .set_property(g, PropertyKey::AutoRangeY, PropertyValue::Bool(true))
            .unwrap();
        let changes = store
            .set_property_with_effects(f, PropertyKey::Coefficients, PropertyValue::Numbers(vec![3.0]))
            .unwrap();
        let y = store.component(g, ComponentRole::SecondaryAxis).unwrap();
        assert_eq!(store.property(y, PropertyKey::Start), Some(PropertyValue::Number(3.0)));
        assert_eq!(store.property(y, PropertyKey::End), Some(PropertyValue::Number(3.0)));
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn unchanged_values_have_no_effects() {
        let mut store = NodeStore::new();
        let g = store.create(NodeKind::Graph);
        let changes = store
            .set_property_with_effects(g, PropertyKey::CoordSys, PropertyValue::CoordSys(CoordSys::Cartesian))
            .unwrap();
        assert!(changes.is_empty());
    }
}
