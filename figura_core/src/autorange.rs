// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis auto-ranging.
//!
//! A container's auto-ranged axes track the union of the data extents
//! reported by its immediate plottable children. X feeds the primary (or 3D
//! X) axis and Y the secondary (or 3D Y) axis. Z feeds the color bar, and
//! for 3D graphs also the Z axis, but only when at least one child reports Z
//! data.
//!
//! When no child reports a finite X or Y extent the axis collapses to
//! `[0, 0]`; the viewport widens degenerate ranges when mapping. Ranges are
//! stored as computed, even on logarithmic axes.

use understory_dirty::EagerPolicy;

use crate::data::{DataExtent, Span};
use crate::dirty;
use crate::error::EditError;
use crate::node::{ComponentRole, NodeId, NodeKind, NodeStore, Payload, PropertyChange, PropertyKey, PropertyValue};

/// The outcome of one auto-range pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoRange {
    /// Every axis endpoint that changed, in application order.
    pub changes: Vec<PropertyChange>,
}

impl AutoRange {
    /// Returns whether any range changed.
    ///
    /// When it did, the container has already been marked for re-layout and
    /// its grid lines and calibration bars for redraw.
    #[must_use]
    pub fn rescaled(&self) -> bool {
        !self.changes.is_empty()
    }
}

impl NodeStore {
    /// The union of the extents of a node's immediate plottable children.
    #[must_use]
    pub fn child_extent(&self, id: NodeId) -> DataExtent {
        self.validate(id);
        let mut ext = DataExtent::EMPTY;
        for &c in &self.children[id.idx as usize] {
            if let Some(p) = self.data[c as usize].payload.as_plottable() {
                ext.union(&p.extent());
            }
        }
        ext
    }

    /// Recomputes every axis of `container` whose auto-range flag is set.
    ///
    /// Nodes other than graphs are left alone.
    ///
    /// # Errors
    ///
    /// Fails if the handle is stale.
    pub fn auto_range(&mut self, container: NodeId) -> Result<AutoRange, EditError> {
        self.check(container)?;
        let axes = match &self.data[container.idx as usize].payload {
            Payload::Graph(g) => g.auto_range,
            Payload::Graph3D(g) => g.auto_range,
            _ => return Ok(AutoRange::default()),
        };
        self.auto_range_axes(container, axes)
    }

    /// Recomputes the selected X, Y and Z axes of `container` regardless of
    /// its auto-range flags.
    ///
    /// # Errors
    ///
    /// Fails if the handle is stale.
    pub fn auto_range_axes(&mut self, container: NodeId, axes: [bool; 3]) -> Result<AutoRange, EditError> {
        self.check(container)?;
        let c = container.idx;
        let (x, y, z): (ComponentRole, ComponentRole, &[ComponentRole]) = match self.data[c as usize].kind {
            NodeKind::Graph => (
                ComponentRole::PrimaryAxis,
                ComponentRole::SecondaryAxis,
                &[ComponentRole::ColorBar],
            ),
            NodeKind::Graph3D => (
                ComponentRole::XAxis,
                ComponentRole::YAxis,
                &[ComponentRole::ZAxis, ComponentRole::ColorBar],
            ),
            _ => return Ok(AutoRange::default()),
        };

        let ext = self.child_extent(container);
        let span = |s: Span| if s.is_valid() { (s.min, s.max) } else { (0.0, 0.0) };
        let mut targets = Vec::new();
        if axes[0] {
            targets.push((x, span(ext.x)));
        }
        if axes[1] {
            targets.push((y, span(ext.y)));
        }
        if axes[2] && ext.z.is_valid() {
            targets.extend(z.iter().map(|&r| (r, (ext.z.min, ext.z.max))));
        }

        let mut out = AutoRange::default();
        for (role, (lo, hi)) in targets {
            let Some(axis) = self.component_idx(c, role) else {
                continue;
            };
            let id = self.id_at(axis);
            for (key, v) in [(PropertyKey::Start, lo), (PropertyKey::End, hi)] {
                out.changes.extend(self.store_property(id, key, PropertyValue::Number(v))?);
            }
        }

        if out.rescaled() {
            self.dirty.mark_with(c, dirty::LAYOUT, &EagerPolicy);
            let scaled: Vec<u32> = self.components[c as usize]
                .iter()
                .chain(&self.children[c as usize])
                .copied()
                .filter(|&k| matches!(self.data[k as usize].kind, NodeKind::GridLine | NodeKind::CalibBar))
                .collect();
            for k in scaled {
                self.dirty.mark(k, dirty::CONTENT);
            }
            tracing::debug!(container = ?container, changes = out.changes.len(), "auto-ranged");
        }
        Ok(out)
    }
}
