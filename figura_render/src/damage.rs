// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage tracking for partial re-rendering.

use figura_core::listener::{ChangeKind, ModelEvent, ModelListener};
use kurbo::Rect;
use parking_lot::Mutex;

/// The region of a figure that needs repainting.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DamageRegion {
    /// Nothing needs repainting.
    #[default]
    None,
    /// Only these physical rectangles need repainting.
    Rects(Vec<Rect>),
    /// Everything needs repainting.
    Full,
}

impl DamageRegion {
    /// Returns whether nothing needs repainting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Adds a damaged rectangle. Empty rectangles are ignored.
    pub fn add_rect(&mut self, rect: Rect) {
        if rect.is_zero_area() {
            return;
        }
        match self {
            Self::Full => {}
            Self::Rects(rects) => {
                if !rects.iter().any(|r| r.intersect(rect) == rect) {
                    rects.push(rect);
                }
            }
            Self::None => *self = Self::Rects(vec![rect]),
        }
    }

    /// Combines another region into this one.
    pub fn merge(&mut self, other: &Self) {
        match other {
            Self::None => {}
            Self::Full => *self = Self::Full,
            Self::Rects(rects) => {
                for &r in rects {
                    self.add_rect(r);
                }
            }
        }
    }

    /// Accumulates the damage a model event reports.
    ///
    /// Content reloads damage everything. Structural and property events
    /// damage the rectangles they carry. Selection, history and
    /// modified-flag events draw nothing.
    pub fn add_event(&mut self, event: &ModelEvent) {
        match event.kind {
            ChangeKind::Reload => *self = Self::Full,
            ChangeKind::InsertOrRemove | ChangeKind::Define => {
                for &r in &event.damage {
                    self.add_rect(r);
                }
            }
            ChangeKind::Selection | ChangeKind::EditHistory | ChangeKind::ModFlagReset => {}
        }
    }

    /// The union of the damaged rectangles, or `full` if everything is
    /// damaged.
    #[must_use]
    pub fn bounds(&self, full: Rect) -> Option<Rect> {
        match self {
            Self::None => None,
            Self::Full => Some(full),
            Self::Rects(rects) => rects.iter().copied().reduce(|a, b| a.union(b)),
        }
    }
}

/// A [`ModelListener`] that accumulates damage until it is taken.
#[derive(Debug, Default)]
pub struct DamageTracker {
    region: Mutex<DamageRegion>,
}

impl DamageTracker {
    /// Creates a tracker with no damage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulated damage and resets it.
    pub fn take(&self) -> DamageRegion {
        core::mem::take(&mut *self.region.lock())
    }

    /// Returns whether any damage is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.region.lock().is_empty()
    }
}

impl ModelListener for DamageTracker {
    fn model_changed(&self, event: &ModelEvent) {
        self.region.lock().add_event(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use figura_core::clipboard::Clipboard;
    use figura_core::model::GraphicModel;
    use figura_core::node::{NodeKind, PropertyKey, PropertyValue};

    use super::*;

    #[test]
    fn contained_rects_are_dropped() {
        let mut d = DamageRegion::None;
        d.add_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        d.add_rect(Rect::new(10.0, 10.0, 20.0, 20.0));
        d.add_rect(Rect::new(5.0, 5.0, 5.0, 50.0));
        assert_eq!(d, DamageRegion::Rects(vec![Rect::new(0.0, 0.0, 100.0, 100.0)]));
        d.merge(&DamageRegion::Full);
        d.add_rect(Rect::new(200.0, 0.0, 300.0, 10.0));
        assert_eq!(d, DamageRegion::Full);
    }

    #[test]
    fn tracker_collects_model_damage() {
        let mut m = GraphicModel::new(Clipboard::new());
        let tracker = Arc::new(DamageTracker::new());
        m.add_listener(tracker.clone());
        let root = m.root();
        let g = m.insert_new(root, NodeKind::Graph).unwrap();
        let frame = m.store().viewport(g).unwrap().rect();
        let damage = tracker.take();
        let bounds = damage.bounds(Rect::ZERO).unwrap();
        assert_eq!(bounds.intersect(frame), frame, "new graph's box is damaged");

        m.select(root);
        assert!(!tracker.is_dirty(), "selection draws nothing");
        assert!(m.set_property(g, PropertyKey::Hide, PropertyValue::Bool(true)));
        assert!(tracker.is_dirty());

        m.reset();
        assert_eq!(tracker.take(), DamageRegion::Full);
    }
}
