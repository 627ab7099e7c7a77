// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 3D-to-2D projection for 3D graphs.
//!
//! A [`Projector`] normalizes data points into the graph's 3D box, rotates
//! the box about Z by the rotation angle, tilts it about X by the elevation,
//! and applies a perspective divide. In view space `x` runs right, `z` runs
//! up and `y` points away from the viewer, so larger `y` is farther away.

use core::cmp::Ordering;

use kurbo::{Point, Rect};

use crate::transform::Transform3d;
use crate::viewport::validate_range;

/// Projection state of a 3D graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    rotate: f64,
    elevate: f64,
    extents: [(f64, f64); 3],
    dims: [f64; 3],
    distance_scale: f64,
    center: Point,
    fit: f64,
    view: Transform3d,
}

impl Projector {
    /// Rotation limit in degrees (both signs).
    pub const MAX_ROTATE: f64 = 180.0;
    /// Elevation limit in degrees (both signs).
    pub const MAX_ELEVATE: f64 = 60.0;
    /// Smallest projection distance, as a multiple of the largest box
    /// dimension.
    pub const MIN_DISTANCE_SCALE: f64 = 2.0;

    /// Creates a projector centered on `canvas`.
    ///
    /// The box is `canvas.width()` wide (X), `depth` deep (Y) and
    /// `canvas.height()` tall (Z), all in milli-inches. Angles are clamped
    /// to their limits, the distance scale is raised to at least
    /// [`MIN_DISTANCE_SCALE`](Self::MIN_DISTANCE_SCALE), and extents are
    /// validated like 2D linear ranges.
    #[must_use]
    pub fn new(
        canvas: Rect,
        depth: f64,
        rotate: f64,
        elevate: f64,
        extents: [(f64, f64); 3],
        distance_scale: f64,
    ) -> Self {
        let canvas = canvas.abs();
        let rotate = finite_or_zero(rotate).clamp(-Self::MAX_ROTATE, Self::MAX_ROTATE);
        let elevate = finite_or_zero(elevate).clamp(-Self::MAX_ELEVATE, Self::MAX_ELEVATE);
        let distance_scale = if distance_scale.is_finite() {
            distance_scale.max(Self::MIN_DISTANCE_SCALE)
        } else {
            Self::MIN_DISTANCE_SCALE
        };
        let dims = [canvas.width(), depth.max(0.0), canvas.height()];
        let extents = extents.map(|(a, b)| validate_range(a, b, false));
        let diag = (dims[0] * dims[0] + dims[1] * dims[1] + dims[2] * dims[2]).sqrt();
        let fit = if diag > 0.0 {
            canvas.width().min(canvas.height()) / diag
        } else {
            1.0
        };
        let view = Transform3d::from_rotation_x(elevate.to_radians())
            * Transform3d::from_rotation_z(rotate.to_radians());
        Self {
            rotate,
            elevate,
            extents,
            dims,
            distance_scale,
            center: canvas.center(),
            fit,
            view,
        }
    }

    /// Rotation about the vertical axis, in degrees.
    #[must_use]
    pub fn rotate(&self) -> f64 {
        self.rotate
    }

    /// Elevation of the viewer, in degrees.
    #[must_use]
    pub fn elevate(&self) -> f64 {
        self.elevate
    }

    /// The validated X, Y and Z extents.
    #[must_use]
    pub fn extents(&self) -> [(f64, f64); 3] {
        self.extents
    }

    /// The projection distance in milli-inches.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance_scale * self.dims.iter().copied().fold(0.0, f64::max)
    }

    /// Maps a data point into the centered, unrotated box.
    fn normalize(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for i in 0..3 {
            let (a, b) = self.extents[i];
            out[i] = ((p[i] - a) / (b - a) - 0.5) * self.dims[i];
        }
        out
    }

    /// The view-space position of a data point.
    #[must_use]
    pub fn view_point(&self, p: [f64; 3]) -> [f64; 3] {
        self.view.transform_point(self.normalize(p))
    }

    /// Distance of a data point from the viewer plane; larger is farther.
    #[must_use]
    pub fn depth(&self, p: [f64; 3]) -> f64 {
        self.view_point(p)[1]
    }

    /// Projects a data point to physical canvas coordinates.
    #[must_use]
    pub fn project(&self, p: [f64; 3]) -> Point {
        let v = self.view_point(p);
        let d = self.distance();
        let f = if d + v[1] > 0.0 { d / (d + v[1]) } else { 1.0 };
        Point::new(
            self.center.x + v[0] * f * self.fit,
            self.center.y + v[2] * f * self.fit,
        )
    }

    /// The world axis (0 = X, 1 = Y) that dominates the line of sight.
    ///
    /// Y dominates when `|rotate| < 45°` or `> 135°`, X when strictly
    /// between. At exactly 45° or 135° the axis whose positive side faces
    /// away from the viewer wins, which is Y at ±45° and X at ±135°.
    #[must_use]
    pub fn primary_axis(&self) -> usize {
        let a = self.rotate.abs();
        if a < 45.0 || a > 135.0 {
            1
        } else if a > 45.0 && a < 135.0 {
            0
        } else if self.view.cols[1][1] > 0.0 {
            1
        } else {
            0
        }
    }

    /// Orders two data points back to front.
    ///
    /// Points are compared along the primary axis, then the other horizontal
    /// axis, then Z. Along each axis the side away from the viewer sorts
    /// first. The order only depends on the projector state, so repeated
    /// sorts are stable.
    #[must_use]
    pub fn compare_back_to_front(&self, a: &[f64; 3], b: &[f64; 3]) -> Ordering {
        let primary = self.primary_axis();
        for axis in [primary, 1 - primary, 2] {
            let ord = if self.far_side_is_high(axis) {
                b[axis].total_cmp(&a[axis])
            } else {
                a[axis].total_cmp(&b[axis])
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Sorts points back to front (stable).
    pub fn sort_back_to_front(&self, points: &mut [[f64; 3]]) {
        points.sort_by(|a, b| self.compare_back_to_front(a, b));
    }

    /// Returns point indices in back-to-front order (stable).
    #[must_use]
    pub fn back_to_front_order(&self, points: &[[f64; 3]]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&i, &j| self.compare_back_to_front(&points[i], &points[j]));
        order
    }

    /// Whether larger data values along `axis` lie farther from the viewer.
    fn far_side_is_high(&self, axis: usize) -> bool {
        let (a, b) = self.extents[axis];
        self.view.cols[axis][1] * (b - a) > 0.0
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector(rotate: f64, elevate: f64) -> Projector {
        Projector::new(
            Rect::new(0.0, 0.0, 2000.0, 2000.0),
            2000.0,
            rotate,
            elevate,
            [(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)],
            3.0,
        )
    }

    #[test]
    fn box_center_projects_to_canvas_center() {
        let p = projector(30.0, 20.0).project([0.5, 0.5, 0.5]);
        assert!((p - Point::new(1000.0, 1000.0)).hypot() < 1e-9, "got {p:?}");
    }

    #[test]
    fn angles_and_distance_are_clamped() {
        let p = Projector::new(Rect::new(0.0, 0.0, 10.0, 10.0), 10.0, 200.0, 80.0, [(0.0, 1.0); 3], 1.0);
        assert_eq!(p.rotate(), 180.0);
        assert_eq!(p.elevate(), 60.0);
        assert_eq!(p.distance(), 20.0);
    }

    #[test]
    fn nearer_points_look_larger() {
        let p = projector(0.0, 0.0);
        let near = p.project([1.0, 0.0, 0.5]).x - 1000.0;
        let far = p.project([1.0, 1.0, 0.5]).x - 1000.0;
        assert!(near > far, "near {near} far {far}");
        assert!(p.depth([0.5, 1.0, 0.5]) > p.depth([0.5, 0.0, 0.5]));
    }

    #[test]
    fn primary_axis_follows_rotation() {
        assert_eq!(projector(0.0, 0.0).primary_axis(), 1);
        assert_eq!(projector(30.0, 0.0).primary_axis(), 1);
        assert_eq!(projector(90.0, 0.0).primary_axis(), 0);
        assert_eq!(projector(-100.0, 0.0).primary_axis(), 0);
        assert_eq!(projector(170.0, 0.0).primary_axis(), 1);
        assert_eq!(projector(45.0, 0.0).primary_axis(), 1, "tie at 45");
        assert_eq!(projector(-135.0, 0.0).primary_axis(), 0, "tie at 135");
    }

    #[test]
    fn far_side_draws_first() {
        let p = projector(0.0, 0.0);
        let far = [0.0, 1.0, 0.0];
        let near = [0.0, 0.0, 0.0];
        assert_eq!(p.compare_back_to_front(&far, &near), Ordering::Less);

        let turned = projector(90.0, 0.0);
        assert_eq!(
            turned.compare_back_to_front(&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0]),
            Ordering::Less,
            "at 90 degrees +X faces away"
        );
        let opposite = projector(-90.0, 0.0);
        assert_eq!(
            opposite.compare_back_to_front(&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0]),
            Ordering::Greater
        );
    }

    #[test]
    fn viewer_above_draws_low_points_first() {
        let p = projector(0.0, 30.0);
        let low = [0.5, 0.5, 0.0];
        let high = [0.5, 0.5, 1.0];
        assert_eq!(p.compare_back_to_front(&low, &high), Ordering::Less);
        assert!(p.depth(low) > p.depth(high));
    }

    #[test]
    fn sorting_is_deterministic() {
        let p = projector(60.0, 15.0);
        let pts = [
            [0.2, 0.9, 0.1],
            [0.8, 0.1, 0.5],
            [0.2, 0.9, 0.1],
            [0.5, 0.5, 0.9],
            [0.8, 0.3, 0.0],
        ];
        let first = p.back_to_front_order(&pts);
        let second = p.back_to_front_order(&pts);
        assert_eq!(first, second);
        assert!(
            first.iter().position(|&i| i == 0) < first.iter().position(|&i| i == 2),
            "equal points keep their input order"
        );
        let mut sorted = pts;
        p.sort_back_to_front(&mut sorted);
        assert_eq!(sorted[0], pts[first[0]]);
    }
}
