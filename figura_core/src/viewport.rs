// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D coordinate systems and the user-to-physical mapping of a container.
//!
//! A [`Viewport2D`] is an immutable value derived from a container's data box
//! and its axis ranges. It maps user (data) coordinates into physical
//! milli-inches and back. Ranges are validated on construction, so every
//! viewport maps finite input to finite output.

use kurbo::{Point, Rect};

use crate::units::{Measure, Unit};

/// The coordinate system of a 2D graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoordSys {
    /// Linear X and Y.
    #[default]
    Cartesian,
    /// Logarithmic X, linear Y.
    SemilogX,
    /// Linear X, logarithmic Y.
    SemilogY,
    /// Logarithmic X and Y.
    LogLog,
    /// Theta (degrees) on the primary axis, linear radius on the secondary.
    Polar,
    /// Theta (degrees) on the primary axis, logarithmic radius.
    SemilogR,
}

impl CoordSys {
    /// Returns whether this is a polar system.
    #[must_use]
    pub const fn is_polar(self) -> bool {
        matches!(self, Self::Polar | Self::SemilogR)
    }

    /// Returns whether the primary axis is logarithmic.
    #[must_use]
    pub const fn primary_log(self) -> bool {
        matches!(self, Self::SemilogX | Self::LogLog)
    }

    /// Returns whether the secondary (or radial) axis is logarithmic.
    #[must_use]
    pub const fn secondary_log(self) -> bool {
        matches!(self, Self::SemilogY | Self::LogLog | Self::SemilogR)
    }
}

/// Placement of the polar origin within the data box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PolarLayout {
    /// Origin at the bottom-left corner.
    #[default]
    Quad1,
    /// Origin at the bottom-right corner.
    Quad2,
    /// Origin at the top-right corner.
    Quad3,
    /// Origin at the top-left corner.
    Quad4,
    /// Origin at the center; the unit radius is halved.
    AllQuad,
}

/// Returns a usable range for mapping.
///
/// Non-finite or degenerate ranges are widened: `[v, v]` becomes
/// `[v - d, v + d]` with `d = max(1, |v| * 1e-9)` (or `[0, 1]` for zero) on
/// a linear axis and `[v / 10, v * 10]` on a log axis. Linear endpoints are
/// clamped to `±f64::MAX / 2` so the span stays finite. Non-positive
/// endpoints of a log axis are replaced by one decade below the positive
/// endpoint, or by `[1, 10]` if neither endpoint is positive. Reversed
/// ranges are preserved.
#[must_use]
pub fn validate_range(start: f64, end: f64, log: bool) -> (f64, f64) {
    const LIMIT: f64 = f64::MAX / 2.0;
    if !start.is_finite() || !end.is_finite() {
        return if log { (1.0, 10.0) } else { (0.0, 1.0) };
    }
    if log {
        let (s, e) = match (start > 0.0, end > 0.0) {
            (true, true) => (start, end),
            (false, true) => (end / 10.0, end),
            (true, false) => (start, start / 10.0),
            (false, false) => return (1.0, 10.0),
        };
        if s != e {
            (s, e)
        } else if (s * 10.0).is_finite() {
            (s / 10.0, s * 10.0)
        } else {
            (s / 100.0, s)
        }
    } else {
        let (s, e) = (start.clamp(-LIMIT, LIMIT), end.clamp(-LIMIT, LIMIT));
        if s != e {
            (s, e)
        } else if s == 0.0 {
            (0.0, 1.0)
        } else {
            let d = (s.abs() * 1e-9).max(1.0);
            (s - d, s + d)
        }
    }
}

/// Returns the major tick values inside `[start, end]`.
///
/// A positive `interval` is used as the linear spacing; otherwise a
/// 1/2/5 spacing giving roughly five ticks is chosen. Log axes tick at
/// powers of ten. At most a thousand and one linear ticks are produced.
#[must_use]
pub fn major_ticks(start: f64, end: f64, interval: f64, log: bool) -> Vec<f64> {
    const MAX_TICKS: f64 = 1000.0;
    let (s, e) = validate_range(start, end, log);
    let (lo, hi) = (s.min(e), s.max(e));
    let mut out = Vec::new();
    if log {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "decade exponents of finite positive values fit in i32"
        )]
        let (first, last) = (
            (lo.log10() - 1e-9).ceil() as i32,
            (hi.log10() + 1e-9).floor() as i32,
        );
        for k in first..=last {
            out.push(10f64.powi(k));
        }
        return out;
    }
    let span = hi - lo;
    let mut step = if interval > 0.0 { interval } else { nice_step(span) };
    if span / step > MAX_TICKS {
        step = nice_step(span);
    }
    let first = (lo / step).ceil();
    let last = (hi / step + 1e-9).floor();
    if step <= 0.0 || !step.is_finite() || !first.is_finite() || !last.is_finite() {
        return out;
    }
    let count = (last - first).min(MAX_TICKS);
    let eps = step * 1e-9;
    let mut k = 0.0;
    while k <= count {
        let v = (first + k) * step;
        // Snap values like 0.30000000000000004.
        out.push(if v.abs() < eps { 0.0 } else { v });
        k += 1.0;
    }
    out.dedup();
    out
}

fn nice_step(span: f64) -> f64 {
    if span <= 0.0 || !span.is_finite() {
        return 1.0;
    }
    let raw = span / 5.0;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let k = if norm < 1.5 {
        1.0
    } else if norm < 3.0 {
        2.0
    } else if norm < 7.0 {
        5.0
    } else {
        10.0
    };
    k * mag
}

/// The mapping from a container's user coordinates into physical
/// milli-inches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport2D {
    rect: Rect,
    coord: CoordSys,
    layout: PolarLayout,
    x: (f64, f64),
    y: (f64, f64),
}

impl Viewport2D {
    /// Creates a viewport over `rect`, validating both ranges.
    #[must_use]
    pub fn new(
        rect: Rect,
        coord: CoordSys,
        layout: PolarLayout,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Self {
        Self {
            rect: rect.abs(),
            coord,
            layout,
            x: validate_range(x_range.0, x_range.1, coord.primary_log()),
            y: validate_range(y_range.0, y_range.1, coord.secondary_log()),
        }
    }

    /// A Cartesian viewport whose user units are inches on the page.
    #[must_use]
    pub fn identity(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(
            rect,
            CoordSys::Cartesian,
            PolarLayout::Quad1,
            (rect.x0 / 1000.0, rect.x1 / 1000.0),
            (rect.y0 / 1000.0, rect.y1 / 1000.0),
        )
    }

    /// The physical data box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The coordinate system.
    #[must_use]
    pub fn coord_sys(&self) -> CoordSys {
        self.coord
    }

    /// The polar quadrant layout (meaningful for polar systems only).
    #[must_use]
    pub fn layout(&self) -> PolarLayout {
        self.layout
    }

    /// The validated primary range.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        self.x
    }

    /// The validated secondary range.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        self.y
    }

    /// The polar origin in physical coordinates, or `None` for non-polar
    /// systems.
    #[must_use]
    pub fn origin(&self) -> Option<Point> {
        if !self.coord.is_polar() {
            return None;
        }
        let r = self.rect;
        Some(match self.layout {
            PolarLayout::Quad1 => Point::new(r.x0, r.y0),
            PolarLayout::Quad2 => Point::new(r.x1, r.y0),
            PolarLayout::Quad3 => Point::new(r.x1, r.y1),
            PolarLayout::Quad4 => Point::new(r.x0, r.y1),
            PolarLayout::AllQuad => r.center(),
        })
    }

    /// Physical length of one radial user unit (one decade for
    /// [`CoordSys::SemilogR`]), or `None` for non-polar systems.
    #[must_use]
    pub fn unit_radius(&self) -> Option<f64> {
        if !self.coord.is_polar() {
            return None;
        }
        let dim = self.rect.width().min(self.rect.height());
        let span = if self.coord == CoordSys::SemilogR {
            (self.y.1.log10() - self.y.0.log10()).abs()
        } else {
            (self.y.1 - self.y.0).abs()
        };
        let unit = dim / span;
        Some(if self.layout == PolarLayout::AllQuad {
            unit / 2.0
        } else {
            unit
        })
    }

    /// Maps a user point to physical coordinates.
    ///
    /// Returns `None` for non-finite input or for a non-positive value on a
    /// logarithmic axis.
    #[must_use]
    pub fn user_to_physical(&self, p: Point) -> Option<Point> {
        if !p.x.is_finite() || !p.y.is_finite() {
            return None;
        }
        if self.coord.is_polar() {
            let origin = self.origin()?;
            let unit = self.unit_radius()?;
            let r = if self.coord == CoordSys::SemilogR {
                if p.y <= 0.0 {
                    return None;
                }
                (p.y.log10() - self.y.0.log10()) * unit
            } else {
                (p.y - self.y.0) * unit
            };
            let (s, c) = p.x.to_radians().sin_cos();
            return Some(Point::new(origin.x + r * c, origin.y + r * s));
        }
        Some(Point::new(self.map_x(p.x)?, self.map_y(p.y)?))
    }

    /// Maps a physical point back to user coordinates.
    ///
    /// Polar angles are reported in `[0, 360)` degrees.
    #[must_use]
    pub fn physical_to_user(&self, p: Point) -> Point {
        if self.coord.is_polar() {
            let (origin, unit) = match (self.origin(), self.unit_radius()) {
                (Some(o), Some(u)) if u != 0.0 => (o, u),
                _ => return Point::ZERO,
            };
            let d = p - origin;
            let theta = d.y.atan2(d.x).to_degrees().rem_euclid(360.0);
            let r = d.hypot() / unit;
            let radius = if self.coord == CoordSys::SemilogR {
                10f64.powf(self.y.0.log10() + r)
            } else {
                self.y.0 + r
            };
            return Point::new(theta, radius);
        }
        Point::new(
            unmap(p.x, self.rect.x0, self.rect.width(), self.x, self.coord.primary_log()),
            unmap(p.y, self.rect.y0, self.rect.height(), self.y, self.coord.secondary_log()),
        )
    }

    /// Resolves a pair of location measures to a physical point.
    ///
    /// Physical units are offsets from the data box's bottom-left corner,
    /// percentages are fractions of its width and height, and user units map
    /// through the coordinate system. In a polar system a user pair maps
    /// through the polar transform; mixed pairs fall back to a linear
    /// mapping per axis.
    #[must_use]
    pub fn measure_point(&self, x: Measure, y: Measure) -> Option<Point> {
        if self.coord.is_polar() && x.unit == Unit::User && y.unit == Unit::User {
            return self.user_to_physical(Point::new(x.value, y.value));
        }
        let px = match x.unit {
            Unit::Percent => self.rect.x0 + x.value / 100.0 * self.rect.width(),
            Unit::User if self.coord.is_polar() => linear(x.value, self.rect.x0, self.rect.width(), self.x),
            Unit::User => self.map_x(x.value)?,
            _ => self.rect.x0 + x.to_milli_in()?,
        };
        let py = match y.unit {
            Unit::Percent => self.rect.y0 + y.value / 100.0 * self.rect.height(),
            Unit::User if self.coord.is_polar() => linear(y.value, self.rect.y0, self.rect.height(), self.y),
            Unit::User => self.map_y(y.value)?,
            _ => self.rect.y0 + y.to_milli_in()?,
        };
        Some(Point::new(px, py))
    }

    /// Re-expresses a physical point as a pair of measures in the given
    /// units; the inverse of [`measure_point`](Self::measure_point).
    #[must_use]
    pub fn point_measure(&self, p: Point, units: (Unit, Unit)) -> (Measure, Measure) {
        let polar = self.coord.is_polar();
        if polar && units == (Unit::User, Unit::User) {
            let u = self.physical_to_user(p);
            return (Measure::user(u.x), Measure::user(u.y));
        }
        let user = self.physical_to_user(p);
        let x = match units.0 {
            Unit::Percent => Measure::percent(fraction(p.x, self.rect.x0, self.rect.width()) * 100.0),
            Unit::User if polar => Measure::user(unmap(p.x, self.rect.x0, self.rect.width(), self.x, false)),
            Unit::User => Measure::user(user.x),
            unit => Measure::from_milli_in(p.x - self.rect.x0, unit).unwrap_or(Measure::new(0.0, unit)),
        };
        let y = match units.1 {
            Unit::Percent => Measure::percent(fraction(p.y, self.rect.y0, self.rect.height()) * 100.0),
            Unit::User if polar => Measure::user(unmap(p.y, self.rect.y0, self.rect.height(), self.y, false)),
            Unit::User => Measure::user(user.y),
            unit => Measure::from_milli_in(p.y - self.rect.y0, unit).unwrap_or(Measure::new(0.0, unit)),
        };
        (x, y)
    }

    /// Resolves a length measure along the horizontal (`true`) or vertical
    /// axis to milli-inches.
    ///
    /// User lengths are scaled linearly by the validated range span.
    #[must_use]
    pub fn measure_length(&self, m: Measure, horizontal: bool) -> Option<f64> {
        let (size, range) = if horizontal {
            (self.rect.width(), self.x)
        } else {
            (self.rect.height(), self.y)
        };
        match m.unit {
            Unit::Percent => Some(m.value / 100.0 * size),
            Unit::User => Some(m.value / (range.1 - range.0).abs() * size),
            _ => m.to_milli_in(),
        }
    }

    /// The user-unit span covered by `milli_in` physical units along one
    /// axis, used for calibration labels.
    #[must_use]
    pub fn user_length(&self, milli_in: f64, horizontal: bool) -> f64 {
        let (size, range) = if horizontal {
            (self.rect.width(), self.x)
        } else {
            (self.rect.height(), self.y)
        };
        if size == 0.0 {
            return 0.0;
        }
        milli_in / size * (range.1 - range.0).abs()
    }

    fn map_x(&self, v: f64) -> Option<f64> {
        map(v, self.rect.x0, self.rect.width(), self.x, self.coord.primary_log())
    }

    fn map_y(&self, v: f64) -> Option<f64> {
        map(v, self.rect.y0, self.rect.height(), self.y, self.coord.secondary_log())
    }
}

fn map(v: f64, origin: f64, size: f64, range: (f64, f64), log: bool) -> Option<f64> {
    if log {
        if v <= 0.0 {
            return None;
        }
        let (a, b) = (range.0.log10(), range.1.log10());
        Some(origin + (v.log10() - a) / (b - a) * size)
    } else {
        Some(linear(v, origin, size, range))
    }
}

fn linear(v: f64, origin: f64, size: f64, range: (f64, f64)) -> f64 {
    origin + (v - range.0) / (range.1 - range.0) * size
}

fn fraction(p: f64, origin: f64, size: f64) -> f64 {
    if size == 0.0 { 0.0 } else { (p - origin) / size }
}

fn unmap(p: f64, origin: f64, size: f64, range: (f64, f64), log: bool) -> f64 {
    if size == 0.0 {
        return range.0;
    }
    let f = (p - origin) / size;
    if log {
        let (a, b) = (range.0.log10(), range.1.log10());
        10f64.powf(a + f * (b - a))
    } else {
        range.0 + f * (range.1 - range.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-6
    }

    fn box_2500() -> Rect {
        Rect::new(750.0, 750.0, 3250.0, 3250.0)
    }

    #[test]
    fn range_validation() {
        assert_eq!(validate_range(3.0, 3.0, false), (2.0, 4.0));
        assert_eq!(validate_range(0.0, 0.0, false), (0.0, 1.0));
        assert_eq!(validate_range(10.0, 0.0, false), (10.0, 0.0), "reversed kept");
        assert_eq!(validate_range(-1.0, 100.0, true), (10.0, 100.0));
        assert_eq!(validate_range(100.0, 0.0, true), (100.0, 10.0));
        assert_eq!(validate_range(-1.0, 0.0, true), (1.0, 10.0));
        assert_eq!(validate_range(5.0, 5.0, true), (0.5, 50.0));
        assert_eq!(validate_range(f64::NAN, 1.0, false), (0.0, 1.0));
    }

    #[test]
    fn cartesian_round_trip() {
        let vp = Viewport2D::new(box_2500(), CoordSys::Cartesian, PolarLayout::Quad1, (0.0, 10.0), (-5.0, 5.0));
        let p = vp.user_to_physical(Point::new(5.0, 0.0)).unwrap();
        assert!(close(p, Point::new(2000.0, 2000.0)), "got {p:?}");
        let back = vp.physical_to_user(p);
        assert!(close(back, Point::new(5.0, 0.0)), "got {back:?}");
    }

    #[test]
    fn reversed_range_flips_direction() {
        let vp = Viewport2D::new(box_2500(), CoordSys::Cartesian, PolarLayout::Quad1, (10.0, 0.0), (0.0, 1.0));
        let p = vp.user_to_physical(Point::new(10.0, 0.0)).unwrap();
        assert!(close(p, Point::new(750.0, 750.0)), "got {p:?}");
    }

    #[test]
    fn log_axis_rejects_non_positive() {
        let vp = Viewport2D::new(box_2500(), CoordSys::SemilogX, PolarLayout::Quad1, (1.0, 100.0), (0.0, 1.0));
        assert!(vp.user_to_physical(Point::new(0.0, 0.5)).is_none());
        let mid = vp.user_to_physical(Point::new(10.0, 0.5)).unwrap();
        assert!(close(mid, Point::new(2000.0, 2000.0)), "one decade of two: {mid:?}");
        let back = vp.physical_to_user(mid);
        assert!(close(back, Point::new(10.0, 0.5)), "got {back:?}");
    }

    #[test]
    fn polar_unit_radius_and_origin() {
        let rect = Rect::new(0.0, 0.0, 2000.0, 1000.0);
        let vp = Viewport2D::new(rect, CoordSys::Polar, PolarLayout::Quad1, (0.0, 90.0), (0.0, 4.0));
        assert_eq!(vp.unit_radius(), Some(250.0));
        assert_eq!(vp.origin(), Some(Point::new(0.0, 0.0)));
        let p = vp.user_to_physical(Point::new(90.0, 2.0)).unwrap();
        assert!(close(p, Point::new(0.0, 500.0)), "got {p:?}");

        let all = Viewport2D::new(rect, CoordSys::Polar, PolarLayout::AllQuad, (0.0, 360.0), (0.0, 4.0));
        assert_eq!(all.unit_radius(), Some(125.0));
        assert_eq!(all.origin(), Some(Point::new(1000.0, 500.0)));
        let q3 = Viewport2D::new(rect, CoordSys::Polar, PolarLayout::Quad3, (0.0, 90.0), (0.0, 4.0));
        assert_eq!(q3.origin(), Some(Point::new(2000.0, 1000.0)));
    }

    #[test]
    fn semilog_r_unit_radius_counts_decades() {
        let rect = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let vp = Viewport2D::new(rect, CoordSys::SemilogR, PolarLayout::Quad1, (0.0, 90.0), (1.0, 100.0));
        assert_eq!(vp.unit_radius(), Some(500.0));
        let p = vp.user_to_physical(Point::new(0.0, 10.0)).unwrap();
        assert!(close(p, Point::new(500.0, 0.0)), "got {p:?}");
        let back = vp.physical_to_user(p);
        assert!(close(back, Point::new(0.0, 10.0)), "got {back:?}");
    }

    #[test]
    fn polar_inverse() {
        let rect = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let vp = Viewport2D::new(rect, CoordSys::Polar, PolarLayout::AllQuad, (0.0, 360.0), (0.0, 1.0));
        let p = vp.user_to_physical(Point::new(225.0, 0.5)).unwrap();
        let back = vp.physical_to_user(p);
        assert!(close(back, Point::new(225.0, 0.5)), "got {back:?}");
    }

    #[test]
    fn measures_resolve_against_box() {
        let vp = Viewport2D::new(box_2500(), CoordSys::Cartesian, PolarLayout::Quad1, (0.0, 10.0), (0.0, 10.0));
        let p = vp.measure_point(Measure::percent(50.0), Measure::inches(1.0)).unwrap();
        assert!(close(p, Point::new(2000.0, 1750.0)), "got {p:?}");
        let u = vp.measure_point(Measure::user(10.0), Measure::user(0.0)).unwrap();
        assert!(close(u, Point::new(3250.0, 750.0)), "got {u:?}");
        assert_eq!(vp.measure_length(Measure::user(2.0), true), Some(500.0));
        assert_eq!(vp.user_length(500.0, false), 2.0);
    }

    #[test]
    fn point_measure_inverts_measure_point() {
        let vp = Viewport2D::new(box_2500(), CoordSys::SemilogY, PolarLayout::Quad1, (0.0, 10.0), (1.0, 100.0));
        let p = Point::new(2000.0, 2000.0);
        let (x, y) = vp.point_measure(p, (Unit::Percent, Unit::User));
        assert!((x.value - 50.0).abs() < 1e-9, "got {x:?}");
        assert!((y.value - 10.0).abs() < 1e-9, "got {y:?}");
        let (xi, yi) = vp.point_measure(p, (Unit::In, Unit::Pt));
        assert!(close(vp.measure_point(xi, yi).unwrap(), p));
    }

    #[test]
    fn tick_generation() {
        assert_eq!(major_ticks(0.0, 10.0, 0.0, false), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(major_ticks(-5.0, 5.0, 5.0, false), vec![-5.0, 0.0, 5.0]);
        assert_eq!(major_ticks(1.0, 1000.0, 0.0, true), vec![1.0, 10.0, 100.0, 1000.0]);
        assert_eq!(major_ticks(10.0, 0.0, 0.0, false).len(), 6, "reversed range");
    }

    #[test]
    fn degenerate_ranges_widen_at_any_magnitude() {
        for v in [1e18, -1e18, 1e300, f64::MAX] {
            let (s, e) = validate_range(v, v, false);
            assert!(s < e && (e - s).is_finite(), "{v}: got ({s}, {e})");
        }
        let (s, e) = validate_range(f64::MAX, f64::MAX, true);
        assert!(s < e && e.is_finite(), "got ({s}, {e})");
        let (s, e) = validate_range(-f64::MAX, f64::MAX, false);
        assert!((e - s).is_finite(), "got ({s}, {e})");

        let vp = Viewport2D::new(box_2500(), CoordSys::Cartesian, PolarLayout::Quad1, (1e18, 1e18), (0.0, 1.0));
        let p = vp.user_to_physical(Point::new(1e18, 0.5)).unwrap();
        assert!(p.x.is_finite() && p.y.is_finite(), "got {p:?}");
    }

    #[test]
    fn extreme_ranges_give_bounded_ticks() {
        let wide = major_ticks(-1e308, 1e308, 0.0, false);
        assert!(!wide.is_empty() && wide.len() <= 1001, "got {} ticks", wide.len());
        assert!(wide.iter().all(|t| t.is_finite()));

        let point = major_ticks(1e18, 1e18, 0.0, false);
        assert!(!point.is_empty() && point.len() <= 1001, "got {} ticks", point.len());
        assert!(point.windows(2).all(|w| w[0] < w[1]));

        let tiny = major_ticks(0.0, 1e6, 1e-300, false);
        assert!(tiny.len() <= 1001, "got {} ticks", tiny.len());
    }
}
