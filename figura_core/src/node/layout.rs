// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-type layout: frames and bounding boxes in physical milli-inches.
//!
//! Layout of a node reads only its own attributes, its ancestors' frames and
//! the attributes of its container's components and children, so computing
//! nodes in pre-order always sees fresh inputs.

use kurbo::{Point, Rect};

use crate::projector::Projector;
use crate::style::ResolvedStyle;
use crate::viewport::{PolarLayout, Viewport2D};

use super::id::INVALID;
use super::kind::{ComponentRole, NodeKind};
use super::payload::{BoxSpec, Payload, TickOrientation};
use super::store::{Frame, NodeStore};

/// Gap between a graph's data box and its color bar.
const COLOR_BAR_GAP: f64 = 100.0;

/// The output of laying out one node.
#[derive(Debug, Default)]
pub(crate) struct Layout {
    pub(crate) frame: Option<Frame>,
    pub(crate) bounds: Option<Rect>,
    /// New automatic label text, for calibration bars.
    pub(crate) auto_text: Option<String>,
}

impl NodeStore {
    pub(crate) fn compute_layout(&self, idx: u32, style: &ResolvedStyle) -> Layout {
        let data = &self.data[idx as usize];
        let pf = self.enclosing_frame_idx(idx);
        let vp = pf.map(Frame::viewport);
        let mut out = Layout::default();
        match &data.payload {
            Payload::Figure(f) => {
                let w = f.width.to_milli_in().unwrap_or(0.0);
                let h = f.height.to_milli_in().unwrap_or(0.0);
                let rect = Rect::new(0.0, 0.0, w, h);
                out.frame = Some(Frame::Flat(Viewport2D::identity(rect)));
                out.bounds = Some(rect);
            }
            Payload::Graph(g) => {
                if let Some(rect) = vp.and_then(|vp| box_rect(vp, &g.frame)) {
                    let x = self.axis_range(idx, ComponentRole::PrimaryAxis);
                    let y = self.axis_range(idx, ComponentRole::SecondaryAxis);
                    out.frame = Some(Frame::Flat(Viewport2D::new(rect, g.coord_sys, g.layout, x, y)));
                    out.bounds = Some(rect);
                }
            }
            Payload::Graph3D(g) => {
                if let Some((vp, rect)) = vp.and_then(|vp| Some((vp, box_rect(vp, &g.frame)?))) {
                    let depth = vp.measure_length(g.depth, true).unwrap_or(rect.width());
                    let extents = [
                        self.axis_range(idx, ComponentRole::XAxis),
                        self.axis_range(idx, ComponentRole::YAxis),
                        self.axis_range(idx, ComponentRole::ZAxis),
                    ];
                    let projector = Projector::new(rect, depth, g.rotate, g.elevate, extents, g.distance);
                    let mut bounds = rect;
                    for corner in box_corners(&projector) {
                        bounds = bounds.union_pt(projector.project(corner));
                    }
                    out.frame = Some(Frame::Projected {
                        canvas: Viewport2D::identity(rect),
                        projector,
                    });
                    out.bounds = Some(bounds);
                }
            }
            Payload::Axis(a) => {
                let margin = self.tick_extent(idx) + a.label_offset.to_milli_in().unwrap_or(0.0).abs()
                    + style.font_milli_in();
                out.bounds = match (pf, data.kind) {
                    (Some(Frame::Projected { projector, .. }), NodeKind::Axis3D) => {
                        axis3d_segment(projector, data.role).map(|(a, b)| {
                            Rect::from_points(projector.project(a), projector.project(b)).inflate(margin, margin)
                        })
                    }
                    (Some(Frame::Flat(vp)), _) => axis2d_bounds(vp, data.role, margin, self.inward_ticks(idx)),
                    _ => None,
                };
            }
            Payload::ColorBar(c) => {
                if let Some(vp) = vp {
                    let r = vp.rect();
                    let bar = c.bar_size.to_milli_in().unwrap_or(0.0);
                    let labels = c.axis.label_offset.to_milli_in().unwrap_or(0.0).abs() + 3.0 * style.font_milli_in();
                    let x0 = r.x1 + COLOR_BAR_GAP;
                    out.bounds = Some(Rect::new(x0, r.y0, x0 + bar + labels, r.y1));
                }
            }
            Payload::Ticks(_) | Payload::Symbol(_) | Payload::ErrorBar(_) => {
                out.bounds = self.parent_bounds(idx);
            }
            Payload::Empty => {
                out.bounds = match data.kind {
                    NodeKind::GridLine => vp.map(Viewport2D::rect),
                    _ => self.parent_bounds(idx),
                };
            }
            Payload::Legend(p) => {
                if let Some(at) = vp.and_then(|vp| vp.measure_point(p.x, p.y)) {
                    let entries = self.legend_entries(idx).max(1) as f64;
                    let font = style.font_milli_in();
                    let size = (8.0 * font, entries * 1.5 * font + 0.5 * font);
                    out.bounds = Some(Rect::from_origin_size(at, size));
                }
            }
            Payload::Plot(_) | Payload::Function(_) => {
                out.bounds = self.plot_bounds(idx, pf, style);
            }
            Payload::Calib(c) => {
                if let Some(vp) = vp {
                    let len = vp.measure_length(c.length, c.primary);
                    if let (Some(at), Some(len)) = (vp.measure_point(c.at.x, c.at.y), len) {
                        let end = if c.primary {
                            Point::new(at.x + len, at.y)
                        } else {
                            Point::new(at.x, at.y + len)
                        };
                        let pad = style.stroke_milli_in().max(1.5 * style.font_milli_in());
                        out.bounds = Some(Rect::from_points(at, end).inflate(pad, pad));
                        let units = self.calib_units(idx, c.primary);
                        out.auto_text = Some(calib_label(vp.user_length(len, c.primary), units));
                    }
                }
            }
            Payload::Line(l) => {
                let ends = vp.and_then(|vp| Some((vp.measure_point(l.from.x, l.from.y)?, vp.measure_point(l.to.x, l.to.y)?)));
                let half = style.stroke_milli_in() / 2.0;
                out.bounds = ends.map(|(a, b)| Rect::from_points(a, b).inflate(half, half));
            }
            Payload::Shape(s) => {
                if let Some(rect) = vp.and_then(|vp| box_rect(vp, &s.frame)) {
                    out.frame = Some(Frame::Flat(Viewport2D::identity(rect)));
                    out.bounds = Some(rect);
                }
            }
            Payload::Label(l) => {
                if let Some(at) = vp.and_then(|vp| vp.measure_point(l.at.x, l.at.y)) {
                    let font = style.font_milli_in();
                    let width = l.text.chars().count() as f64 * 0.6 * font;
                    out.bounds = Some(Rect::new(at.x, at.y, at.x + width, at.y + font));
                }
            }
            Payload::TextBox(t) => {
                out.bounds = vp.and_then(|vp| box_rect(vp, &t.frame));
            }
        }
        out
    }

    fn parent_bounds(&self, idx: u32) -> Option<Rect> {
        let p = self.parent[idx as usize];
        if p == INVALID { None } else { self.bounds[p as usize] }
    }

    /// The stored range of a container's axis, or `(0, 1)` if it has none.
    pub(crate) fn axis_range(&self, container: u32, role: ComponentRole) -> (f64, f64) {
        self.component_idx(container, role)
            .and_then(|c| self.data[c as usize].payload.as_axis().map(|a| a.range()))
            .unwrap_or((0.0, 1.0))
    }

    /// Longest outward tick mark among an axis's tick sets.
    fn tick_extent(&self, axis: u32) -> f64 {
        self.children[axis as usize]
            .iter()
            .filter_map(|&t| match &self.data[t as usize].payload {
                Payload::Ticks(s) if s.orientation != TickOrientation::In => s.length.to_milli_in(),
                _ => None,
            })
            .fold(0.0, f64::max)
    }

    fn inward_ticks(&self, axis: u32) -> f64 {
        self.children[axis as usize]
            .iter()
            .filter_map(|&t| match &self.data[t as usize].payload {
                Payload::Ticks(s) if s.orientation != TickOrientation::Out => s.length.to_milli_in(),
                _ => None,
            })
            .fold(0.0, f64::max)
    }

    /// Number of legend entries: visible plottable siblings shown in the
    /// legend.
    fn legend_entries(&self, legend: u32) -> usize {
        let p = self.parent[legend as usize];
        if p == INVALID {
            return 0;
        }
        self.children[p as usize]
            .iter()
            .filter(|&&c| {
                let d = &self.data[c as usize];
                !d.hidden && d.payload.as_plottable().is_some_and(|pl| pl.in_legend())
            })
            .count()
    }

    fn plot_bounds(&self, idx: u32, frame: Option<&Frame>, style: &ResolvedStyle) -> Option<Rect> {
        let plot = self.data[idx as usize].payload.as_plottable()?;
        let frame = frame?;
        let points = plot.points();
        let mapped: Vec<Point> = match frame {
            Frame::Projected { projector, .. } => points.iter().map(|&p| projector.project(p)).collect(),
            Frame::Flat(vp) => points
                .iter()
                .filter_map(|p| vp.user_to_physical(Point::new(p[0], p[1])))
                .collect(),
        };
        let first = *mapped.first()?;
        let bbox = mapped.iter().fold(Rect::from_points(first, first), |r, &p| r.union_pt(p));
        let marker = self
            .component_idx(idx, ComponentRole::Symbol)
            .and_then(|s| match &self.data[s as usize].payload {
                Payload::Symbol(sym) if !self.data[s as usize].hidden => sym.size.to_milli_in(),
                _ => None,
            })
            .unwrap_or(0.0);
        let pad = marker / 2.0 + style.stroke_milli_in();
        Some(bbox.inflate(pad, pad))
    }

    fn calib_units(&self, calib: u32, primary: bool) -> &str {
        let role = if primary {
            ComponentRole::PrimaryAxis
        } else {
            ComponentRole::SecondaryAxis
        };
        self.container_idx(calib)
            .and_then(|c| self.component_idx(c, role))
            .and_then(|a| self.data[a as usize].payload.as_axis())
            .map_or("", |a| a.units())
    }
}

/// Resolves a box against a viewport.
fn box_rect(vp: &Viewport2D, b: &BoxSpec) -> Option<Rect> {
    let at = vp.measure_point(b.at.x, b.at.y)?;
    let w = vp.measure_length(b.width, true)?;
    let h = vp.measure_length(b.height, false)?;
    Some(Rect::from_origin_size(at, (w, h)))
}

fn box_corners(p: &Projector) -> [[f64; 3]; 8] {
    let [(x0, x1), (y0, y1), (z0, z1)] = p.extents();
    [
        [x0, y0, z0],
        [x1, y0, z0],
        [x0, y1, z0],
        [x1, y1, z0],
        [x0, y0, z1],
        [x1, y0, z1],
        [x0, y1, z1],
        [x1, y1, z1],
    ]
}

/// The data-space segment a 3D axis is drawn along.
pub(crate) fn axis3d_segment(p: &Projector, role: Option<ComponentRole>) -> Option<([f64; 3], [f64; 3])> {
    let [(x0, x1), (y0, y1), (z0, z1)] = p.extents();
    match role? {
        ComponentRole::XAxis => Some(([x0, y0, z0], [x1, y0, z0])),
        ComponentRole::YAxis => Some(([x1, y0, z0], [x1, y1, z0])),
        ComponentRole::ZAxis => Some(([x0, y0, z0], [x0, y0, z1])),
        _ => None,
    }
}

fn axis2d_bounds(vp: &Viewport2D, role: Option<ComponentRole>, margin: f64, inward: f64) -> Option<Rect> {
    let r = vp.rect();
    let primary = match role? {
        ComponentRole::PrimaryAxis => true,
        ComponentRole::SecondaryAxis => false,
        _ => return None,
    };
    if let Some(origin) = vp.origin() {
        if primary {
            return Some(r.inflate(margin, margin));
        }
        let reach = match vp.layout() {
            PolarLayout::AllQuad => r.width().min(r.height()) / 2.0,
            _ => r.width().min(r.height()),
        };
        return Some(Rect::new(origin.x, origin.y - margin, origin.x + reach, origin.y + inward));
    }
    Some(if primary {
        Rect::new(r.x0, r.y0 - margin, r.x1, r.y0 + inward)
    } else {
        Rect::new(r.x0 - margin, r.y0, r.x0 + inward, r.y1)
    })
}

/// Formats a calibration label: the user span to four significant digits,
/// followed by the axis units.
pub(crate) fn calib_label(value: f64, units: &str) -> String {
    let v = if value == 0.0 || !value.is_finite() {
        0.0
    } else {
        let scale = 10f64.powi(3 - value.abs().log10().floor() as i32);
        (value * scale).round() / scale
    };
    if units.is_empty() {
        format!("{v}")
    } else {
        format!("{v} {units}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calib_labels_round_to_four_digits() {
        assert_eq!(calib_label(2.0, "s"), "2 s");
        assert_eq!(calib_label(0.123_456, "mV"), "0.1235 mV");
        assert_eq!(calib_label(1234.5, ""), "1235");
        assert_eq!(calib_label(f64::NAN, "s"), "0 s");
    }

    #[test]
    fn cartesian_axes_hug_the_data_box() {
        let vp = Viewport2D::identity(Rect::new(1000.0, 1000.0, 3000.0, 2000.0));
        let x = axis2d_bounds(&vp, Some(ComponentRole::PrimaryAxis), 100.0, 0.0).unwrap();
        assert_eq!(x, Rect::new(1000.0, 900.0, 3000.0, 1000.0));
        let y = axis2d_bounds(&vp, Some(ComponentRole::SecondaryAxis), 100.0, 20.0).unwrap();
        assert_eq!(y, Rect::new(900.0, 1000.0, 1020.0, 2000.0));
        assert!(axis2d_bounds(&vp, Some(ComponentRole::Legend), 0.0, 0.0).is_none());
    }
}
