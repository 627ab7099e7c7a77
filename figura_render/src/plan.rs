// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one pass over a figure.

use figura_core::node::{
    ComponentRole, Frame, NodeId, NodeKind, NodeStore, Payload, RenderPass, RenderStep, SymbolShape,
};
use figura_core::render::{Painter, RenderTask};
use figura_core::style::{Color, ResolvedStyle};
use figura_core::viewport::{Viewport2D, major_ticks};
use kurbo::{Line, Point, Rect};

/// A geometric primitive in physical milli-inches, y up.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// An axis-aligned box, filled or outlined.
    Rect {
        /// The box.
        rect: Rect,
        /// Whether the box is filled rather than stroked.
        filled: bool,
    },
    /// A closed outline fitted to a box.
    Shape {
        /// The box the outline is fitted to.
        rect: Rect,
        /// The outline.
        shape: SymbolShape,
    },
    /// A connected open path.
    Polyline(Vec<Point>),
    /// Unconnected line segments.
    Segments(Vec<Line>),
    /// Marker symbols centered on points, already sorted back to front.
    Markers {
        /// Marker centers.
        points: Vec<Point>,
        /// Marker outline.
        shape: SymbolShape,
        /// Marker size.
        size: f64,
    },
    /// A run of text with its baseline origin.
    Text {
        /// Baseline origin.
        at: Point,
        /// The text.
        text: String,
    },
}

/// A single draw command in the render plan.
///
/// Items are produced in render order: later items draw over earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// The node this item originates from.
    pub node: NodeId,
    /// The part of the node drawn.
    pub pass: RenderPass,
    /// Clip rectangle, if the item is clipped to a data box.
    pub clip: Option<Rect>,
    /// Stroke color.
    pub stroke: Color,
    /// Fill color, also used for text.
    pub fill: Color,
    /// Stroke width in milli-inches.
    pub stroke_width: f64,
    /// Font size in milli-inches.
    pub font_size: f64,
    /// What to draw.
    pub primitive: Primitive,
}

/// An ordered list of draw commands for one pass over a figure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPlan {
    /// Draw items in back-to-front order.
    pub items: Vec<DrawItem>,
}

impl RenderPlan {
    /// Creates an empty render plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the plan for the evaluated tree under `root`.
    ///
    /// Returns `None` if `task` was cancelled before the walk finished.
    pub fn build(store: &NodeStore, root: NodeId, task: &RenderTask) -> Option<Self> {
        let mut plan = Self::new();
        let granularity = store.config().render_granularity;
        store.render(root, &mut plan, task, granularity).then_some(plan)
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items drawn for `node`, in order.
    pub fn items_for(&self, node: NodeId) -> impl Iterator<Item = &DrawItem> {
        self.items.iter().filter(move |i| i.node == node)
    }
}

impl Painter for RenderPlan {
    fn paint(&mut self, store: &NodeStore, step: &RenderStep) -> bool {
        let style = store.resolved_style(step.node);
        for primitive in primitives(store, step) {
            self.items.push(item(step, style, primitive));
        }
        true
    }
}

fn item(step: &RenderStep, style: &ResolvedStyle, primitive: Primitive) -> DrawItem {
    DrawItem {
        node: step.node,
        pass: step.pass,
        clip: step.clip,
        stroke: style.stroke_color,
        fill: style.fill_color,
        stroke_width: style.stroke_milli_in(),
        font_size: style.font_milli_in(),
        primitive,
    }
}

/// The primitives one render step draws.
fn primitives(store: &NodeStore, step: &RenderStep) -> Vec<Primitive> {
    let id = step.node;
    let data = store.data(id);
    if step.pass == RenderPass::Title {
        return match (data.title(), store.bounds(id)) {
            (Some(t), Some(b)) => vec![Primitive::Text {
                at: Point::new(b.x0, b.y1 + store.resolved_style(id).font_milli_in() / 2.0),
                text: t.to_owned(),
            }],
            _ => Vec::new(),
        };
    }
    let frame = store.enclosing_frame(id);
    let vp = frame.map(Frame::viewport);
    let bounds = store.bounds(id);
    match data.payload() {
        Payload::Figure(_) => bounds.map(|rect| Primitive::Rect { rect, filled: false }).into_iter().collect(),
        Payload::Graph(_) => store
            .viewport(id)
            .map(|v| Primitive::Rect { rect: v.rect(), filled: false })
            .into_iter()
            .collect(),
        Payload::Graph3D(_) => store.projector(id).map(floor_outline).into_iter().collect(),
        Payload::Axis(a) => match frame {
            Some(Frame::Projected { projector, .. }) => {
                let [(x0, x1), (y0, y1), (z0, z1)] = projector.extents();
                let (from, to) = match data.role() {
                    Some(ComponentRole::XAxis) => ([x0, y0, z0], [x1, y0, z0]),
                    Some(ComponentRole::YAxis) => ([x1, y0, z0], [x1, y1, z0]),
                    Some(ComponentRole::ZAxis) => ([x0, y0, z0], [x0, y0, z1]),
                    _ => return Vec::new(),
                };
                vec![Primitive::Polyline(vec![projector.project(from), projector.project(to)])]
            }
            Some(Frame::Flat(vp)) => axis_line(vp, data.role(), a.end).into_iter().collect(),
            None => Vec::new(),
        },
        Payload::Ticks(t) => {
            let (Some(axis), Some(Frame::Flat(vp))) = (store.parent(id), frame) else {
                return Vec::new();
            };
            let Some(spec) = store.data(axis).payload().as_axis() else {
                return Vec::new();
            };
            let primary = store.role(axis) == Some(ComponentRole::PrimaryAxis);
            let len = t.length.to_milli_in().unwrap_or(0.0);
            let log = log_axis(vp, primary);
            let (start, end) = spec.range();
            let r = vp.rect();
            let ticks = major_ticks(start, end, t.interval, log)
                .into_iter()
                .filter_map(|v| {
                    let p = if primary {
                        vp.user_to_physical(Point::new(v, vp.y_range().0))?
                    } else {
                        vp.user_to_physical(Point::new(vp.x_range().0, v))?
                    };
                    Some(if primary {
                        Line::new((p.x, r.y0), (p.x, r.y0 - len))
                    } else {
                        Line::new((r.x0, p.y), (r.x0 - len, p.y))
                    })
                })
                .collect();
            vec![Primitive::Segments(ticks)]
        }
        Payload::Empty if data.kind() == NodeKind::GridLine => {
            let (Some(Frame::Flat(vp)), Some(owner)) = (frame, store.parent(id)) else {
                return Vec::new();
            };
            let primary = data.role() == Some(ComponentRole::PrimaryGrid);
            let axis_role = if primary {
                ComponentRole::PrimaryAxis
            } else {
                ComponentRole::SecondaryAxis
            };
            let Some(range) = store
                .component(owner, axis_role)
                .and_then(|a| store.data(a).payload().as_axis().map(|a| a.range()))
            else {
                return Vec::new();
            };
            vec![Primitive::Segments(grid_lines(vp, primary, range))]
        }
        Payload::ColorBar(_) | Payload::Legend(_) => {
            bounds.map(|rect| Primitive::Rect { rect, filled: false }).into_iter().collect()
        }
        Payload::Plot(_) | Payload::Function(_) => {
            let Some(plot) = data.payload().as_plottable() else {
                return Vec::new();
            };
            let points = plot.points();
            match frame {
                Some(Frame::Projected { projector, .. }) => {
                    let order = projector.back_to_front_order(&points);
                    let size = marker_size(store, id);
                    vec![Primitive::Markers {
                        points: order.into_iter().map(|i| projector.project(points[i])).collect(),
                        shape: marker_shape(store, id),
                        size,
                    }]
                }
                Some(Frame::Flat(vp)) => {
                    let path: Vec<Point> = points
                        .iter()
                        .filter_map(|p| vp.user_to_physical(Point::new(p[0], p[1])))
                        .collect();
                    if path.is_empty() { Vec::new() } else { vec![Primitive::Polyline(path)] }
                }
                None => Vec::new(),
            }
        }
        Payload::Symbol(s) => {
            // Markers of a 2D plot; 3D plots draw their own.
            let (Some(owner), Some(Frame::Flat(vp))) = (store.parent(id), frame) else {
                return Vec::new();
            };
            let Some(plot) = store.data(owner).payload().as_plottable() else {
                return Vec::new();
            };
            let points: Vec<Point> = plot
                .points()
                .iter()
                .filter_map(|p| vp.user_to_physical(Point::new(p[0], p[1])))
                .collect();
            if points.is_empty() {
                return Vec::new();
            }
            vec![Primitive::Markers {
                points,
                shape: s.shape,
                size: s.size.to_milli_in().unwrap_or(0.0),
            }]
        }
        Payload::Calib(c) => {
            let Some(vp) = vp else {
                return Vec::new();
            };
            let (Some(at), Some(len)) = (vp.measure_point(c.at.x, c.at.y), vp.measure_length(c.length, c.primary))
            else {
                return Vec::new();
            };
            let end = if c.primary {
                Point::new(at.x + len, at.y)
            } else {
                Point::new(at.x, at.y + len)
            };
            vec![
                Primitive::Polyline(vec![at, end]),
                Primitive::Text {
                    at: Point::new(at.x, at.y - store.resolved_style(id).font_milli_in()),
                    text: c.label().to_owned(),
                },
            ]
        }
        Payload::Line(l) => {
            let Some(vp) = vp else {
                return Vec::new();
            };
            match (vp.measure_point(l.from.x, l.from.y), vp.measure_point(l.to.x, l.to.y)) {
                (Some(a), Some(b)) => vec![Primitive::Polyline(vec![a, b])],
                _ => Vec::new(),
            }
        }
        Payload::Shape(s) => bounds
            .map(|rect| Primitive::Shape { rect, shape: s.shape })
            .into_iter()
            .collect(),
        Payload::Label(l) => bounds
            .map(|b| Primitive::Text {
                at: Point::new(b.x0, b.y0),
                text: l.text.clone(),
            })
            .into_iter()
            .collect(),
        Payload::TextBox(t) => match bounds {
            Some(rect) => vec![
                Primitive::Rect { rect, filled: false },
                Primitive::Text {
                    at: Point::new(rect.x0, rect.y1 - store.resolved_style(id).font_milli_in()),
                    text: t.text.clone(),
                },
            ],
            None => Vec::new(),
        },
        Payload::ErrorBar(_) | Payload::Empty => Vec::new(),
    }
}

fn log_axis(vp: &Viewport2D, primary: bool) -> bool {
    if primary {
        vp.coord_sys().primary_log()
    } else {
        vp.coord_sys().secondary_log()
    }
}

/// A 2D axis line along the bottom (primary) or left (secondary) edge, or
/// the radius of a polar graph.
fn axis_line(vp: &Viewport2D, role: Option<ComponentRole>, end: f64) -> Option<Primitive> {
    let r = vp.rect();
    let primary = match role? {
        ComponentRole::PrimaryAxis => true,
        ComponentRole::SecondaryAxis => false,
        _ => return None,
    };
    if vp.coord_sys().is_polar() {
        if primary {
            return None;
        }
        let origin = vp.origin()?;
        let tip = vp.user_to_physical(Point::new(0.0, end)).unwrap_or(origin);
        return Some(Primitive::Polyline(vec![origin, tip]));
    }
    Some(Primitive::Polyline(if primary {
        vec![Point::new(r.x0, r.y0), Point::new(r.x1, r.y0)]
    } else {
        vec![Point::new(r.x0, r.y0), Point::new(r.x0, r.y1)]
    }))
}

/// Grid lines across the data box at the major ticks of one axis.
fn grid_lines(vp: &Viewport2D, primary: bool, (start, end): (f64, f64)) -> Vec<Line> {
    let r = vp.rect();
    let log = log_axis(vp, primary);
    major_ticks(start, end, 0.0, log)
        .into_iter()
        .filter_map(|v| {
            if vp.coord_sys().is_polar() {
                return None;
            }
            if primary {
                let x = vp.user_to_physical(Point::new(v, vp.y_range().0))?.x;
                Some(Line::new((x, r.y0), (x, r.y1)))
            } else {
                let y = vp.user_to_physical(Point::new(vp.x_range().0, v))?.y;
                Some(Line::new((r.x0, y), (r.x1, y)))
            }
        })
        .collect()
}

fn floor_outline(projector: &figura_core::projector::Projector) -> Primitive {
    let [(x0, x1), (y0, y1), (z0, _)] = projector.extents();
    let corners = [[x0, y0, z0], [x1, y0, z0], [x1, y1, z0], [x0, y1, z0], [x0, y0, z0]];
    Primitive::Polyline(corners.iter().map(|&c| projector.project(c)).collect())
}

fn symbol(store: &NodeStore, plot: NodeId) -> Option<&figura_core::node::SymbolSpec> {
    let s = store.component(plot, ComponentRole::Symbol)?;
    match store.data(s).payload() {
        Payload::Symbol(spec) => Some(spec),
        _ => None,
    }
}

fn marker_size(store: &NodeStore, plot: NodeId) -> f64 {
    symbol(store, plot).and_then(|s| s.size.to_milli_in()).unwrap_or(0.0)
}

fn marker_shape(store: &NodeStore, plot: NodeId) -> SymbolShape {
    symbol(store, plot).map(|s| s.shape).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use figura_core::clipboard::Clipboard;
    use figura_core::data::DataSet;
    use figura_core::model::GraphicModel;
    use figura_core::node::{PropertyKey, PropertyValue};

    use super::*;

    fn model_with_trace() -> (GraphicModel, NodeId, NodeId) {
        let mut m = GraphicModel::new(Clipboard::new());
        let root = m.root();
        let g = m.insert_new(root, NodeKind::Graph).unwrap();
        let t = m.insert_new(g, NodeKind::Trace).unwrap();
        let data = DataSet::xy(1, &[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)]);
        assert!(m.set_property(t, PropertyKey::Data, PropertyValue::Data(Some(data))));
        (m, g, t)
    }

    #[test]
    fn plan_follows_render_order() {
        let (m, _, _) = model_with_trace();
        let plan = RenderPlan::build(m.store(), m.root(), &RenderTask::new()).unwrap();
        let order: Vec<NodeId> = m.store().render_order(m.root()).iter().map(|s| s.node).collect();
        let mut last = 0;
        for item in &plan.items {
            let pos = order.iter().position(|&n| n == item.node).unwrap();
            assert!(pos >= last, "items out of render order");
            last = pos;
        }
        assert_eq!(plan.items[0].node, m.root());
    }

    #[test]
    fn trace_maps_through_the_data_box() {
        let (m, g, t) = model_with_trace();
        let plan = RenderPlan::build(m.store(), m.root(), &RenderTask::new()).unwrap();
        let rect = m.store().viewport(g).unwrap().rect();
        let path = plan
            .items_for(t)
            .find_map(|i| match &i.primitive {
                Primitive::Polyline(p) => Some(p.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(path.len(), 3);
        assert!((path[0] - Point::new(rect.x0, rect.y0)).hypot() < 1e-9);
        assert!((path[2] - Point::new(rect.x1, rect.y1)).hypot() < 1e-9);
    }

    #[test]
    fn markers_follow_their_plot() {
        let (m, _, t) = model_with_trace();
        let plan = RenderPlan::build(m.store(), m.root(), &RenderTask::new()).unwrap();
        let symbol = m.store().component(t, ComponentRole::Symbol).unwrap();
        let markers = plan.items_for(symbol).find_map(|i| match &i.primitive {
            Primitive::Markers { points, .. } => Some(points.len()),
            _ => None,
        });
        assert_eq!(markers, Some(3));
    }

    #[test]
    fn cancelled_build_yields_nothing() {
        let (m, _, _) = model_with_trace();
        let task = RenderTask::new();
        task.cancel();
        assert!(RenderPlan::build(m.store(), m.root(), &task).is_none());
    }

    #[test]
    fn graph_title_draws_last() {
        let (mut m, g, _) = model_with_trace();
        assert!(m.set_property(g, PropertyKey::Title, PropertyValue::Text("Response".into())));
        let plan = RenderPlan::build(m.store(), m.root(), &RenderTask::new()).unwrap();
        let last = plan.items_for(g).last().unwrap();
        assert_eq!(last.pass, RenderPass::Title);
        let b = m.store().bounds(g).unwrap();
        assert_eq!(
            last.primitive,
            Primitive::Text {
                at: Point::new(b.x0, b.y1 + last.font_size / 2.0),
                text: "Response".into(),
            }
        );
    }
}
