// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-type node payloads and the capability traits they implement.
//!
//! Every node is a [`NodeData`]: the common attributes (type, role, object
//! id, hidden flag, explicit style) plus a [`Payload`] variant holding the
//! type-specific state. Algorithms that only care about one capability go
//! through [`Positionable`], [`Plottable`] or [`AxisLike`] rather than
//! matching on the payload.

use crate::config::ModelConfig;
use crate::data::{DataExtent, DataSet};
use crate::style::Style;
use crate::units::Measure;
use crate::viewport::{CoordSys, PolarLayout};

use super::kind::{ComponentRole, NodeKind};

/// Direction tick marks point relative to the data box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickOrientation {
    /// Into the data box.
    In,
    /// Away from the data box.
    #[default]
    Out,
    /// Across the axis line.
    Both,
}

/// Outline of a marker symbol or a shape node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SymbolShape {
    /// Circle (markers) or ellipse (shapes).
    #[default]
    Circle,
    /// Square (markers) or rectangle (shapes).
    Square,
    /// Upward triangle.
    Triangle,
    /// Diamond.
    Diamond,
    /// Plus sign.
    Cross,
}

/// A location given as two measures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Horizontal location.
    pub x: Measure,
    /// Vertical location.
    pub y: Measure,
}

impl Placement {
    /// Creates a placement.
    #[must_use]
    pub const fn new(x: Measure, y: Measure) -> Self {
        Self { x, y }
    }
}

/// A located box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSpec {
    /// Bottom-left corner.
    pub at: Placement,
    /// Width.
    pub width: Measure,
    /// Height.
    pub height: Measure,
}

/// Canvas size of a figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigureSpec {
    /// Canvas width.
    pub width: Measure,
    /// Canvas height.
    pub height: Measure,
}

/// State of a 2D graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphSpec {
    /// The data box.
    pub frame: BoxSpec,
    /// Coordinate system.
    pub coord_sys: CoordSys,
    /// Polar quadrant layout.
    pub layout: PolarLayout,
    /// Whether plottable children are clipped to the data box.
    pub clip: bool,
    /// Auto-range flags for X, Y and Z.
    pub auto_range: [bool; 3],
}

/// State of a 3D graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Graph3DSpec {
    /// The 2D canvas box the projection is centered in.
    pub frame: BoxSpec,
    /// Depth of the 3D box.
    pub depth: Measure,
    /// Rotation about the vertical axis, degrees.
    pub rotate: f64,
    /// Elevation, degrees.
    pub elevate: f64,
    /// Projection distance as a multiple of the largest box dimension.
    pub distance: f64,
    /// Auto-range flags for X, Y and Z.
    pub auto_range: [bool; 3],
}

/// Range and labeling of an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    /// Range start (may exceed `end`).
    pub start: f64,
    /// Range end.
    pub end: f64,
    /// Units label.
    pub units: String,
    /// Offset of tick labels from the axis line.
    pub label_offset: Measure,
}

/// A color bar: an axis drawn as a bar beside the data box.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBarSpec {
    /// The Z range.
    pub axis: AxisSpec,
    /// Thickness of the bar.
    pub bar_size: Measure,
}

/// Tick mark configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickSpec {
    /// Major tick spacing; zero picks one automatically.
    pub interval: f64,
    /// Tick mark length.
    pub length: Measure,
    /// Tick direction.
    pub orientation: TickOrientation,
}

/// A plotted data set (trace, box plot, 3D scatter).
#[derive(Clone, Debug, PartialEq)]
pub struct PlotSpec {
    /// The plotted data.
    pub data: Option<DataSet>,
    /// Whether the element gets a legend entry.
    pub show_in_legend: bool,
}

/// A polynomial sampled over a domain.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSpec {
    /// Domain start.
    pub x0: f64,
    /// Domain end.
    pub x1: f64,
    /// Sample step.
    pub dx: f64,
    /// Coefficients, constant term first.
    pub coefficients: Vec<f64>,
    /// Whether the element gets a legend entry.
    pub show_in_legend: bool,
}

impl FunctionSpec {
    /// Upper bound on the number of samples.
    pub const MAX_SAMPLES: usize = 10_000;

    /// Evaluates the polynomial at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// Samples the function from `x0` to `x1` (inclusive) at step `dx`.
    #[must_use]
    pub fn samples(&self) -> Vec<(f64, f64)> {
        let span = self.x1 - self.x0;
        if !span.is_finite() || self.dx <= 0.0 {
            return Vec::new();
        }
        let steps = (span.abs() / self.dx).floor();
        let n = if steps > Self::MAX_SAMPLES as f64 {
            Self::MAX_SAMPLES
        } else {
            steps as usize
        };
        let step = if n == 0 { 0.0 } else { span / n as f64 };
        let step = if steps > Self::MAX_SAMPLES as f64 {
            step
        } else {
            self.dx.copysign(span)
        };
        let mut out: Vec<(f64, f64)> = (0..=n)
            .map(|i| {
                let x = self.x0 + step * i as f64;
                (x, self.eval(x))
            })
            .collect();
        if out.last().is_some_and(|&(x, _)| x != self.x1) {
            out.push((self.x1, self.eval(self.x1)));
        }
        out
    }
}

/// Marker symbol configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolSpec {
    /// Outline.
    pub shape: SymbolShape,
    /// Marker size.
    pub size: Measure,
}

/// Error bar configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorBarSpec {
    /// Cap width.
    pub cap: Measure,
}

/// A calibration bar.
#[derive(Clone, Debug, PartialEq)]
pub struct CalibSpec {
    /// Start of the bar.
    pub at: Placement,
    /// Physical length of the bar.
    pub length: Measure,
    /// Whether the bar runs along the primary axis.
    pub primary: bool,
    /// Whether the label is derived from the axis scale.
    pub auto_label: bool,
    /// Manual label.
    pub text: String,
    /// Cached automatic label; refreshed whenever the scale changes.
    pub(crate) auto_text: String,
}

impl CalibSpec {
    /// The label currently shown.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.auto_label { &self.auto_text } else { &self.text }
    }
}

/// A line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSpec {
    /// Start point.
    pub from: Placement,
    /// End point.
    pub to: Placement,
}

/// A closed shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSpec {
    /// Bounding box of the shape.
    pub frame: BoxSpec,
    /// Outline.
    pub shape: SymbolShape,
}

/// A single-line label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSpec {
    /// Baseline start.
    pub at: Placement,
    /// Text.
    pub text: String,
}

/// A multi-line text block.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBoxSpec {
    /// The box.
    pub frame: BoxSpec,
    /// Text; lines are separated by `\n`.
    pub text: String,
}

/// Type-specific node state.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Figure canvas.
    Figure(FigureSpec),
    /// 2D graph.
    Graph(GraphSpec),
    /// 3D graph.
    Graph3D(Graph3DSpec),
    /// 2D or 3D axis.
    Axis(AxisSpec),
    /// Color bar.
    ColorBar(ColorBarSpec),
    /// Tick set.
    Ticks(TickSpec),
    /// Legend placement.
    Legend(Placement),
    /// Trace, box plot or 3D scatter.
    Plot(PlotSpec),
    /// Sampled polynomial.
    Function(FunctionSpec),
    /// Marker symbol.
    Symbol(SymbolSpec),
    /// Error bar.
    ErrorBar(ErrorBarSpec),
    /// Calibration bar.
    Calib(CalibSpec),
    /// Line segment.
    Line(LineSpec),
    /// Closed shape.
    Shape(ShapeSpec),
    /// Label.
    Label(LabelSpec),
    /// Text box.
    TextBox(TextBoxSpec),
    /// No type-specific state (grid lines, violins).
    Empty,
}

/// The attributes of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) role: Option<ComponentRole>,
    pub(crate) object_id: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) style: Style,
    pub(crate) payload: Payload,
}

impl NodeData {
    /// Default attributes for a new node of type `kind`.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self::with_config(kind, &ModelConfig::default())
    }

    /// Default attributes for a new node, taking sizes from `config`.
    #[must_use]
    pub fn with_config(kind: NodeKind, config: &ModelConfig) -> Self {
        let inches = Measure::inches;
        let frame = BoxSpec {
            at: Placement::new(config.graph_location.0, config.graph_location.1),
            width: config.graph_size.0,
            height: config.graph_size.1,
        };
        let axis = AxisSpec {
            start: 0.0,
            end: 1.0,
            units: String::new(),
            label_offset: inches(0.1),
        };
        let payload = match kind {
            NodeKind::Figure => Payload::Figure(FigureSpec {
                width: config.figure_size.0,
                height: config.figure_size.1,
            }),
            NodeKind::Graph => Payload::Graph(GraphSpec {
                frame,
                coord_sys: CoordSys::Cartesian,
                layout: PolarLayout::Quad1,
                clip: false,
                auto_range: [false; 3],
            }),
            NodeKind::Graph3D => Payload::Graph3D(Graph3DSpec {
                frame,
                depth: config.graph_size.0,
                rotate: 30.0,
                elevate: 20.0,
                distance: 4.0,
                auto_range: [false; 3],
            }),
            NodeKind::Axis | NodeKind::Axis3D => Payload::Axis(axis),
            NodeKind::ColorBar => Payload::ColorBar(ColorBarSpec {
                axis,
                bar_size: inches(0.15),
            }),
            NodeKind::TickSet => Payload::Ticks(TickSpec {
                interval: 0.0,
                length: inches(0.05),
                orientation: TickOrientation::Out,
            }),
            NodeKind::Legend => Payload::Legend(Placement::new(
                Measure::percent(70.0),
                Measure::percent(70.0),
            )),
            NodeKind::Trace | NodeKind::BoxPlot | NodeKind::Scatter3D => Payload::Plot(PlotSpec {
                data: None,
                show_in_legend: true,
            }),
            NodeKind::Function => Payload::Function(FunctionSpec {
                x0: 0.0,
                x1: 1.0,
                dx: 0.01,
                coefficients: vec![0.0, 1.0],
                show_in_legend: true,
            }),
            NodeKind::Symbol => Payload::Symbol(SymbolSpec {
                shape: SymbolShape::Circle,
                size: inches(0.06),
            }),
            NodeKind::ErrorBar => Payload::ErrorBar(ErrorBarSpec { cap: inches(0.05) }),
            NodeKind::CalibBar => Payload::Calib(CalibSpec {
                at: Placement::new(Measure::percent(10.0), Measure::percent(10.0)),
                length: inches(0.5),
                primary: true,
                auto_label: true,
                text: String::new(),
                auto_text: String::new(),
            }),
            NodeKind::Line => Payload::Line(LineSpec {
                from: Placement::new(inches(0.0), inches(0.0)),
                to: Placement::new(inches(1.0), inches(1.0)),
            }),
            NodeKind::Shape => Payload::Shape(ShapeSpec {
                frame: BoxSpec {
                    at: Placement::new(inches(1.0), inches(1.0)),
                    width: inches(1.0),
                    height: inches(1.0),
                },
                shape: SymbolShape::Square,
            }),
            NodeKind::Label => Payload::Label(LabelSpec {
                at: Placement::new(inches(1.0), inches(1.0)),
                text: String::from("Label"),
            }),
            NodeKind::TextBox => Payload::TextBox(TextBoxSpec {
                frame: BoxSpec {
                    at: Placement::new(inches(1.0), inches(1.0)),
                    width: inches(2.0),
                    height: inches(1.0),
                },
                text: String::new(),
            }),
            NodeKind::GridLine | NodeKind::Violin => Payload::Empty,
        };
        Self {
            kind,
            role: None,
            object_id: None,
            title: None,
            hidden: false,
            style: Style::default(),
            payload,
        }
    }

    /// Default attributes for a component created in `role`.
    pub(crate) fn component(role: ComponentRole, config: &ModelConfig) -> Self {
        let mut data = Self::with_config(role.kind(), config);
        data.role = Some(role);
        data.hidden = matches!(
            role,
            ComponentRole::PrimaryGrid
                | ComponentRole::SecondaryGrid
                | ComponentRole::ColorBar
                | ComponentRole::Legend
                | ComponentRole::ErrorBar
                | ComponentRole::Violin
        );
        data
    }

    /// The node's type.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's component role, if it is a component.
    #[must_use]
    pub fn role(&self) -> Option<ComponentRole> {
        self.role
    }

    /// The node's own hidden flag (ancestors may still hide it).
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The object id, if set.
    #[must_use]
    pub fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    /// The graph title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The explicit style attributes.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// The type-specific state.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }
}

/// A node located by measures within its parent.
pub trait Positionable {
    /// The node's reference location.
    fn location(&self) -> Placement;
    /// Moves the reference location.
    fn set_location(&mut self, at: Placement);
    /// The node's size, for boxed nodes.
    fn size(&self) -> Option<(Measure, Measure)> {
        None
    }
}

impl Positionable for Placement {
    fn location(&self) -> Placement {
        *self
    }

    fn set_location(&mut self, at: Placement) {
        *self = at;
    }
}

impl Positionable for BoxSpec {
    fn location(&self) -> Placement {
        self.at
    }

    fn set_location(&mut self, at: Placement) {
        self.at = at;
    }

    fn size(&self) -> Option<(Measure, Measure)> {
        Some((self.width, self.height))
    }
}

/// A node that plots data and reports its extent.
pub trait Plottable {
    /// The finite extent of the plotted data.
    fn extent(&self) -> DataExtent;
    /// The plotted points; 2D points report `z = 0`.
    fn points(&self) -> Vec<[f64; 3]>;
    /// Whether the element gets a legend entry.
    fn in_legend(&self) -> bool;
}

impl Plottable for PlotSpec {
    fn extent(&self) -> DataExtent {
        self.data
            .as_ref()
            .map_or(DataExtent::EMPTY, DataSet::extent)
    }

    fn points(&self) -> Vec<[f64; 3]> {
        self.data
            .as_ref()
            .map(|d| d.points().collect())
            .unwrap_or_default()
    }

    fn in_legend(&self) -> bool {
        self.show_in_legend
    }
}

impl Plottable for FunctionSpec {
    fn extent(&self) -> DataExtent {
        let mut ext = DataExtent::EMPTY;
        for (x, y) in self.samples() {
            ext.x.include(x);
            ext.y.include(y);
        }
        ext
    }

    fn points(&self) -> Vec<[f64; 3]> {
        self.samples().into_iter().map(|(x, y)| [x, y, 0.0]).collect()
    }

    fn in_legend(&self) -> bool {
        self.show_in_legend
    }
}

/// A node carrying a numeric range.
pub trait AxisLike {
    /// The stored `(start, end)` range.
    fn range(&self) -> (f64, f64);
    /// The units label.
    fn units(&self) -> &str;
}

impl AxisLike for AxisSpec {
    fn range(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    fn units(&self) -> &str {
        &self.units
    }
}

impl AxisLike for ColorBarSpec {
    fn range(&self) -> (f64, f64) {
        self.axis.range()
    }

    fn units(&self) -> &str {
        &self.axis.units
    }
}

impl Payload {
    /// The payload's location capability, if any.
    #[must_use]
    pub fn as_positionable(&self) -> Option<&dyn Positionable> {
        match self {
            Self::Graph(g) => Some(&g.frame),
            Self::Graph3D(g) => Some(&g.frame),
            Self::Legend(p) => Some(p),
            Self::Calib(c) => Some(&c.at),
            Self::Line(l) => Some(&l.from),
            Self::Shape(s) => Some(&s.frame),
            Self::Label(l) => Some(&l.at),
            Self::TextBox(t) => Some(&t.frame),
            _ => None,
        }
    }

    /// The payload's plotting capability, if any.
    #[must_use]
    pub fn as_plottable(&self) -> Option<&dyn Plottable> {
        match self {
            Self::Plot(p) => Some(p),
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The payload's range capability, if any.
    #[must_use]
    pub fn as_axis(&self) -> Option<&dyn AxisLike> {
        match self {
            Self::Axis(a) => Some(a),
            Self::ColorBar(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_samples_cover_domain() {
        let f = FunctionSpec {
            x0: 0.0,
            x1: 1.0,
            dx: 0.25,
            coefficients: vec![1.0, 0.0, 2.0],
            show_in_legend: true,
        };
        let s = f.samples();
        assert_eq!(s.len(), 5);
        assert_eq!(s[4], (1.0, 3.0));
        let ext = f.extent();
        assert_eq!((ext.y.min, ext.y.max), (1.0, 3.0));
    }

    #[test]
    fn function_samples_are_bounded() {
        let f = FunctionSpec {
            x0: 0.0,
            x1: 1.0e9,
            dx: 1.0,
            coefficients: vec![0.0],
            show_in_legend: false,
        };
        assert!(f.samples().len() <= FunctionSpec::MAX_SAMPLES + 2);
    }

    #[test]
    fn reversed_domain_steps_backwards() {
        let f = FunctionSpec {
            x0: 1.0,
            x1: 0.0,
            dx: 0.5,
            coefficients: vec![0.0, 1.0],
            show_in_legend: true,
        };
        let xs: Vec<f64> = f.samples().into_iter().map(|(x, _)| x).collect();
        assert_eq!(xs, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn components_start_with_role_defaults() {
        let cfg = ModelConfig::default();
        assert!(NodeData::component(ComponentRole::PrimaryGrid, &cfg).is_hidden());
        assert!(!NodeData::component(ComponentRole::PrimaryAxis, &cfg).is_hidden());
        assert_eq!(
            NodeData::component(ComponentRole::ZAxis, &cfg).kind(),
            NodeKind::Axis3D
        );
    }
}
