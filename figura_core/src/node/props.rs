// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The property protocol: keys, values, and the per-type get/set table.

use understory_dirty::Channel;

use crate::data::DataSet;
use crate::dirty;
use crate::error::EditError;
use crate::style::{Color, FontStyle};
use crate::units::{Measure, MeasureConstraints};
use crate::viewport::{CoordSys, PolarLayout};

use super::id::NodeId;
use super::kind::NodeKind;
use super::payload::{NodeData, Payload, SymbolShape, TickOrientation};

/// Names a node property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKey {
    /// Optional identifier, unique within a model (text; empty clears).
    ObjectId,
    /// Graph title (text).
    Title,
    /// Hidden flag.
    Hide,
    /// Font family (style).
    FontFamily,
    /// Font weight and posture (style).
    FontStyle,
    /// Font size in points (style).
    FontSize,
    /// Fill color (style).
    FillColor,
    /// Stroke color (style).
    StrokeColor,
    /// Stroke width (style).
    StrokeWidth,
    /// Horizontal location.
    X,
    /// Vertical location.
    Y,
    /// Box width.
    Width,
    /// Box height.
    Height,
    /// 3D box depth.
    Depth,
    /// 3D rotation angle in degrees.
    Rotate,
    /// 3D elevation angle in degrees.
    Elevate,
    /// 3D projection distance as a multiple of the largest box dimension.
    ProjectionDistance,
    /// 2D coordinate system.
    CoordSys,
    /// Polar quadrant layout.
    Layout,
    /// Whether plottable children are clipped to the data box.
    Clip,
    /// Auto-range flag of the X (primary) axis.
    AutoRangeX,
    /// Auto-range flag of the Y (secondary) axis.
    AutoRangeY,
    /// Auto-range flag of the Z (color) axis.
    AutoRangeZ,
    /// Axis range start.
    Start,
    /// Axis range end.
    End,
    /// Axis units label (text).
    Units,
    /// Offset of axis labels from the axis line.
    LabelOffset,
    /// Color bar thickness.
    BarSize,
    /// Major tick spacing; zero picks a spacing automatically.
    Interval,
    /// Tick mark length.
    TickLength,
    /// Tick mark direction.
    TickOrientation,
    /// Calibration bar length.
    Length,
    /// Plotted data set.
    Data,
    /// Whether the element gets a legend entry.
    ShowInLegend,
    /// Function domain start.
    X0,
    /// Function domain end.
    X1,
    /// Function sample step.
    Dx,
    /// Polynomial coefficients, constant term first.
    Coefficients,
    /// Marker or shape outline.
    SymbolShape,
    /// Marker size.
    SymbolSize,
    /// Error bar cap width.
    CapSize,
    /// Whether a calibration bar runs along the primary axis.
    Primary,
    /// Whether a calibration bar labels itself from the axis scale.
    AutoLabel,
    /// Line end X.
    X2,
    /// Line end Y.
    Y2,
    /// Text content.
    Text,
}

impl PropertyKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 46] = [
        Self::ObjectId,
        Self::Title,
        Self::Hide,
        Self::FontFamily,
        Self::FontStyle,
        Self::FontSize,
        Self::FillColor,
        Self::StrokeColor,
        Self::StrokeWidth,
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Depth,
        Self::Rotate,
        Self::Elevate,
        Self::ProjectionDistance,
        Self::CoordSys,
        Self::Layout,
        Self::Clip,
        Self::AutoRangeX,
        Self::AutoRangeY,
        Self::AutoRangeZ,
        Self::Start,
        Self::End,
        Self::Units,
        Self::LabelOffset,
        Self::BarSize,
        Self::Interval,
        Self::TickLength,
        Self::TickOrientation,
        Self::Length,
        Self::Data,
        Self::ShowInLegend,
        Self::X0,
        Self::X1,
        Self::Dx,
        Self::Coefficients,
        Self::SymbolShape,
        Self::SymbolSize,
        Self::CapSize,
        Self::Primary,
        Self::AutoLabel,
        Self::X2,
        Self::Y2,
        Self::Text,
    ];

    /// The inheritable style keys.
    pub const STYLE: [Self; 6] = [
        Self::FontFamily,
        Self::FontStyle,
        Self::FontSize,
        Self::FillColor,
        Self::StrokeColor,
        Self::StrokeWidth,
    ];

    /// Returns whether the key is an inheritable style attribute.
    #[must_use]
    pub const fn is_style(self) -> bool {
        matches!(
            self,
            Self::FontFamily
                | Self::FontStyle
                | Self::FontSize
                | Self::FillColor
                | Self::StrokeColor
                | Self::StrokeWidth
        )
    }

    /// The dirty channel a change to this key marks.
    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::FontFamily
            | Self::FontStyle
            | Self::FontSize
            | Self::FillColor
            | Self::StrokeColor
            | Self::StrokeWidth => dirty::STYLE,
            Self::ObjectId
            | Self::Title
            | Self::Clip
            | Self::AutoRangeX
            | Self::AutoRangeY
            | Self::AutoRangeZ
            | Self::SymbolShape
            | Self::SymbolSize
            | Self::CapSize
            | Self::AutoLabel => dirty::CONTENT,
            _ => dirty::LAYOUT,
        }
    }

    /// Returns whether a change re-lays out the enclosing container rather
    /// than only the node itself.
    #[must_use]
    pub const fn affects_container(self) -> bool {
        matches!(
            self,
            Self::Start
                | Self::End
                | Self::Units
                | Self::Interval
                | Self::TickLength
                | Self::TickOrientation
                | Self::ShowInLegend
                | Self::SymbolSize
        )
    }
}

/// A property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Flag.
    Bool(bool),
    /// Plain number.
    Number(f64),
    /// Numeric value with unit.
    Measure(Measure),
    /// Text.
    Text(String),
    /// Color.
    Color(Color),
    /// Font weight and posture.
    FontStyle(FontStyle),
    /// Coordinate system.
    CoordSys(CoordSys),
    /// Polar layout.
    Layout(PolarLayout),
    /// Tick direction.
    Orientation(TickOrientation),
    /// Marker or shape outline.
    Shape(SymbolShape),
    /// Data set reference, or none.
    Data(Option<DataSet>),
    /// List of numbers.
    Numbers(Vec<f64>),
    /// A style attribute that is inherited from the parent.
    Inherit,
}

/// A recorded change of one property on one node.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChange {
    /// The changed node.
    pub node: NodeId,
    /// The changed property.
    pub key: PropertyKey,
    /// The raw value before the change.
    pub old: PropertyValue,
    /// The raw value after the change.
    pub new: PropertyValue,
}

/// Largest supported font size in points.
const MAX_FONT_SIZE: f64 = 500.0;
/// Largest supported projection distance multiple.
const MAX_DISTANCE_SCALE: f64 = 100.0;
/// Largest supported number of polynomial coefficients.
const MAX_COEFFICIENTS: usize = 16;

impl NodeData {
    /// Returns the raw stored value of `key`, or `None` if this type has no
    /// such property.
    ///
    /// Style keys report [`PropertyValue::Inherit`] when not explicit.
    #[must_use]
    pub fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        use PropertyKey as K;
        use PropertyValue as V;
        let s = &self.style;
        let style = |v: Option<V>| Some(v.unwrap_or(V::Inherit));
        match key {
            K::ObjectId => Some(V::Text(self.object_id.clone().unwrap_or_default())),
            K::Hide => Some(V::Bool(self.hidden)),
            K::FontFamily => style(s.font_family.clone().map(V::Text)),
            K::FontStyle => style(s.font_style.map(V::FontStyle)),
            K::FontSize => style(s.font_size.map(V::Number)),
            K::FillColor => style(s.fill_color.map(V::Color)),
            K::StrokeColor => style(s.stroke_color.map(V::Color)),
            K::StrokeWidth => style(s.stroke_width.map(V::Measure)),
            K::Title if self.kind.is_container() => {
                Some(V::Text(self.title.clone().unwrap_or_default()))
            }
            _ => self.payload.get(key),
        }
    }

    /// Validates and stores `value` for `key`.
    ///
    /// Returns whether the stored value changed.
    ///
    /// # Errors
    ///
    /// [`EditError::Unsupported`] if this type has no such property,
    /// [`EditError::InvalidValue`] if the value has the wrong type or
    /// violates the property's constraints.
    pub fn set(&mut self, key: PropertyKey, value: PropertyValue) -> Result<bool, EditError> {
        let Some(old) = self.get(key) else {
            return Err(EditError::Unsupported {
                kind: self.kind,
                key,
            });
        };
        if old == value {
            return Ok(false);
        }
        self.store(key, value)?;
        Ok(self.get(key) != Some(old))
    }

    fn store(&mut self, key: PropertyKey, value: PropertyValue) -> Result<(), EditError> {
        use PropertyKey as K;
        use PropertyValue as V;
        let bad = || EditError::InvalidValue(key);
        let s = &mut self.style;
        match (key, value) {
            (K::ObjectId, V::Text(t)) => {
                self.object_id = (!t.is_empty()).then_some(t);
            }
            (K::Title, V::Text(t)) => self.title = (!t.is_empty()).then_some(t),
            (K::Hide, V::Bool(b)) => self.hidden = b,
            (K::FontFamily, V::Inherit) => s.font_family = None,
            (K::FontFamily, V::Text(t)) if !t.trim().is_empty() => s.font_family = Some(t),
            (K::FontStyle, V::Inherit) => s.font_style = None,
            (K::FontStyle, V::FontStyle(f)) => s.font_style = Some(f),
            (K::FontSize, V::Inherit) => s.font_size = None,
            (K::FontSize, V::Number(n)) if (1.0..=MAX_FONT_SIZE).contains(&n) => {
                s.font_size = Some(n);
            }
            (K::FillColor, V::Inherit) => s.fill_color = None,
            (K::FillColor, V::Color(c)) => s.fill_color = Some(c),
            (K::StrokeColor, V::Inherit) => s.stroke_color = None,
            (K::StrokeColor, V::Color(c)) => s.stroke_color = Some(c),
            (K::StrokeWidth, V::Inherit) => s.stroke_width = None,
            (K::StrokeWidth, V::Measure(m)) => {
                s.stroke_width = Some(MeasureConstraints::STROKE.constrain(m).ok_or_else(bad)?);
            }
            (key, value) => self.payload.store(key, value)?,
        }
        Ok(())
    }
}

impl Payload {
    fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        use PropertyKey as K;
        use PropertyValue as V;
        match (self, key) {
            (Self::Figure(f), K::Width) => Some(V::Measure(f.width)),
            (Self::Figure(f), K::Height) => Some(V::Measure(f.height)),
            (Self::Graph(g), K::CoordSys) => Some(V::CoordSys(g.coord_sys)),
            (Self::Graph(g), K::Layout) => Some(V::Layout(g.layout)),
            (Self::Graph(g), K::Clip) => Some(V::Bool(g.clip)),
            (Self::Graph(g), K::AutoRangeX) => Some(V::Bool(g.auto_range[0])),
            (Self::Graph(g), K::AutoRangeY) => Some(V::Bool(g.auto_range[1])),
            (Self::Graph(g), K::AutoRangeZ) => Some(V::Bool(g.auto_range[2])),
            (Self::Graph(g), k) => g.frame.get(k),
            (Self::Graph3D(g), K::Depth) => Some(V::Measure(g.depth)),
            (Self::Graph3D(g), K::Rotate) => Some(V::Number(g.rotate)),
            (Self::Graph3D(g), K::Elevate) => Some(V::Number(g.elevate)),
            (Self::Graph3D(g), K::ProjectionDistance) => Some(V::Number(g.distance)),
            (Self::Graph3D(g), K::AutoRangeX) => Some(V::Bool(g.auto_range[0])),
            (Self::Graph3D(g), K::AutoRangeY) => Some(V::Bool(g.auto_range[1])),
            (Self::Graph3D(g), K::AutoRangeZ) => Some(V::Bool(g.auto_range[2])),
            (Self::Graph3D(g), k) => g.frame.get(k),
            (Self::Axis(a), k) => a.get(k),
            (Self::ColorBar(c), K::BarSize) => Some(V::Measure(c.bar_size)),
            (Self::ColorBar(c), k) => c.axis.get(k),
            (Self::Ticks(t), K::Interval) => Some(V::Number(t.interval)),
            (Self::Ticks(t), K::TickLength) => Some(V::Measure(t.length)),
            (Self::Ticks(t), K::TickOrientation) => Some(V::Orientation(t.orientation)),
            (Self::Legend(p), k) => p.get(k),
            (Self::Plot(p), K::Data) => Some(V::Data(p.data.clone())),
            (Self::Plot(p), K::ShowInLegend) => Some(V::Bool(p.show_in_legend)),
            (Self::Function(f), K::X0) => Some(V::Number(f.x0)),
            (Self::Function(f), K::X1) => Some(V::Number(f.x1)),
            (Self::Function(f), K::Dx) => Some(V::Number(f.dx)),
            (Self::Function(f), K::Coefficients) => Some(V::Numbers(f.coefficients.clone())),
            (Self::Function(f), K::ShowInLegend) => Some(V::Bool(f.show_in_legend)),
            (Self::Symbol(s), K::SymbolShape) => Some(V::Shape(s.shape)),
            (Self::Symbol(s), K::SymbolSize) => Some(V::Measure(s.size)),
            (Self::ErrorBar(e), K::CapSize) => Some(V::Measure(e.cap)),
            (Self::Calib(c), K::Length) => Some(V::Measure(c.length)),
            (Self::Calib(c), K::Primary) => Some(V::Bool(c.primary)),
            (Self::Calib(c), K::AutoLabel) => Some(V::Bool(c.auto_label)),
            (Self::Calib(c), K::Text) => Some(V::Text(c.text.clone())),
            (Self::Calib(c), k) => c.at.get(k),
            (Self::Line(l), K::X2) => Some(V::Measure(l.to.x)),
            (Self::Line(l), K::Y2) => Some(V::Measure(l.to.y)),
            (Self::Line(l), k) => l.from.get(k),
            (Self::Shape(s), K::SymbolShape) => Some(V::Shape(s.shape)),
            (Self::Shape(s), k) => s.frame.get(k),
            (Self::Label(l), K::Text) => Some(V::Text(l.text.clone())),
            (Self::Label(l), k) => l.at.get(k),
            (Self::TextBox(t), K::Text) => Some(V::Text(t.text.clone())),
            (Self::TextBox(t), k) => t.frame.get(k),
            _ => None,
        }
    }

    fn store(&mut self, key: PropertyKey, value: PropertyValue) -> Result<(), EditError> {
        use PropertyKey as K;
        use PropertyValue as V;
        let bad = || EditError::InvalidValue(key);
        match (self, key, value) {
            (Self::Figure(f), K::Width, V::Measure(m)) => f.width = absolute_size(m).ok_or_else(bad)?,
            (Self::Figure(f), K::Height, V::Measure(m)) => f.height = absolute_size(m).ok_or_else(bad)?,
            (Self::Graph(g), K::CoordSys, V::CoordSys(c)) => g.coord_sys = c,
            (Self::Graph(g), K::Layout, V::Layout(l)) => g.layout = l,
            (Self::Graph(g), K::Clip, V::Bool(b)) => g.clip = b,
            (Self::Graph(g), K::AutoRangeX, V::Bool(b)) => g.auto_range[0] = b,
            (Self::Graph(g), K::AutoRangeY, V::Bool(b)) => g.auto_range[1] = b,
            (Self::Graph(g), K::AutoRangeZ, V::Bool(b)) => g.auto_range[2] = b,
            (Self::Graph(g), k, v) => g.frame.store(k, v)?,
            (Self::Graph3D(g), K::Depth, V::Measure(m)) => {
                g.depth = MeasureConstraints::SIZE.constrain(m).ok_or_else(bad)?;
            }
            (Self::Graph3D(g), K::Rotate, V::Number(n)) => g.rotate = in_range(n, -180.0, 180.0).ok_or_else(bad)?,
            (Self::Graph3D(g), K::Elevate, V::Number(n)) => g.elevate = in_range(n, -60.0, 60.0).ok_or_else(bad)?,
            (Self::Graph3D(g), K::ProjectionDistance, V::Number(n)) => {
                g.distance = in_range(n, 2.0, MAX_DISTANCE_SCALE).ok_or_else(bad)?;
            }
            (Self::Graph3D(g), K::AutoRangeX, V::Bool(b)) => g.auto_range[0] = b,
            (Self::Graph3D(g), K::AutoRangeY, V::Bool(b)) => g.auto_range[1] = b,
            (Self::Graph3D(g), K::AutoRangeZ, V::Bool(b)) => g.auto_range[2] = b,
            (Self::Graph3D(g), k, v) => g.frame.store(k, v)?,
            (Self::Axis(a), k, v) => a.store(k, v)?,
            (Self::ColorBar(c), K::BarSize, V::Measure(m)) => {
                c.bar_size = MeasureConstraints::DECORATION.constrain(m).ok_or_else(bad)?;
            }
            (Self::ColorBar(c), k, v) => c.axis.store(k, v)?,
            (Self::Ticks(t), K::Interval, V::Number(n)) if n.is_finite() && n >= 0.0 => t.interval = n,
            (Self::Ticks(t), K::TickLength, V::Measure(m)) => {
                t.length = MeasureConstraints::DECORATION.constrain(m).ok_or_else(bad)?;
            }
            (Self::Ticks(t), K::TickOrientation, V::Orientation(o)) => t.orientation = o,
            (Self::Legend(p), k, v) => p.store(k, v)?,
            (Self::Plot(p), K::Data, V::Data(d)) => p.data = d,
            (Self::Plot(p), K::ShowInLegend, V::Bool(b)) => p.show_in_legend = b,
            (Self::Function(f), K::X0, V::Number(n)) if n.is_finite() => f.x0 = n,
            (Self::Function(f), K::X1, V::Number(n)) if n.is_finite() => f.x1 = n,
            (Self::Function(f), K::Dx, V::Number(n)) if n.is_finite() && n > 0.0 => f.dx = n,
            (Self::Function(f), K::Coefficients, V::Numbers(c))
                if c.len() <= MAX_COEFFICIENTS && c.iter().all(|v| v.is_finite()) =>
            {
                f.coefficients = c;
            }
            (Self::Function(f), K::ShowInLegend, V::Bool(b)) => f.show_in_legend = b,
            (Self::Symbol(s), K::SymbolShape, V::Shape(shape)) => s.shape = shape,
            (Self::Symbol(s), K::SymbolSize, V::Measure(m)) => {
                s.size = MeasureConstraints::DECORATION.constrain(m).ok_or_else(bad)?;
            }
            (Self::ErrorBar(e), K::CapSize, V::Measure(m)) => {
                e.cap = MeasureConstraints::DECORATION.constrain(m).ok_or_else(bad)?;
            }
            (Self::Calib(c), K::Length, V::Measure(m)) => {
                c.length = MeasureConstraints::SIZE.constrain(m).ok_or_else(bad)?;
            }
            (Self::Calib(c), K::Primary, V::Bool(b)) => c.primary = b,
            (Self::Calib(c), K::AutoLabel, V::Bool(b)) => c.auto_label = b,
            (Self::Calib(c), K::Text, V::Text(t)) => c.text = t,
            (Self::Calib(c), k, v) => c.at.store(k, v)?,
            (Self::Line(l), K::X2, V::Measure(m)) => l.to.x = location(m).ok_or_else(bad)?,
            (Self::Line(l), K::Y2, V::Measure(m)) => l.to.y = location(m).ok_or_else(bad)?,
            (Self::Line(l), k, v) => l.from.store(k, v)?,
            (Self::Shape(s), K::SymbolShape, V::Shape(shape)) => s.shape = shape,
            (Self::Shape(s), k, v) => s.frame.store(k, v)?,
            (Self::Label(l), K::Text, V::Text(t)) => l.text = t,
            (Self::Label(l), k, v) => l.at.store(k, v)?,
            (Self::TextBox(t), K::Text, V::Text(s)) => t.text = s,
            (Self::TextBox(t), k, v) => t.frame.store(k, v)?,
            _ => return Err(bad()),
        }
        Ok(())
    }
}

impl super::payload::Placement {
    fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        match key {
            PropertyKey::X => Some(PropertyValue::Measure(self.x)),
            PropertyKey::Y => Some(PropertyValue::Measure(self.y)),
            _ => None,
        }
    }

    fn store(&mut self, key: PropertyKey, value: PropertyValue) -> Result<(), EditError> {
        let m = match value {
            PropertyValue::Measure(m) => location(m),
            _ => None,
        }
        .ok_or(EditError::InvalidValue(key))?;
        match key {
            PropertyKey::X => self.x = m,
            PropertyKey::Y => self.y = m,
            _ => return Err(EditError::InvalidValue(key)),
        }
        Ok(())
    }
}

impl super::payload::BoxSpec {
    fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        match key {
            PropertyKey::Width => Some(PropertyValue::Measure(self.width)),
            PropertyKey::Height => Some(PropertyValue::Measure(self.height)),
            k => self.at.get(k),
        }
    }

    fn store(&mut self, key: PropertyKey, value: PropertyValue) -> Result<(), EditError> {
        match (key, value) {
            (PropertyKey::Width, PropertyValue::Measure(m)) => {
                self.width = MeasureConstraints::SIZE
                    .constrain(m)
                    .ok_or(EditError::InvalidValue(key))?;
            }
            (PropertyKey::Height, PropertyValue::Measure(m)) => {
                self.height = MeasureConstraints::SIZE
                    .constrain(m)
                    .ok_or(EditError::InvalidValue(key))?;
            }
            (k, v) => self.at.store(k, v)?,
        }
        Ok(())
    }
}

impl super::payload::AxisSpec {
    fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        match key {
            PropertyKey::Start => Some(PropertyValue::Number(self.start)),
            PropertyKey::End => Some(PropertyValue::Number(self.end)),
            PropertyKey::Units => Some(PropertyValue::Text(self.units.clone())),
            PropertyKey::LabelOffset => Some(PropertyValue::Measure(self.label_offset)),
            _ => None,
        }
    }

    fn store(&mut self, key: PropertyKey, value: PropertyValue) -> Result<(), EditError> {
        match (key, value) {
            (PropertyKey::Start, PropertyValue::Number(n)) if n.is_finite() => self.start = n,
            (PropertyKey::End, PropertyValue::Number(n)) if n.is_finite() => self.end = n,
            (PropertyKey::Units, PropertyValue::Text(t)) => self.units = t,
            (PropertyKey::LabelOffset, PropertyValue::Measure(m)) => {
                self.label_offset = MeasureConstraints::OFFSET
                    .constrain(m)
                    .ok_or(EditError::InvalidValue(key))?;
            }
            _ => return Err(EditError::InvalidValue(key)),
        }
        Ok(())
    }
}

fn location(m: Measure) -> Option<Measure> {
    MeasureConstraints::LOCATION.constrain(m)
}

fn absolute_size(m: Measure) -> Option<Measure> {
    if m.is_relative() {
        return None;
    }
    MeasureConstraints::SIZE.constrain(m)
}

fn in_range(v: f64, lo: f64, hi: f64) -> Option<f64> {
    (lo..=hi).contains(&v).then_some(v)
}

/// Returns whether nodes of type `kind` define `key`.
#[must_use]
pub fn supports(kind: NodeKind, key: PropertyKey) -> bool {
    NodeData::new(kind).get(key).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_keys_report_inherit_until_set() {
        let mut d = NodeData::new(NodeKind::Axis);
        assert_eq!(d.get(PropertyKey::StrokeColor), Some(PropertyValue::Inherit));
        assert_eq!(
            d.set(PropertyKey::StrokeColor, PropertyValue::Color(Color::WHITE)),
            Ok(true)
        );
        assert_eq!(
            d.get(PropertyKey::StrokeColor),
            Some(PropertyValue::Color(Color::WHITE))
        );
        assert_eq!(d.set(PropertyKey::StrokeColor, PropertyValue::Inherit), Ok(true));
    }

    #[test]
    fn unsupported_and_invalid_values() {
        let mut d = NodeData::new(NodeKind::Label);
        assert_eq!(
            d.set(PropertyKey::Start, PropertyValue::Number(1.0)),
            Err(EditError::Unsupported {
                kind: NodeKind::Label,
                key: PropertyKey::Start
            })
        );
        assert_eq!(
            d.set(PropertyKey::X, PropertyValue::Bool(true)),
            Err(EditError::InvalidValue(PropertyKey::X))
        );
        let mut g = NodeData::new(NodeKind::Graph3D);
        assert!(g.set(PropertyKey::Elevate, PropertyValue::Number(61.0)).is_err());
        assert!(g.set(PropertyKey::ProjectionDistance, PropertyValue::Number(1.5)).is_err());
        assert_eq!(g.set(PropertyKey::Rotate, PropertyValue::Number(-180.0)), Ok(true));
    }

    #[test]
    fn measures_are_rounded_on_store() {
        let mut d = NodeData::new(NodeKind::Label);
        d.set(PropertyKey::X, PropertyValue::Measure(Measure::inches(1.000_04)))
            .unwrap();
        assert_eq!(
            d.get(PropertyKey::X),
            Some(PropertyValue::Measure(Measure::inches(1.0)))
        );
        assert_eq!(
            d.set(PropertyKey::X, PropertyValue::Measure(Measure::inches(1.000_01))),
            Ok(false),
            "rounds to the stored value"
        );
    }

    #[test]
    fn support_table() {
        assert!(supports(NodeKind::Graph, PropertyKey::CoordSys));
        assert!(!supports(NodeKind::Graph3D, PropertyKey::CoordSys));
        assert!(supports(NodeKind::Axis3D, PropertyKey::Start));
        assert!(supports(NodeKind::ColorBar, PropertyKey::BarSize));
        assert!(supports(NodeKind::GridLine, PropertyKey::StrokeWidth));
        assert!(!supports(NodeKind::GridLine, PropertyKey::X));
        assert!(supports(NodeKind::Graph, PropertyKey::Title));
        assert!(!supports(NodeKind::Label, PropertyKey::Title));
    }
}
