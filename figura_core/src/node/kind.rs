// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed catalogue of node types and the insertion grammar.

/// The type tag of a node.
///
/// Dispatch in the tree-walking algorithms (insert eligibility, style-set
/// application, multi-edit matching) is a `match` over this enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// The root of every model.
    Figure,
    /// A 2D data container.
    Graph,
    /// A 3D data container.
    Graph3D,
    /// A 2D graph axis (component).
    Axis,
    /// A 3D graph axis (component).
    Axis3D,
    /// A set of tick marks along an axis.
    TickSet,
    /// Grid lines derived from an axis's major ticks (component).
    GridLine,
    /// A graph legend (component).
    Legend,
    /// The Z/color axis of a container (component).
    ColorBar,
    /// A data trace: polyline and markers through a point set.
    Trace,
    /// A sampled polynomial `y = f(x)`.
    Function,
    /// A box plot of grouped samples.
    BoxPlot,
    /// A 3D point cloud.
    Scatter3D,
    /// Marker symbol of a plotted element (component).
    Symbol,
    /// Error bars or whiskers of a plotted element (component).
    ErrorBar,
    /// Violin outline of a box plot (component).
    Violin,
    /// A calibration bar whose label tracks an axis's units.
    CalibBar,
    /// A straight line segment.
    Line,
    /// A closed shape (rectangle, ellipse, ...).
    Shape,
    /// A single-line text label.
    Label,
    /// A rectangular multi-line text block.
    TextBox,
}

impl NodeKind {
    /// Every node type, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::Figure,
        Self::Graph,
        Self::Graph3D,
        Self::Axis,
        Self::Axis3D,
        Self::TickSet,
        Self::GridLine,
        Self::Legend,
        Self::ColorBar,
        Self::Trace,
        Self::Function,
        Self::BoxPlot,
        Self::Scatter3D,
        Self::Symbol,
        Self::ErrorBar,
        Self::Violin,
        Self::CalibBar,
        Self::Line,
        Self::Shape,
        Self::Label,
        Self::TextBox,
    ];

    /// Returns whether a node of this type accepts `child` as a regular child.
    #[must_use]
    pub const fn can_insert(self, child: Self) -> bool {
        use NodeKind as K;
        match self {
            K::Figure => matches!(child, K::Graph | K::Graph3D | K::Line | K::Shape | K::Label | K::TextBox),
            K::Graph => matches!(
                child,
                K::Trace
                    | K::Function
                    | K::BoxPlot
                    | K::CalibBar
                    | K::Line
                    | K::Shape
                    | K::Label
                    | K::TextBox
                    | K::Graph
            ),
            K::Graph3D => matches!(child, K::Scatter3D | K::Label),
            K::Axis | K::Axis3D => matches!(child, K::TickSet),
            K::Shape => matches!(child, K::Label),
            _ => false,
        }
    }

    /// The fixed component roles a node of this type is created with, in
    /// component-list order.
    #[must_use]
    pub const fn component_roles(self) -> &'static [ComponentRole] {
        use ComponentRole as R;
        match self {
            Self::Graph => &[
                R::PrimaryAxis,
                R::SecondaryAxis,
                R::PrimaryGrid,
                R::SecondaryGrid,
                R::ColorBar,
                R::Legend,
            ],
            Self::Graph3D => &[R::XAxis, R::YAxis, R::ZAxis, R::ColorBar, R::Legend],
            Self::Trace => &[R::Symbol, R::ErrorBar],
            Self::Function | Self::Scatter3D => &[R::Symbol],
            Self::BoxPlot => &[R::Symbol, R::ErrorBar, R::Violin],
            _ => &[],
        }
    }

    /// Returns whether this type is a graph container.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Graph | Self::Graph3D)
    }

    /// Returns whether this type plots data and participates in auto-ranging.
    #[must_use]
    pub const fn is_plottable(self) -> bool {
        matches!(
            self,
            Self::Trace | Self::Function | Self::BoxPlot | Self::Scatter3D
        )
    }

    /// Returns whether this type only ever exists as a fixed component.
    #[must_use]
    pub const fn is_component_only(self) -> bool {
        matches!(
            self,
            Self::Axis
                | Self::Axis3D
                | Self::GridLine
                | Self::Legend
                | Self::ColorBar
                | Self::Symbol
                | Self::ErrorBar
                | Self::Violin
        )
    }

    /// Returns whether regular children of this type are clipped to the
    /// container's data window when clipping is enabled.
    #[must_use]
    pub const fn is_clippable(self) -> bool {
        self.is_plottable() || matches!(self, Self::CalibBar)
    }

    /// A short lowercase name, used in diagnostics and edit descriptions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Figure => "figure",
            Self::Graph => "graph",
            Self::Graph3D => "graph3d",
            Self::Axis => "axis",
            Self::Axis3D => "axis3d",
            Self::TickSet => "ticks",
            Self::GridLine => "gridline",
            Self::Legend => "legend",
            Self::ColorBar => "colorbar",
            Self::Trace => "trace",
            Self::Function => "function",
            Self::BoxPlot => "box",
            Self::Scatter3D => "scatter3d",
            Self::Symbol => "symbol",
            Self::ErrorBar => "ebar",
            Self::Violin => "violin",
            Self::CalibBar => "calib",
            Self::Line => "line",
            Self::Shape => "shape",
            Self::Label => "label",
            Self::TextBox => "textbox",
        }
    }
}

/// The structural role of a component child within its parent.
///
/// Roles are how the multi-edit and style-set engines find "the same"
/// component across different containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentRole {
    /// Horizontal (or theta) axis of a 2D graph.
    PrimaryAxis,
    /// Vertical (or radial) axis of a 2D graph.
    SecondaryAxis,
    /// Grid lines at the primary axis's major ticks.
    PrimaryGrid,
    /// Grid lines at the secondary axis's major ticks.
    SecondaryGrid,
    /// The container's Z/color axis.
    ColorBar,
    /// The container's legend.
    Legend,
    /// X axis of a 3D graph.
    XAxis,
    /// Y axis of a 3D graph.
    YAxis,
    /// Z axis of a 3D graph.
    ZAxis,
    /// Marker symbol of a plotted element.
    Symbol,
    /// Error bar (or box-plot whisker) of a plotted element.
    ErrorBar,
    /// Violin outline of a box plot.
    Violin,
}

impl ComponentRole {
    /// The node type created for this role.
    #[must_use]
    pub const fn kind(self) -> NodeKind {
        match self {
            Self::PrimaryAxis | Self::SecondaryAxis => NodeKind::Axis,
            Self::XAxis | Self::YAxis | Self::ZAxis => NodeKind::Axis3D,
            Self::PrimaryGrid | Self::SecondaryGrid => NodeKind::GridLine,
            Self::ColorBar => NodeKind::ColorBar,
            Self::Legend => NodeKind::Legend,
            Self::Symbol => NodeKind::Symbol,
            Self::ErrorBar => NodeKind::ErrorBar,
            Self::Violin => NodeKind::Violin,
        }
    }

    /// Returns whether hit-testing may select this component directly.
    #[must_use]
    pub const fn is_focusable(self) -> bool {
        matches!(
            self,
            Self::PrimaryAxis
                | Self::SecondaryAxis
                | Self::XAxis
                | Self::YAxis
                | Self::ZAxis
                | Self::ColorBar
                | Self::Legend
        )
    }

    /// The equivalent role in a container of type `container`, if any.
    ///
    /// This is the best-effort mapping used when carrying styles between
    /// 2D and 3D graphs: primary maps to X and secondary to Y.
    #[must_use]
    pub const fn counterpart_in(self, container: NodeKind) -> Option<Self> {
        match (container, self) {
            (NodeKind::Graph, Self::XAxis) => Some(Self::PrimaryAxis),
            (NodeKind::Graph, Self::YAxis) => Some(Self::SecondaryAxis),
            (NodeKind::Graph, Self::ZAxis) => None,
            (NodeKind::Graph3D, Self::PrimaryAxis) => Some(Self::XAxis),
            (NodeKind::Graph3D, Self::SecondaryAxis) => Some(Self::YAxis),
            (NodeKind::Graph3D, Self::PrimaryGrid | Self::SecondaryGrid) => None,
            (NodeKind::Graph | NodeKind::Graph3D, _) => Some(self),
            _ => None,
        }
    }

    /// Returns whether this is a grid-line role derived from `axis`.
    #[must_use]
    pub const fn grid_for(axis: Self) -> Option<Self> {
        match axis {
            Self::PrimaryAxis => Some(Self::PrimaryGrid),
            Self::SecondaryAxis => Some(Self::SecondaryGrid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_never_accepts_axes() {
        assert!(!NodeKind::Graph.can_insert(NodeKind::Axis), "axes are components");
        assert!(NodeKind::Graph.can_insert(NodeKind::Trace), "traces are regular");
        assert!(NodeKind::Graph.can_insert(NodeKind::Graph), "graphs nest");
    }

    #[test]
    fn component_only_kinds_are_never_insertable() {
        for parent in NodeKind::ALL {
            for child in NodeKind::ALL.iter().copied().filter(|k| k.is_component_only()) {
                assert!(
                    !parent.can_insert(child),
                    "{parent:?} must not accept {child:?}"
                );
            }
        }
    }

    #[test]
    fn roles_create_matching_kinds() {
        for kind in NodeKind::ALL {
            for role in kind.component_roles() {
                assert!(role.kind().is_component_only(), "{role:?}");
            }
        }
    }

    #[test]
    fn role_counterparts_between_families() {
        assert_eq!(
            ComponentRole::PrimaryAxis.counterpart_in(NodeKind::Graph3D),
            Some(ComponentRole::XAxis)
        );
        assert_eq!(ComponentRole::ZAxis.counterpart_in(NodeKind::Graph), None);
        assert_eq!(
            ComponentRole::Legend.counterpart_in(NodeKind::Graph),
            Some(ComponentRole::Legend)
        );
    }
}
