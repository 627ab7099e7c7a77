// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-graph data model.
//!
//! A *node* is an element of a figure's document tree. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed.
//! - Topology: a parent, an ordered list of regular children and, for
//!   composite types, a fixed ordered list of *components* (axes, grid lines,
//!   legend, color bar, symbol, error bar, violin). Components are created
//!   with their owner and cannot be inserted, removed or reordered.
//! - **Attributes** set by the caller through the property protocol
//!   ([`NodeStore::set_property`]): measures, flags, text, data sets and the
//!   six inheritable style attributes.
//! - **Computed properties** produced by [`evaluate`](NodeStore::evaluate):
//!   the resolved style, the effective hidden flag, the frame a container
//!   establishes (a [`Viewport2D`](crate::viewport::Viewport2D) or a
//!   [`Projector`](crate::projector::Projector)) and physical bounds.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)):
//!
//! - **LAYOUT** / **STYLE** propagate to all descendants, since frames and
//!   resolved styles are inherited.
//! - **CONTENT** is local-only.
//! - **TOPOLOGY** marks the parent whose child list changed.

mod evaluate;
mod fragment;
mod id;
mod kind;
mod layout;
mod payload;
mod props;
mod store;
mod traverse;

pub use evaluate::SceneChanges;
pub use fragment::NodeFragment;
pub use id::{INVALID, ModelId, NodeId};
pub use kind::{ComponentRole, NodeKind};
pub use payload::{
    AxisLike, AxisSpec, BoxSpec, CalibSpec, ColorBarSpec, ErrorBarSpec, FigureSpec, FunctionSpec,
    Graph3DSpec, GraphSpec, LabelSpec, LineSpec, NodeData, Payload, Placement, PlotSpec,
    Plottable, Positionable, ShapeSpec, SymbolShape, SymbolSpec, TextBoxSpec, TickOrientation,
    TickSpec,
};
pub use props::{PropertyChange, PropertyKey, PropertyValue, supports};
pub use store::{Frame, NodeStore};
pub use traverse::{Children, RenderPass, RenderStep};
