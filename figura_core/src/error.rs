// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Internal error type for fallible tree and property operations.
//!
//! The [`GraphicModel`](crate::model::GraphicModel) facade converts these
//! into `bool`/`Option` returns and logs them; lower layers propagate them
//! with `?`.

use crate::node::{NodeId, NodeKind, PropertyKey};

/// Why a tree or property operation was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EditError {
    /// The handle refers to a destroyed node.
    #[error("stale node handle {0:?}")]
    StaleNode(NodeId),
    /// The parent type does not accept the child type.
    #[error("a {} node does not accept a {} child", .parent.name(), .child.name())]
    Disallowed {
        /// The parent's type.
        parent: NodeKind,
        /// The rejected child's type.
        child: NodeKind,
    },
    /// The node is already attached to a parent.
    #[error("node {0:?} already has an owner")]
    AlreadyOwned(NodeId),
    /// The node has no parent.
    #[error("node {0:?} is detached")]
    Detached(NodeId),
    /// Inserting the node would make it its own ancestor.
    #[error("inserting {0:?} would create a cycle")]
    Cycle(NodeId),
    /// The node is not a regular child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node that was not found.
        child: NodeId,
    },
    /// The value is of the wrong type or violates the property's constraints.
    #[error("invalid value for {0:?}")]
    InvalidValue(PropertyKey),
    /// The property is not defined for this node type.
    #[error("{key:?} is not a property of {kind:?}")]
    Unsupported {
        /// The node's type.
        kind: NodeKind,
        /// The requested property.
        key: PropertyKey,
    },
    /// Component children cannot be inserted, removed or reordered.
    #[error("node {0:?} is a fixed component")]
    Component(NodeId),
}
