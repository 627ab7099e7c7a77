// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Figura uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! decide which nodes need their layout or cached render state recomputed
//! after an edit.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`LAYOUT`] and [`STYLE`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency edges
//!   from child to parent. A moved graph relocates everything inside it, and
//!   a font change on a graph reaches every child that inherits it.
//!
//! - **Local-only**: [`CONTENT`] covers data sets, text, symbol shapes and
//!   other per-node payload. Only the marked node is reported.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on the parent when a regular
//!   child is inserted, removed or reordered.
//!
//! # Consumption
//!
//! [`NodeStore::evaluate`](crate::node::NodeStore::evaluate) drains every
//! channel and reports the result as
//! [`SceneChanges`](crate::node::SceneChanges).

use understory_dirty::Channel;

/// Location, size or viewport inputs changed; bounds of the subtree must be
/// recomputed.
pub const LAYOUT: Channel = Channel::new(0);

/// An inheritable style attribute changed.
pub const STYLE: Channel = Channel::new(1);

/// Per-node payload changed; no propagation needed.
pub const CONTENT: Channel = Channel::new(2);

/// The regular child list changed.
pub const TOPOLOGY: Channel = Channel::new(3);
