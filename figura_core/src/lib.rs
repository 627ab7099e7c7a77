// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document model and edit pipeline for scientific figures.
//!
//! `figura_core` holds a figure as a tree of typed nodes (figure, graphs,
//! axes, plots, annotations) in struct-of-arrays storage with generational
//! handles. On top of the tree it provides units and coordinate mapping,
//! style inheritance, axis auto-ranging, a bounded undo/redo history and a
//! document facade that ties them together.
//!
//! # Architecture
//!
//! Every mutation of a [`GraphicModel`](model::GraphicModel) runs the same
//! pipeline:
//!
//! ```text
//!   facade operation (insert, set_property, paste, ...)
//!       │
//!       ▼
//!   NodeStore mutation ──► ReversibleEdit (with dependent changes)
//!       │
//!       ▼
//!   NodeStore::evaluate() ──► SceneChanges (damage rects)
//!       │
//!       ▼
//!   EditHistory::post() ──► ModelListener::model_changed()
//! ```
//!
//! **[`node`]** — Struct-of-arrays node tree with generational handles, the
//! property protocol, evaluation of frames and bounds, render order and
//! subtree fragments.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//!
//! **[`units`]**, **[`viewport`]**, **[`projector`]**, **[`transform`]** —
//! Measures, the 2D user-to-physical mappings and 3D projection.
//!
//! **[`style`]**, **[`styleset`]** — Inheritable style attributes and
//! captured appearance.
//!
//! **[`data`]**, **[`autorange`]**, **[`effects`]** — Shared data sets,
//! axis auto-ranging and the side effects property changes drag along.
//!
//! **[`selection`]**, **[`multiedit`]** — The selection list and the
//! matching rules for multi-node edits.
//!
//! **[`edit`]**, **[`history`]** — Reversible edits and the bounded ledger
//! that orders them.
//!
//! **[`clipboard`]**, **[`listener`]**, **[`render`]** — The shared
//! clipboard, change notification and the cooperative render walk.
//!
//! **[`model`]** — The [`GraphicModel`](model::GraphicModel) facade.
//!
//! # Logging
//!
//! The crate logs through [`tracing`] and installs no subscriber.

pub mod autorange;
pub mod clipboard;
pub mod config;
pub mod data;
pub mod dirty;
pub mod edit;
pub mod effects;
pub mod error;
pub mod history;
pub mod listener;
pub mod model;
pub mod multiedit;
pub mod node;
pub mod projector;
pub mod render;
pub mod selection;
pub mod style;
pub mod styleset;
pub mod transform;
pub mod units;
pub mod viewport;
