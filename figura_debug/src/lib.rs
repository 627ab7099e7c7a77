// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, event recording and JSON dumps for figura diagnostics.
//!
//! This crate provides [`ModelListener`](figura_core::listener::ModelListener)
//! implementations and tree dumps for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrinter`] — human-readable one-line-per-event output,
//!   and [`pretty::tree`] for an indented outline of a subtree.
//! - [`recorder::EventRecorder`] — compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::dump`] — a JSON snapshot of a subtree and its properties.

pub mod json;
pub mod pretty;
pub mod recorder;
