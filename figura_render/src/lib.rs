// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plans, damage tracking and vector export for figura.
//!
//! This crate sits between [`figura_core`]'s evaluated node tree and a
//! drawing backend. It defines:
//!
//! - [`RenderPlan`] — the draw items of one render pass, each a geometric
//!   [`Primitive`] in physical milli-inches with its resolved style
//! - [`DamageRegion`] — accumulated repaint regions, fed by model events
//!   through a [`DamageTracker`] listener
//! - [`vector::export`] — a PostScript-style dump of the figure in render
//!   order

mod damage;
mod plan;
pub mod vector;

pub use damage::{DamageRegion, DamageTracker};
pub use plan::{DrawItem, Primitive, RenderPlan};
