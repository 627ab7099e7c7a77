// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render-walk protocol.
//!
//! Rendering is a cooperative, read-only walk over the render order of an
//! evaluated tree. The walk hands each [`RenderStep`] to a [`Painter`] and
//! polls a [`RenderTask`] every few nodes; a cancelled task or a painter
//! returning `false` abandons the pass. The walk never mutates the model.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::node::{NodeId, NodeStore, RenderStep};

/// Cancellation and progress token for one render pass.
///
/// Shared between the thread that renders and the thread that may cancel.
#[derive(Debug, Default)]
pub struct RenderTask {
    cancelled: AtomicBool,
    done: AtomicUsize,
    total: AtomicUsize,
}

impl RenderTask {
    /// Creates a fresh token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the pass stop at its next poll.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Nodes painted so far and the total for this pass.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.done.load(Ordering::Relaxed), self.total.load(Ordering::Relaxed))
    }

    fn start(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
    }

    fn advance(&self, done: usize) {
        self.done.store(done, Ordering::Relaxed);
    }
}

/// Draws render steps.
pub trait Painter {
    /// Draws one step. Returns `false` to abandon the pass.
    fn paint(&mut self, store: &NodeStore, step: &RenderStep) -> bool;
}

impl<F> Painter for F
where
    F: FnMut(&NodeStore, &RenderStep) -> bool,
{
    fn paint(&mut self, store: &NodeStore, step: &RenderStep) -> bool {
        self(store, step)
    }
}

impl NodeStore {
    /// Paints the tree under `root` in render order.
    ///
    /// Polls `task` before the first step and then every `granularity`
    /// steps. Returns `false` if the pass was cancelled or the painter
    /// abandoned it.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    pub fn render(&self, root: NodeId, painter: &mut dyn Painter, task: &RenderTask, granularity: usize) -> bool {
        let order = self.render_order(root);
        let every = granularity.max(1);
        task.start(order.len());
        for (i, step) in order.iter().enumerate() {
            if i % every == 0 && task.is_cancelled() {
                tracing::debug!(painted = i, total = order.len(), "render cancelled");
                return false;
            }
            if !painter.paint(self, step) {
                return false;
            }
            task.advance(i + 1);
        }
        true
    }
}
