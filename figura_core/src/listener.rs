// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model-change notification.
//!
//! Listeners implement [`ModelListener`] and are registered with a model.
//! [`ListenerList`] is copy-on-iterate: dispatch works on a snapshot taken
//! under the lock, so a listener added or removed during dispatch takes
//! effect from the next event on.

use std::sync::Arc;

use kurbo::Rect;
use parking_lot::Mutex;

use crate::node::{ModelId, NodeId};

/// What kind of change a [`ModelEvent`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The whole content was replaced or reset.
    Reload,
    /// Nodes were inserted, removed or reordered.
    InsertOrRemove,
    /// Properties changed.
    Define,
    /// The selection changed.
    Selection,
    /// The edit history changed (posted, undone, redone or discarded).
    EditHistory,
    /// The modified flag was cleared.
    ModFlagReset,
}

/// One change notification.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelEvent {
    /// The model that changed.
    pub model: ModelId,
    /// The kind of change.
    pub kind: ChangeKind,
    /// The nodes the change applies to, if any.
    pub nodes: Vec<NodeId>,
    /// Physical regions that need repainting.
    pub damage: Vec<Rect>,
}

impl ModelEvent {
    /// An event with no nodes and no damage.
    #[must_use]
    pub fn new(model: ModelId, kind: ChangeKind) -> Self {
        Self {
            model,
            kind,
            nodes: Vec::new(),
            damage: Vec::new(),
        }
    }

    /// The union of all damaged regions.
    #[must_use]
    pub fn damage_bounds(&self) -> Option<Rect> {
        self.damage.iter().copied().reduce(|a, b| a.union(b))
    }
}

/// Receives model-change notifications.
pub trait ModelListener: Send + Sync {
    /// Called after every change, on the thread that made it.
    fn model_changed(&self, event: &ModelEvent);
}

impl<F> ModelListener for F
where
    F: Fn(&ModelEvent) + Send + Sync,
{
    fn model_changed(&self, event: &ModelEvent) {
        self(event);
    }
}

/// Identifies a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A thread-safe list of listeners.
#[derive(Default)]
pub struct ListenerList {
    inner: Mutex<Listeners>,
}

#[derive(Default)]
struct Listeners {
    next: u64,
    entries: Vec<(ListenerId, Arc<dyn ModelListener>)>,
}

impl core::fmt::Debug for ListenerList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl ListenerList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn add(&self, listener: Arc<dyn ModelListener>) -> ListenerId {
        let mut l = self.inner.lock();
        let id = ListenerId(l.next);
        l.next += 1;
        l.entries.push((id, listener));
        id
    }

    /// Unregisters a listener. Returns whether it was registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut l = self.inner.lock();
        let before = l.entries.len();
        l.entries.retain(|(i, _)| *i != id);
        l.entries.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Delivers `event` to a snapshot of the registered listeners, in
    /// registration order.
    pub fn dispatch(&self, event: &ModelEvent) {
        let snapshot: Vec<Arc<dyn ModelListener>> =
            self.inner.lock().entries.iter().map(|(_, l)| Arc::clone(l)).collect();
        tracing::trace!(kind = ?event.kind, listeners = snapshot.len(), "dispatch");
        for l in snapshot {
            l.model_changed(event);
        }
    }
}
