// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A clipboard of copied subtrees, shareable between models.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::node::NodeFragment;

/// Holds the fragments of the last copy or cut.
///
/// Cloning a `Clipboard` yields another handle to the same contents; give
/// each model its own instance to keep them isolated.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    contents: Arc<Mutex<Vec<NodeFragment>>>,
}

impl Clipboard {
    /// Creates an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents.
    pub fn set(&self, fragments: Vec<NodeFragment>) {
        *self.contents.lock() = fragments;
    }

    /// A copy of the contents, in copy order.
    #[must_use]
    pub fn contents(&self) -> Vec<NodeFragment> {
        self.contents.lock().clone()
    }

    /// Number of held fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.lock().len()
    }

    /// Returns whether the clipboard is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.lock().is_empty()
    }

    /// Empties the clipboard.
    pub fn clear(&self) {
        self.contents.lock().clear();
    }

    /// Returns whether both handles share the same contents.
    #[must_use]
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.contents, &other.contents)
    }
}
