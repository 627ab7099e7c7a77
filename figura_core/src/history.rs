// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded undo/redo ledger.
//!
//! [`EditHistory`] is generic over the edit type: it only orders, retains
//! and hands out edits, and leaves inverting them to the caller. Its state
//! lives behind a [`parking_lot::Mutex`] so that status queries from another
//! thread see a consistent cursor, but the inversion callback always runs
//! with the lock released, since inverting an edit re-enters the model and
//! may try to post.
//!
//! ```text
//!   edits:  [ e0  e1  e2 | e3  e4 ]
//!                        ^ cursor (last_undone)
//!           undoable ----+---- redoable
//! ```
//!
//! Edits that leave the ledger (evicted, discarded with the redo branch,
//! suppressed, or cleared) are handed back so the owner can release any
//! resources only they kept alive.

use std::sync::Arc;

use parking_lot::Mutex;

/// Default number of edits retained.
pub const DEFAULT_CAPACITY: usize = 30;

#[derive(Debug)]
struct State<E> {
    edits: Vec<Arc<E>>,
    last_undone: usize,
    block_count: u32,
    in_progress: bool,
}

/// A bounded, transactional ledger of reversible edits.
#[derive(Debug)]
pub struct EditHistory<E> {
    state: Mutex<State<E>>,
    capacity: usize,
}

/// The result of [`EditHistory::post`].
#[derive(Debug)]
#[must_use]
pub struct PostOutcome<E> {
    /// Whether the edit was appended.
    pub posted: bool,
    /// Edits that left the ledger, including the posted edit itself if it
    /// was suppressed.
    pub released: Vec<Arc<E>>,
}

/// The result of [`EditHistory::undo_or_redo`].
#[derive(Debug)]
#[must_use]
pub enum Inversion<E> {
    /// Nothing to undo or redo, or an inversion is already running.
    Skipped,
    /// The edit was inverted (or re-applied) successfully.
    Applied(Arc<E>),
    /// The inversion failed; the whole ledger was discarded.
    Failed {
        /// The edit that failed.
        edit: Arc<E>,
        /// Every edit that was in the ledger.
        released: Vec<Arc<E>>,
    },
}

impl<E> Default for EditHistory<E> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<E> EditHistory<E> {
    /// Creates an empty ledger retaining at most `capacity` edits (at least
    /// one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                edits: Vec::new(),
                last_undone: 0,
                block_count: 0,
                in_progress: false,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of retained edits.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends an edit, discarding the redo branch and evicting the oldest
    /// edit when full.
    ///
    /// Does nothing but release the edit while posting is blocked or an
    /// undo/redo is in progress.
    pub fn post(&self, edit: E) -> PostOutcome<E> {
        let edit = Arc::new(edit);
        let mut s = self.state.lock();
        if s.in_progress || s.block_count > 0 {
            return PostOutcome {
                posted: false,
                released: vec![edit],
            };
        }
        let cursor = s.last_undone;
        let mut released: Vec<Arc<E>> = s.edits.drain(cursor..).collect();
        if s.edits.len() >= self.capacity {
            let excess = s.edits.len() + 1 - self.capacity;
            released.extend(s.edits.drain(..excess));
        }
        s.edits.push(edit);
        s.last_undone = s.edits.len();
        PostOutcome { posted: true, released }
    }

    /// Undoes the edit before the cursor (or redoes the edit at the cursor)
    /// by calling `invert(edit, redo)`.
    ///
    /// The cursor moves before `invert` runs, and `invert` runs without the
    /// internal lock held; posting is suppressed until it returns or
    /// unwinds. If `invert` returns `false` the ledger is cleared.
    pub fn undo_or_redo(&self, redo: bool, invert: impl FnOnce(&E, bool) -> bool) -> Inversion<E> {
        let edit = {
            let mut s = self.state.lock();
            if s.in_progress {
                return Inversion::Skipped;
            }
            let idx = if redo {
                if s.last_undone >= s.edits.len() {
                    return Inversion::Skipped;
                }
                s.last_undone += 1;
                s.last_undone - 1
            } else {
                if s.last_undone == 0 {
                    return Inversion::Skipped;
                }
                s.last_undone -= 1;
                s.last_undone
            };
            s.in_progress = true;
            Arc::clone(&s.edits[idx])
        };

        let ok = {
            let _guard = InProgress(&self.state);
            invert(&edit, redo)
        };
        if ok {
            Inversion::Applied(edit)
        } else {
            let released = self.clear();
            Inversion::Failed { edit, released }
        }
    }

    /// Suppresses posting until a matching [`unblock`](Self::unblock).
    /// Calls nest.
    pub fn block(&self) {
        self.state.lock().block_count += 1;
    }

    /// Releases one [`block`](Self::block).
    pub fn unblock(&self) {
        let mut s = self.state.lock();
        s.block_count = s.block_count.saturating_sub(1);
    }

    /// Blocks posting until the returned guard is dropped, even during
    /// unwinding.
    #[must_use = "posting is unblocked as soon as the guard is dropped"]
    pub fn blocked(&self) -> Blocked<'_, E> {
        self.block();
        Blocked(&self.state)
    }

    /// Returns whether posting is currently blocked.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.state.lock().block_count > 0
    }

    /// Returns whether an undo or redo is running.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.state.lock().in_progress
    }

    /// Empties the ledger and returns the released edits.
    pub fn clear(&self) -> Vec<Arc<E>> {
        let mut s = self.state.lock();
        s.last_undone = 0;
        core::mem::take(&mut s.edits)
    }

    /// Returns whether there is an edit to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.state.lock().last_undone > 0
    }

    /// Returns whether there is an edit to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        let s = self.state.lock();
        s.last_undone < s.edits.len()
    }

    /// Number of retained edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().edits.len()
    }

    /// Returns whether no edits are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().edits.is_empty()
    }

    /// The cursor: edits below it can be undone, the rest redone.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.state.lock().last_undone
    }

    /// The edit the next undo would invert.
    #[must_use]
    pub fn next_undo(&self) -> Option<Arc<E>> {
        let s = self.state.lock();
        s.last_undone.checked_sub(1).map(|i| Arc::clone(&s.edits[i]))
    }

    /// The edit the next redo would re-apply.
    #[must_use]
    pub fn next_redo(&self) -> Option<Arc<E>> {
        let s = self.state.lock();
        s.edits.get(s.last_undone).cloned()
    }

    /// A snapshot of every retained edit, oldest first.
    #[must_use]
    pub fn retained(&self) -> Vec<Arc<E>> {
        self.state.lock().edits.clone()
    }
}

/// Clears the in-progress flag when dropped, even during unwinding.
struct InProgress<'a, E>(&'a Mutex<State<E>>);

impl<E> Drop for InProgress<'_, E> {
    fn drop(&mut self) {
        self.0.lock().in_progress = false;
    }
}

/// Holds one [`EditHistory::block`] for its lifetime.
#[derive(Debug)]
pub struct Blocked<'a, E>(&'a Mutex<State<E>>);

impl<E> Drop for Blocked<'_, E> {
    fn drop(&mut self) {
        let mut s = self.0.lock();
        s.block_count = s.block_count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use proptest::prelude::*;

    use super::*;

    fn values(h: &EditHistory<u32>) -> Vec<u32> {
        h.retained().iter().map(|e| **e).collect()
    }

    #[test]
    fn thirty_first_edit_evicts_the_oldest() {
        let h = EditHistory::default();
        for i in 0..30 {
            assert!(h.post(i).released.is_empty());
        }
        let out = h.post(30);
        assert!(out.posted);
        assert_eq!(out.released.len(), 1);
        assert_eq!(*out.released[0], 0);
        assert_eq!(h.len(), 30);
        assert_eq!(values(&h)[0], 1);
    }

    #[test]
    fn posting_discards_the_redo_branch() {
        let h = EditHistory::new(10);
        for i in 0..4 {
            let _ = h.post(i);
        }
        assert!(matches!(h.undo_or_redo(false, |_, _| true), Inversion::Applied(_)));
        assert!(matches!(h.undo_or_redo(false, |_, _| true), Inversion::Applied(_)));
        assert_eq!(h.cursor(), 2);
        let out = h.post(9);
        let discarded: Vec<u32> = out.released.iter().map(|e| **e).collect();
        assert_eq!(discarded, vec![2, 3]);
        assert_eq!(values(&h), vec![0, 1, 9]);
        assert!(!h.can_redo());
    }

    #[test]
    fn undo_then_redo_walks_the_cursor() {
        let h = EditHistory::new(10);
        let _ = h.post(1);
        let mut seen = Vec::new();
        let _ = h.undo_or_redo(false, |e, redo| {
            seen.push((*e, redo));
            true
        });
        let _ = h.undo_or_redo(true, |e, redo| {
            seen.push((*e, redo));
            true
        });
        assert_eq!(seen, vec![(1, false), (1, true)]);
        assert!(matches!(h.undo_or_redo(true, |_, _| true), Inversion::Skipped));
        assert_eq!(h.next_undo().as_deref(), Some(&1));
    }

    #[test]
    fn posting_is_suppressed_during_inversion() {
        let h = EditHistory::new(10);
        let _ = h.post(1);
        let _ = h.undo_or_redo(false, |_, _| {
            let out = h.post(2);
            assert!(!out.posted, "posted during undo");
            assert!(h.is_in_progress());
            assert!(matches!(h.undo_or_redo(true, |_, _| true), Inversion::Skipped));
            true
        });
        assert_eq!(values(&h), vec![1]);
        assert!(!h.is_in_progress());
    }

    #[test]
    fn blocking_nests() {
        let h = EditHistory::new(10);
        h.block();
        h.block();
        h.unblock();
        assert!(!h.post(1).posted);
        h.unblock();
        assert!(h.post(2).posted);
        h.unblock();
        assert!(!h.is_blocked(), "extra unblock saturates");
    }

    #[test]
    fn block_guard_releases_on_unwind() {
        let h = EditHistory::new(10);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _blocked = h.blocked();
            assert!(!h.post(1).posted, "posted while blocked");
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!h.is_blocked());
        assert!(h.post(2).posted);
    }

    #[test]
    fn failed_inversion_discards_everything() {
        let h = EditHistory::new(10);
        for i in 0..3 {
            let _ = h.post(i);
        }
        match h.undo_or_redo(false, |_, _| false) {
            Inversion::Failed { edit, released } => {
                assert_eq!(*edit, 2);
                assert_eq!(released.len(), 3);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(h.len(), 0);
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn panicking_inversion_clears_the_flag() {
        let h = EditHistory::new(10);
        let _ = h.post(1);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _ = h.undo_or_redo(false, |_, _| panic!("boom"));
        }));
        assert!(result.is_err());
        assert!(!h.is_in_progress());
        assert!(h.post(2).posted);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Post,
        Undo,
        Redo,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Post), Just(Op::Undo), Just(Op::Redo)]
    }

    proptest! {
        #[test]
        fn ledger_invariants(ops in prop::collection::vec(op(), 0..120), capacity in 1_usize..8) {
            let h = EditHistory::new(capacity);
            let mut next = 0_u32;
            for op in ops {
                let (len, cursor) = (h.len(), h.cursor());
                match op {
                    Op::Post => {
                        let out = h.post(next);
                        next += 1;
                        let evicted = usize::from(cursor == capacity);
                        prop_assert_eq!(out.released.len(), len - cursor + evicted);
                        prop_assert_eq!(h.cursor(), h.len());
                    }
                    Op::Undo => {
                        let _ = h.undo_or_redo(false, |_, _| true);
                        prop_assert_eq!(h.cursor(), cursor.saturating_sub(1));
                    }
                    Op::Redo => {
                        let _ = h.undo_or_redo(true, |_, _| true);
                        prop_assert_eq!(h.cursor(), (cursor + 1).min(len));
                    }
                }
                prop_assert!(h.len() <= capacity);
                prop_assert!(h.cursor() <= h.len());
            }
        }
    }
}
