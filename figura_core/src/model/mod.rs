// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document facade.
//!
//! [`GraphicModel`] owns a figure tree, the selection, the edit history and
//! the listener list, and shares a [`Clipboard`]. Every mutating operation
//! runs the same pipeline:
//!
//! 1. Validate arguments against the live tree. Rejected operations return
//!    `false` (or `None`) and change nothing.
//! 2. Mutate the store, collecting every change, dependent changes
//!    included, into one [`ReversibleEdit`].
//! 3. Re-evaluate the tree to refresh frames and bounds and collect damage.
//! 4. Post the edit and release the detached subtrees that edits leaving the
//!    history kept alive.
//! 5. Notify listeners.
//!
//! Whole-model operations (content replacement, reset, data injection)
//! clear the history instead of posting.

mod clip;
mod props;
mod tree;

pub use tree::{Alignment, ZOrder};

use std::sync::Arc;

use kurbo::{Point, Rect};

use crate::clipboard::Clipboard;
use crate::config::ModelConfig;
use crate::edit::{ReversibleEdit, discard_detached, release_detached};
use crate::history::{EditHistory, Inversion};
use crate::listener::{ChangeKind, ListenerId, ListenerList, ModelEvent, ModelListener};
use crate::node::{ModelId, NodeId, NodeKind, NodeStore, SceneChanges};
use crate::render::{Painter, RenderTask};
use crate::selection::Selection;

/// An editable figure.
#[derive(Debug)]
pub struct GraphicModel {
    id: ModelId,
    store: NodeStore,
    root: NodeId,
    selection: Selection,
    history: EditHistory<ReversibleEdit>,
    clipboard: Clipboard,
    listeners: ListenerList,
    modified: bool,
    scratch: SceneChanges,
}

impl GraphicModel {
    /// Creates a model holding an empty figure, with the default
    /// configuration.
    #[must_use]
    pub fn new(clipboard: Clipboard) -> Self {
        Self::with_config(ModelConfig::default(), clipboard)
    }

    /// Creates a model holding an empty figure.
    #[must_use]
    pub fn with_config(config: ModelConfig, clipboard: Clipboard) -> Self {
        let id = ModelId::next();
        let history = EditHistory::new(config.history_capacity);
        let mut store = NodeStore::with_config(config);
        let root = store.create(NodeKind::Figure);
        store.set_owner(root, Some(id));
        let mut model = Self {
            id,
            store,
            root,
            selection: Selection::new(root),
            history,
            clipboard,
            listeners: ListenerList::new(),
            modified: false,
            scratch: SceneChanges::default(),
        };
        let _ = model.evaluate();
        model
    }

    // -- Accessors --

    /// This model's identity, as recorded on its nodes.
    #[must_use]
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// The root figure.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read access to the evaluated node store.
    #[must_use]
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// The edit history.
    #[must_use]
    pub fn history(&self) -> &EditHistory<ReversibleEdit> {
        &self.history
    }

    /// The clipboard this model copies to and pastes from.
    #[must_use]
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Returns whether `id` is a live node of this model's tree.
    #[must_use]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.store.is_alive(id) && self.store.owner(id) == Some(self.id)
    }

    /// Creates a detached node for a later [`insert`](Self::insert).
    ///
    /// A node that is never inserted stays allocated until it is passed to
    /// [`discard`](Self::discard).
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.store.create(kind)
    }

    /// Destroys a detached node and its subtree.
    ///
    /// Attached nodes, components and nodes an undoable edit still refers to
    /// are left alone. Returns whether the node was destroyed.
    pub fn discard(&mut self, id: NodeId) -> bool {
        let retained = self.history.retained();
        discard_detached(&mut self.store, self.root, id, &retained)
    }

    // -- Modified flag --

    /// Returns whether the model changed since the flag was last reset.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag, typically after saving.
    pub fn reset_modified(&mut self) {
        if self.modified {
            self.modified = false;
            self.notify(ChangeKind::ModFlagReset, Vec::new(), Vec::new());
        }
    }

    // -- Listeners --

    /// Registers a change listener.
    pub fn add_listener(&self, listener: Arc<dyn ModelListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Unregisters a change listener. Returns whether it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // -- Selection --

    /// The current selection; never empty.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The focus node: the last selected node.
    #[must_use]
    pub fn focus(&self) -> NodeId {
        self.selection.focus()
    }

    /// Selects only `id`. Returns `false` if `id` is not a live node.
    pub fn select(&mut self, id: NodeId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        self.change_selection(|s| s.set(id));
        true
    }

    /// Adds `id` to the selection, or makes it the focus if already
    /// selected. Returns `false` if `id` is not a live node.
    pub fn extend_selection(&mut self, id: NodeId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        self.change_selection(|s| s.extend(id));
        true
    }

    /// Removes `id` from the selection; the root is selected if nothing
    /// remains.
    pub fn deselect(&mut self, id: NodeId) {
        let root = self.root;
        self.change_selection(|s| s.deselect(id, root));
    }

    /// Replaces the selection with the live nodes among `nodes`; the root is
    /// selected if none is live.
    pub fn set_selection(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        let live: Vec<NodeId> = nodes.into_iter().filter(|&n| self.is_live(n)).collect();
        let root = self.root;
        self.change_selection(|s| s.replace(live, root));
    }

    /// Selects every node of the same type as the focus, with the focus
    /// last. Returns the number of selected nodes.
    pub fn select_same_type(&mut self) -> usize {
        let focus = self.focus();
        let mut nodes = self.store.same_type_nodes(self.root, focus);
        nodes.retain(|&n| n != focus);
        nodes.push(focus);
        let root = self.root;
        self.change_selection(|s| s.replace(nodes, root));
        self.selection.count()
    }

    fn change_selection(&mut self, f: impl FnOnce(&mut Selection)) {
        let before = self.selection.clone();
        f(&mut self.selection);
        if self.selection != before {
            self.notify(ChangeKind::Selection, self.selection.nodes().to_vec(), Vec::new());
        }
    }

    /// Drops selected nodes that are no longer live.
    fn prune_selection(&mut self) {
        let live: Vec<NodeId> = self
            .selection
            .nodes()
            .iter()
            .copied()
            .filter(|&n| self.is_live(n))
            .collect();
        self.selection.replace(live, self.root);
    }

    // -- Undo / redo --

    /// Undoes the last edit. Returns whether an edit was undone.
    pub fn undo(&mut self) -> bool {
        self.undo_or_redo(false)
    }

    /// Redoes the last undone edit. Returns whether an edit was redone.
    pub fn redo(&mut self) -> bool {
        self.undo_or_redo(true)
    }

    /// Returns whether there is an edit to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns whether there is an edit to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Description of the edit [`undo`](Self::undo) would invert.
    #[must_use]
    pub fn undo_description(&self) -> Option<String> {
        self.history.next_undo().map(|e| e.description().to_owned())
    }

    /// Description of the edit [`redo`](Self::redo) would re-apply.
    #[must_use]
    pub fn redo_description(&self) -> Option<String> {
        self.history.next_redo().map(|e| e.description().to_owned())
    }

    /// Discards every recorded edit.
    pub fn clear_history(&mut self) {
        let released = self.history.clear();
        release_detached(&mut self.store, self.root, &released, &[]);
        self.notify(ChangeKind::EditHistory, Vec::new(), Vec::new());
    }

    fn undo_or_redo(&mut self, redo: bool) -> bool {
        let store = &mut self.store;
        let outcome = self.history.undo_or_redo(redo, |edit, redo| match edit.apply(store, redo) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, description = edit.description(), redo, "edit inversion failed; discarding history");
                false
            }
        });
        match outcome {
            Inversion::Skipped => false,
            Inversion::Applied(edit) => {
                let restore = if redo {
                    edit.selection_after()
                } else {
                    edit.selection_before()
                };
                let before = self.selection.clone();
                let live: Vec<NodeId> = restore.iter().copied().filter(|&n| self.is_live(n)).collect();
                self.selection.replace(live, self.root);
                let damage = self.evaluate();
                self.modified = true;
                let kind = if edit.is_structural() {
                    ChangeKind::InsertOrRemove
                } else {
                    ChangeKind::Define
                };
                self.notify(kind, edit.touched(), damage);
                if self.selection != before {
                    self.notify(ChangeKind::Selection, self.selection.nodes().to_vec(), Vec::new());
                }
                self.notify(ChangeKind::EditHistory, Vec::new(), Vec::new());
                true
            }
            Inversion::Failed { released, .. } => {
                release_detached(&mut self.store, self.root, &released, &[]);
                self.prune_selection();
                let damage = self.evaluate();
                self.modified = true;
                self.notify(ChangeKind::Reload, Vec::new(), damage);
                self.notify(ChangeKind::EditHistory, Vec::new(), Vec::new());
                false
            }
        }
    }

    // -- Rendering --

    /// Paints the figure in render order. Returns `false` if the pass was
    /// cancelled or abandoned.
    pub fn render(&self, painter: &mut dyn Painter, task: &RenderTask) -> bool {
        let granularity = self.store.config().render_granularity;
        self.store.render(self.root, painter, task, granularity)
    }

    /// The smallest visible node whose bounds contain `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.store.hit_test(self.root, point)
    }

    // -- Pipeline --

    /// Re-evaluates the tree and returns the damaged regions.
    fn evaluate(&mut self) -> Vec<Rect> {
        self.store.evaluate_into(self.root, &mut self.scratch);
        core::mem::take(&mut self.scratch.damage)
    }

    /// Finishes an operation: records selections, evaluates, posts and
    /// notifies. Empty edits post nothing.
    fn commit(&mut self, mut edit: ReversibleEdit, before: Selection) -> bool {
        if edit.is_empty() {
            self.selection = before;
            return false;
        }
        let selection_changed = self.selection != before;
        edit.set_selections(before.nodes().to_vec(), self.selection.nodes().to_vec());
        let damage = self.evaluate();
        self.modified = true;
        let kind = if edit.is_structural() {
            ChangeKind::InsertOrRemove
        } else {
            ChangeKind::Define
        };
        let touched = edit.touched();
        tracing::debug!(description = edit.description(), ops = edit.len(), "posting edit");
        self.post(edit);
        self.notify(kind, touched, damage);
        if selection_changed {
            self.notify(ChangeKind::Selection, self.selection.nodes().to_vec(), Vec::new());
        }
        self.notify(ChangeKind::EditHistory, Vec::new(), Vec::new());
        true
    }

    fn post(&mut self, edit: ReversibleEdit) {
        let out = self.history.post(edit);
        if !out.posted {
            tracing::debug!("edit history blocked; edit dropped");
        }
        if !out.released.is_empty() {
            let retained = self.history.retained();
            release_detached(&mut self.store, self.root, &out.released, &retained);
        }
    }

    fn notify(&self, kind: ChangeKind, nodes: Vec<NodeId>, damage: Vec<Rect>) {
        self.listeners.dispatch(&ModelEvent {
            model: self.id,
            kind,
            nodes,
            damage,
        });
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::data::DataSet;
    use crate::node::{ComponentRole, PropertyKey, PropertyValue};
    use crate::units::Measure;

    pub(super) fn model() -> GraphicModel {
        GraphicModel::new(Clipboard::new())
    }

    pub(super) fn graph(m: &mut GraphicModel) -> NodeId {
        let root = m.root();
        m.insert_new(root, NodeKind::Graph).unwrap()
    }

    fn recorder(m: &GraphicModel) -> Arc<Mutex<Vec<ChangeKind>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        m.add_listener(Arc::new(move |e: &ModelEvent| sink.lock().push(e.kind)));
        log
    }

    fn range(m: &GraphicModel, g: NodeId, role: ComponentRole) -> (PropertyValue, PropertyValue) {
        let axis = m.store().component(g, role).unwrap();
        (
            m.store().property(axis, PropertyKey::Start).unwrap(),
            m.store().property(axis, PropertyKey::End).unwrap(),
        )
    }

    #[test]
    fn new_model_selects_its_root() {
        let m = model();
        assert_eq!(m.selection().nodes(), &[m.root()]);
        assert_eq!(m.store().kind(m.root()), NodeKind::Figure);
        assert!(!m.is_modified());
        assert!(!m.can_undo());
    }

    #[test]
    fn auto_range_scenario() {
        let mut m = model();
        let g = graph(&mut m);
        let frame = m.store().viewport(g).unwrap().rect();
        assert_eq!(frame, Rect::new(750.0, 750.0, 3250.0, 3250.0));

        let t = m.insert_new(g, NodeKind::Trace).unwrap();
        let data = DataSet::xy(1, &[(0.0, -5.0), (5.0, 0.0), (10.0, 5.0)]);
        assert!(m.set_property(t, PropertyKey::Data, PropertyValue::Data(Some(data))));
        assert!(m.set_property(g, PropertyKey::AutoRangeX, PropertyValue::Bool(true)));
        assert!(m.set_property(g, PropertyKey::AutoRangeY, PropertyValue::Bool(true)));

        let n = PropertyValue::Number;
        assert_eq!(range(&m, g, ComponentRole::PrimaryAxis), (n(0.0), n(10.0)));
        assert_eq!(range(&m, g, ComponentRole::SecondaryAxis), (n(-5.0), n(5.0)));

        // Undoing the flag also undoes the rescale it caused.
        assert!(m.undo());
        assert_eq!(range(&m, g, ComponentRole::SecondaryAxis), (n(0.0), n(1.0)));
    }

    #[test]
    fn multi_axis_edit_is_one_undo() {
        let mut m = model();
        let graphs: Vec<_> = (0..3).map(|_| graph(&mut m)).collect();
        m.set_selection(graphs.clone());
        let axes: Vec<_> = graphs
            .iter()
            .map(|&g| m.store().component(g, ComponentRole::SecondaryAxis).unwrap())
            .collect();
        let width = PropertyValue::Measure(Measure::points(2.0));
        let posted = m.history().len();
        assert!(m.set_property(axes[1], PropertyKey::StrokeWidth, width.clone()));
        assert_eq!(m.history().len(), posted + 1);
        for &a in &axes {
            assert_eq!(m.store().property(a, PropertyKey::StrokeWidth), Some(width.clone()));
        }

        assert!(m.undo());
        for &a in &axes {
            assert!(!m.store().is_style_explicit(a, PropertyKey::StrokeWidth));
        }
        assert!(m.redo());
        assert!(axes.iter().all(|&a| m.store().is_style_explicit(a, PropertyKey::StrokeWidth)));
    }

    #[test]
    fn unchanged_multi_edit_posts_nothing() {
        let mut m = model();
        let graphs: Vec<_> = (0..2).map(|_| graph(&mut m)).collect();
        m.set_selection(graphs.clone());
        let before = m.history().len();
        assert!(!m.set_property(graphs[0], PropertyKey::Clip, PropertyValue::Bool(false)));
        assert_eq!(m.history().len(), before);
    }

    #[test]
    fn undo_then_redo_restores_tree_and_selection() {
        let mut m = model();
        let g = graph(&mut m);
        let label = m.insert_new(g, NodeKind::Label).unwrap();
        let sel = m.selection().clone();
        assert!(m.undo());
        assert!(!m.is_live(label));
        assert_eq!(m.selection().nodes(), &[g]);
        assert!(m.redo());
        assert_eq!(m.store().parent(label), Some(g));
        assert_eq!(m.selection(), &sel);
    }

    #[test]
    fn events_follow_the_pipeline() {
        let mut m = model();
        let log = recorder(&m);
        let _ = graph(&mut m);
        assert_eq!(
            *log.lock(),
            vec![ChangeKind::InsertOrRemove, ChangeKind::Selection, ChangeKind::EditHistory]
        );
        log.lock().clear();
        m.reset_modified();
        m.reset_modified();
        assert_eq!(*log.lock(), vec![ChangeKind::ModFlagReset]);
    }

    #[test]
    fn history_is_bounded() {
        let mut m = model();
        let g = graph(&mut m);
        for i in 0..40 {
            m.set_property(g, PropertyKey::Title, PropertyValue::Text(format!("t{i}")));
        }
        assert_eq!(m.history().len(), 30);
        let mut undone = 0;
        while m.undo() {
            undone += 1;
        }
        assert_eq!(undone, 30);
        assert_eq!(
            m.store().property(g, PropertyKey::Title),
            Some(PropertyValue::Text("t9".into()))
        );
    }

    #[test]
    fn posting_after_undo_drops_redo_and_frees_nodes() {
        let mut m = model();
        let g = graph(&mut m);
        let label = m.insert_new(g, NodeKind::Label).unwrap();
        assert!(m.undo());
        assert!(m.store().is_alive(label), "kept alive by the redo branch");
        m.set_property(g, PropertyKey::Title, PropertyValue::Text("x".into()));
        assert!(!m.can_redo());
        assert!(!m.store().is_alive(label));
    }

    #[test]
    fn failed_inversion_discards_history() {
        let mut m = model();
        let g = graph(&mut m);
        let label = m.insert_new(g, NodeKind::Label).unwrap();
        let log = recorder(&m);
        // Break the ledger: detach the label behind the history's back.
        m.store.remove(label).unwrap();
        assert!(!m.undo());
        assert!(!m.can_undo() && !m.can_redo());
        assert!(log.lock().contains(&ChangeKind::EditHistory));
        assert!(m.selection().nodes().iter().all(|&n| m.is_live(n)));
    }

    #[test]
    fn selected_axes_edit_as_one_undo() {
        let mut m = model();
        let graphs: Vec<_> = (0..3).map(|_| graph(&mut m)).collect();
        let axes: Vec<_> = graphs
            .iter()
            .map(|&g| m.store().component(g, ComponentRole::PrimaryAxis).unwrap())
            .collect();
        assert!(m.select(axes[0]));
        assert_eq!(m.select_same_type(), 3);

        let width = PropertyValue::Measure(Measure::points(3.0));
        let posted = m.history().len();
        assert!(m.set_property(axes[0], PropertyKey::StrokeWidth, width.clone()));
        assert_eq!(m.history().len(), posted + 1, "one edit for all axes");
        for &a in &axes {
            assert_eq!(m.property(a, PropertyKey::StrokeWidth), Some(width.clone()));
        }

        assert!(m.undo());
        assert!(axes.iter().all(|&a| !m.store().is_style_explicit(a, PropertyKey::StrokeWidth)));
        assert!(m.can_redo());

        // A redo followed by an undo leaves the model where it was.
        let cursor = m.history().cursor();
        let selection = m.selection().clone();
        assert!(m.redo());
        assert!(m.undo());
        assert_eq!(m.history().cursor(), cursor);
        assert_eq!(m.selection(), &selection);
        assert!(axes.iter().all(|&a| !m.store().is_style_explicit(a, PropertyKey::StrokeWidth)));

        // Posting still works after a multi-node edit.
        assert!(m.set_property(graphs[0], PropertyKey::Title, PropertyValue::Text("t".into())));
        assert!(!m.can_redo());
    }

    #[test]
    fn discard_frees_only_unreferenced_detached_nodes() {
        let mut m = model();
        let g = graph(&mut m);
        let spare = m.create(NodeKind::Graph);
        let axis = m.store().component(spare, ComponentRole::PrimaryAxis).unwrap();
        assert!(!m.discard(axis), "components stay with their owner");
        assert!(!m.discard(g), "attached");
        assert!(!m.discard(m.root()));
        let live = m.store().live_count();
        assert!(m.discard(spare));
        assert!(!m.store().is_alive(spare) && !m.store().is_alive(axis));
        assert!(m.store().live_count() < live);
        assert!(!m.discard(spare), "already gone");

        // A removed node is kept for undo.
        let label = m.insert_new(g, NodeKind::Label).unwrap();
        assert!(m.remove(label));
        assert!(!m.discard(label));
        assert!(m.undo());
        assert_eq!(m.store().parent(label), Some(g));
    }

    #[test]
    fn select_same_type_keeps_focus_last() {
        let mut m = model();
        let graphs: Vec<_> = (0..3).map(|_| graph(&mut m)).collect();
        let axis = m.store().component(graphs[0], ComponentRole::PrimaryAxis).unwrap();
        assert!(m.select(axis));
        assert_eq!(m.select_same_type(), 3);
        assert_eq!(m.focus(), axis);
    }
}
