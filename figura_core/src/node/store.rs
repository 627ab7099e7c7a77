// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property management.

use kurbo::Rect;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::config::ModelConfig;
use crate::dirty;
use crate::error::EditError;
use crate::projector::Projector;
use crate::style::ResolvedStyle;
use crate::viewport::Viewport2D;

use super::id::{INVALID, ModelId, NodeId};
use super::kind::{ComponentRole, NodeKind};
use super::payload::{NodeData, Payload};
use super::props::{PropertyChange, PropertyKey, PropertyValue};
use super::traverse::Children;

/// The coordinate frame a node establishes for its descendants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// A 2D mapping: the figure page, a graph's data box or a shape's box.
    Flat(Viewport2D),
    /// A 3D graph.
    Projected {
        /// The 2D canvas box, used to place labels.
        canvas: Viewport2D,
        /// The 3D projection of the data box.
        projector: Projector,
    },
}

impl Frame {
    /// The 2D viewport of this frame.
    #[must_use]
    pub fn viewport(&self) -> &Viewport2D {
        match self {
            Self::Flat(v) => v,
            Self::Projected { canvas, .. } => canvas,
        }
    }

    /// The projector, for 3D frames.
    #[must_use]
    pub fn projector(&self) -> Option<&Projector> {
        match self {
            Self::Flat(_) => None,
            Self::Projected { projector, .. } => Some(projector),
        }
    }
}

/// Struct-of-arrays storage for all nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// A store may hold several trees at once: the attached tree under a model's
/// root, plus detached subtrees that are only referenced by the edit history
/// or by a caller that has not inserted them yet.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) components: Vec<Vec<u32>>,
    pub(crate) owner: Vec<Option<ModelId>>,

    // -- Attributes (set by callers) --
    pub(crate) data: Vec<NodeData>,

    // -- Computed properties (written by evaluate) --
    pub(crate) bounds: Vec<Option<Rect>>,
    pub(crate) resolved: Vec<ResolvedStyle>,
    pub(crate) effective_hidden: Vec<bool>,
    pub(crate) frame: Vec<Option<Frame>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) pending_damage: Vec<Rect>,

    pub(crate) config: ModelConfig,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Creates an empty store whose new nodes take their defaults from
    /// `config`.
    #[must_use]
    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            components: Vec::new(),
            owner: Vec::new(),
            data: Vec::new(),
            bounds: Vec::new(),
            resolved: Vec::new(),
            effective_hidden: Vec::new(),
            frame: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_damage: Vec::new(),
            config,
        }
    }

    /// The configuration new nodes are created with.
    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // -- Allocation API --

    /// Creates a detached node of type `kind` and returns its handle.
    ///
    /// The node starts with its type's default attributes and all of its
    /// fixed components. Every axis component also receives one default
    /// tick set as a regular child.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let idx = self.alloc(NodeData::with_config(kind, &self.config));
        for &role in kind.component_roles() {
            let c = self.alloc(NodeData::component(role, &self.config));
            self.components[idx as usize].push(c);
            self.link(idx, c);
            if matches!(role.kind(), NodeKind::Axis | NodeKind::Axis3D) {
                let t = self.alloc(NodeData::with_config(NodeKind::TickSet, &self.config));
                self.children[c as usize].push(t);
                self.link(c, t);
            }
        }
        self.id_at(idx)
    }

    /// Allocates a slot holding `data` with no parent and no children.
    pub(crate) fn alloc(&mut self, data: NodeData) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.components[i].clear();
            self.owner[i] = None;
            self.data[i] = data;
            self.bounds[i] = None;
            self.resolved[i] = ResolvedStyle::default_root();
            self.effective_hidden[i] = false;
            self.frame[i] = None;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.components.push(Vec::new());
            self.owner.push(None);
            self.data.push(data);
            self.bounds.push(None);
            self.resolved.push(ResolvedStyle::default_root());
            self.effective_hidden.push(false);
            self.frame.push(None);
            self.generation.push(0);
            idx
        };
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::STYLE, &EagerPolicy);
        idx
    }

    /// Destroys a detached node together with its whole subtree, freeing the
    /// slots for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node still has a parent (remove
    /// it first).
    pub fn destroy(&mut self, id: NodeId) {
        self.validate(id);
        assert!(
            self.parent[id.idx as usize] == INVALID,
            "cannot destroy an attached node"
        );
        for idx in self.subtree_indices(id.idx) {
            let i = idx as usize;
            self.dirty.remove_key(idx);
            // Bump generation so old handles immediately fail validation.
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.components[i].clear();
            self.owner[i] = None;
            self.bounds[i] = None;
            self.frame[i] = None;
            self.free_list.push(idx);
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        // Freeing a slot bumps its generation, so freed handles never match.
        (id.idx < self.len) && self.generation[id.idx as usize] == id.generation
    }

    /// Number of live nodes, attached or not.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Inserts `child` as a regular child of `parent` at `index`.
    ///
    /// An out-of-range index appends. Returns the index actually used. The
    /// inserted subtree takes over `parent`'s owning model and is marked for
    /// re-layout and style resolution.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if either handle is stale, `child` is
    /// a component, `parent` does not accept `child`'s type, `child` is
    /// already owned, or `child` is an ancestor of `parent`.
    pub fn insert(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<usize, EditError> {
        self.check(parent)?;
        self.check(child)?;
        let (p, c) = (parent.idx, child.idx);
        if self.data[c as usize].role.is_some() {
            return Err(EditError::Component(child));
        }
        let (pk, ck) = (self.data[p as usize].kind, self.data[c as usize].kind);
        if !pk.can_insert(ck) {
            return Err(EditError::Disallowed { parent: pk, child: ck });
        }
        if self.parent[c as usize] != INVALID || self.owner[c as usize].is_some() {
            return Err(EditError::AlreadyOwned(child));
        }
        if p == c || self.is_ancestor_idx(c, p) {
            return Err(EditError::Cycle(child));
        }

        let list = &mut self.children[p as usize];
        let index = index.min(list.len());
        list.insert(index, c);
        self.link(p, c);
        self.set_owner_idx(c, self.owner[p as usize]);
        self.mark_subtree_dirty(c);
        self.mark_structure(p);
        Ok(index)
    }

    /// Detaches a regular child from its parent without destroying it.
    ///
    /// Returns the former parent and index. The detached subtree loses its
    /// owning model.
    ///
    /// # Errors
    ///
    /// Fails if the handle is stale, the node is a component, or it has no
    /// parent.
    pub fn remove(&mut self, child: NodeId) -> Result<(NodeId, usize), EditError> {
        self.check(child)?;
        let c = child.idx;
        if self.data[c as usize].role.is_some() {
            return Err(EditError::Component(child));
        }
        let p = self.parent[c as usize];
        if p == INVALID {
            return Err(EditError::Detached(child));
        }
        let Some(index) = self.children[p as usize].iter().position(|&k| k == c) else {
            return Err(EditError::NotAChild {
                parent: self.id_at(p),
                child,
            });
        };

        if let Some(b) = self.subtree_bounds(c) {
            self.pending_damage.push(b);
        }
        self.children[p as usize].remove(index);
        self.unlink(p, c);
        self.set_owner_idx(c, None);
        self.mark_subtree_dirty(c);
        self.mark_structure(p);
        Ok((self.id_at(p), index))
    }

    /// Moves a regular child to `index` within its parent's child list.
    ///
    /// An out-of-range index moves the child to the end. Returns the old and
    /// new index.
    ///
    /// # Errors
    ///
    /// Fails if the handle is stale, the node is a component, or it has no
    /// parent.
    pub fn move_child(&mut self, child: NodeId, index: usize) -> Result<(usize, usize), EditError> {
        self.check(child)?;
        let c = child.idx;
        if self.data[c as usize].role.is_some() {
            return Err(EditError::Component(child));
        }
        let p = self.parent[c as usize];
        if p == INVALID {
            return Err(EditError::Detached(child));
        }
        let list = &mut self.children[p as usize];
        let Some(from) = list.iter().position(|&k| k == c) else {
            return Err(EditError::NotAChild {
                parent: self.id_at(p),
                child,
            });
        };
        let to = index.min(list.len() - 1);
        if from != to {
            list.remove(from);
            list.insert(to, c);
            if let Some(b) = self.subtree_bounds(c) {
                self.pending_damage.push(b);
            }
            self.dirty.mark(p, dirty::TOPOLOGY);
        }
        Ok((from, to))
    }

    /// Returns the parent (or owning composite, for components) of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the regular children of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.children[id.idx as usize])
    }

    /// Returns an iterator over the fixed components of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn components(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.components[id.idx as usize])
    }

    /// The component of `id` with the given role.
    #[must_use]
    pub fn component(&self, id: NodeId, role: ComponentRole) -> Option<NodeId> {
        self.validate(id);
        self.component_idx(id.idx, role).map(|c| self.id_at(c))
    }

    /// Position of a regular child within its parent's child list.
    #[must_use]
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            return None;
        }
        self.children[p as usize].iter().position(|&c| c == id.idx)
    }

    /// The model owning the tree this node is attached to, if any.
    #[must_use]
    pub fn owner(&self, id: NodeId) -> Option<ModelId> {
        self.validate(id);
        self.owner[id.idx as usize]
    }

    /// The closest strict ancestor that is a graph container.
    #[must_use]
    pub fn nearest_container(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.container_idx(id.idx).map(|c| self.id_at(c))
    }

    /// Returns whether `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        self.is_ancestor_idx(ancestor.idx, node.idx)
    }

    /// Returns the subtree rooted at `id` in pre-order, components before
    /// regular children.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        self.validate(id);
        self.subtree_indices(id.idx)
            .into_iter()
            .map(|idx| self.id_at(idx))
            .collect()
    }

    /// Finds the node under `root` whose object id is `object_id`.
    #[must_use]
    pub fn find_object_id(&self, root: NodeId, object_id: &str) -> Option<NodeId> {
        self.validate(root);
        self.subtree_indices(root.idx)
            .into_iter()
            .find(|&idx| self.data[idx as usize].object_id.as_deref() == Some(object_id))
            .map(|idx| self.id_at(idx))
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the attributes of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        self.validate(id);
        &self.data[id.idx as usize]
    }

    /// Returns the type of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.data(id).kind
    }

    /// Returns the component role of a node, if it is a component.
    #[must_use]
    pub fn role(&self, id: NodeId) -> Option<ComponentRole> {
        self.data(id).role
    }

    /// Returns the effective value of `key`: explicit values as stored,
    /// inherited style values resolved through the ancestors.
    ///
    /// Returns `None` if the node's type has no such property.
    #[must_use]
    pub fn property(&self, id: NodeId, key: PropertyKey) -> Option<PropertyValue> {
        let raw = self.data(id).get(key)?;
        if raw != PropertyValue::Inherit {
            return Some(raw);
        }
        let style = self.resolve_style(id);
        resolved_value(&style, key).or(Some(raw))
    }

    /// Returns the stored value of `key`; inherited style attributes report
    /// [`PropertyValue::Inherit`].
    #[must_use]
    pub fn raw_property(&self, id: NodeId, key: PropertyKey) -> Option<PropertyValue> {
        self.data(id).get(key)
    }

    /// Returns whether a style attribute is explicitly set on this node.
    ///
    /// Non-style keys report `true` if the type defines them.
    #[must_use]
    pub fn is_style_explicit(&self, id: NodeId, key: PropertyKey) -> bool {
        self.data(id)
            .get(key)
            .is_some_and(|v| v != PropertyValue::Inherit)
    }

    /// Resolves the full style of a node by walking its ancestors.
    ///
    /// Unlike [`resolved_style`](Self::resolved_style) this does not depend
    /// on evaluation having run.
    #[must_use]
    pub fn resolve_style(&self, id: NodeId) -> ResolvedStyle {
        self.validate(id);
        let mut chain = Vec::new();
        let mut idx = id.idx;
        while idx != INVALID {
            chain.push(idx);
            idx = self.parent[idx as usize];
        }
        let mut style = ResolvedStyle::default_root();
        for idx in chain.into_iter().rev() {
            self.data[idx as usize].style.resolve_onto(&mut style);
        }
        style
    }

    /// Returns the computed bounding box of a node in physical milli-inches.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.validate(id);
        self.bounds[id.idx as usize]
    }

    /// Returns the cached resolved style of a node.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn resolved_style(&self, id: NodeId) -> &ResolvedStyle {
        self.validate(id);
        &self.resolved[id.idx as usize]
    }

    /// Returns whether the node is effectively hidden (including by an
    /// ancestor's hidden flag).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_hidden(&self, id: NodeId) -> bool {
        self.validate(id);
        self.effective_hidden[id.idx as usize]
    }

    /// Returns the frame the node establishes for its descendants, if any.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn frame(&self, id: NodeId) -> Option<&Frame> {
        self.validate(id);
        self.frame[id.idx as usize].as_ref()
    }

    /// Returns the frame the node is laid out in: the closest frame of a
    /// strict ancestor.
    #[must_use]
    pub fn enclosing_frame(&self, id: NodeId) -> Option<&Frame> {
        self.validate(id);
        self.enclosing_frame_idx(id.idx)
    }

    /// Returns the 2D viewport of a container, figure or shape.
    #[must_use]
    pub fn viewport(&self, id: NodeId) -> Option<&Viewport2D> {
        self.frame(id).map(Frame::viewport)
    }

    /// Returns the projector of a 3D graph.
    #[must_use]
    pub fn projector(&self, id: NodeId) -> Option<&Projector> {
        self.frame(id).and_then(Frame::projector)
    }

    // -- Mutation API (auto-marks dirty) --

    /// Validates and stores a property value.
    ///
    /// Returns the recorded change, or `None` if the stored value did not
    /// change. Marks the key's dirty channel; keys that affect the enclosing
    /// container also mark the container for re-layout.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if the handle is stale, the type has
    /// no such property, or the value is invalid (including a non-positive
    /// endpoint on a logarithmic axis).
    pub fn set_property(
        &mut self,
        id: NodeId,
        key: PropertyKey,
        value: PropertyValue,
    ) -> Result<Option<PropertyChange>, EditError> {
        self.check(id)?;
        self.check_context(id.idx, key, &value)?;
        self.store_property(id, key, value)
    }

    /// Stores a previously recorded value, skipping contextual checks.
    pub(crate) fn restore_property(
        &mut self,
        id: NodeId,
        key: PropertyKey,
        value: PropertyValue,
    ) -> Result<(), EditError> {
        self.check(id)?;
        self.store_property(id, key, value).map(|_| ())
    }

    /// Stores a value without contextual checks and returns the change.
    pub(crate) fn store_property(
        &mut self,
        id: NodeId,
        key: PropertyKey,
        value: PropertyValue,
    ) -> Result<Option<PropertyChange>, EditError> {
        let idx = id.idx;
        let data = &mut self.data[idx as usize];
        let Some(old) = data.get(key) else {
            return Err(EditError::Unsupported {
                kind: data.kind,
                key,
            });
        };
        if !data.set(key, value)? {
            return Ok(None);
        }
        let new = data.get(key).unwrap_or(PropertyValue::Inherit);
        self.mark_property(idx, key);
        Ok(Some(PropertyChange {
            node: id,
            key,
            old,
            new,
        }))
    }

    /// Marks a node's content channel without changing it.
    pub(crate) fn touch(&mut self, id: NodeId) {
        self.validate(id);
        self.dirty.mark(id.idx, dirty::CONTENT);
    }

    pub(crate) fn set_owner(&mut self, id: NodeId, owner: Option<ModelId>) {
        self.validate(id);
        self.set_owner_idx(id.idx, owner);
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Like [`validate`](Self::validate), but reports a stale handle as an
    /// error.
    pub(crate) fn check(&self, id: NodeId) -> Result<(), EditError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(EditError::StaleNode(id))
        }
    }

    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn component_idx(&self, idx: u32, role: ComponentRole) -> Option<u32> {
        self.components[idx as usize]
            .iter()
            .copied()
            .find(|&c| self.data[c as usize].role == Some(role))
    }

    pub(crate) fn container_idx(&self, idx: u32) -> Option<u32> {
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            if self.data[p as usize].kind.is_container() {
                return Some(p);
            }
            p = self.parent[p as usize];
        }
        None
    }

    pub(crate) fn enclosing_frame_idx(&self, idx: u32) -> Option<&Frame> {
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            if let Some(f) = &self.frame[p as usize] {
                return Some(f);
            }
            p = self.parent[p as usize];
        }
        None
    }

    fn is_ancestor_idx(&self, ancestor: u32, idx: u32) -> bool {
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            if p == ancestor {
                return true;
            }
            p = self.parent[p as usize];
        }
        false
    }

    /// Pre-order indices of the subtree at `idx`, components first.
    pub(crate) fn subtree_indices(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            out.push(i);
            let (comps, kids) = (&self.components[i as usize], &self.children[i as usize]);
            stack.extend(kids.iter().rev());
            stack.extend(comps.iter().rev());
        }
        out
    }

    fn subtree_bounds(&self, idx: u32) -> Option<Rect> {
        self.subtree_indices(idx)
            .into_iter()
            .filter_map(|i| self.bounds[i as usize])
            .reduce(|a, b| a.union(b))
    }

    /// Records `c` as depending on `p` for the inherited channels.
    pub(crate) fn link(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        let _ = self.dirty.add_dependency(c, p, dirty::LAYOUT);
        let _ = self.dirty.add_dependency(c, p, dirty::STYLE);
    }

    fn unlink(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = INVALID;
        self.dirty.remove_dependency(c, p, dirty::LAYOUT);
        self.dirty.remove_dependency(c, p, dirty::STYLE);
    }

    fn set_owner_idx(&mut self, idx: u32, owner: Option<ModelId>) {
        for i in self.subtree_indices(idx) {
            self.owner[i as usize] = owner;
        }
    }

    fn mark_subtree_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::STYLE, &EagerPolicy);
    }

    /// A regular child list changed: containers re-lay out their legend and
    /// everything else derived from their children.
    fn mark_structure(&mut self, p: u32) {
        self.dirty.mark(p, dirty::TOPOLOGY);
        if self.data[p as usize].kind.is_container() {
            self.dirty.mark_with(p, dirty::LAYOUT, &EagerPolicy);
        }
    }

    fn mark_property(&mut self, idx: u32, key: PropertyKey) {
        let ch = key.channel();
        if ch == dirty::CONTENT {
            self.dirty.mark(idx, ch);
        } else {
            self.dirty.mark_with(idx, ch, &EagerPolicy);
        }
        if key.affects_container() {
            if let Some(c) = self.container_idx(idx) {
                self.dirty.mark_with(c, dirty::LAYOUT, &EagerPolicy);
            }
        }
    }

    fn check_context(&self, idx: u32, key: PropertyKey, value: &PropertyValue) -> Result<(), EditError> {
        if let (PropertyKey::Start | PropertyKey::End, PropertyValue::Number(v)) = (key, value) {
            if *v <= 0.0 && self.is_log_axis(idx) {
                return Err(EditError::InvalidValue(key));
            }
        }
        Ok(())
    }

    /// Returns whether `idx` is an axis mapped logarithmically by its graph.
    pub(crate) fn is_log_axis(&self, idx: u32) -> bool {
        let p = self.parent[idx as usize];
        if p == INVALID {
            return false;
        }
        match (&self.data[p as usize].payload, self.data[idx as usize].role) {
            (Payload::Graph(g), Some(ComponentRole::PrimaryAxis)) => g.coord_sys.primary_log(),
            (Payload::Graph(g), Some(ComponentRole::SecondaryAxis)) => g.coord_sys.secondary_log(),
            _ => false,
        }
    }
}

/// The value of a style key in a resolved style.
fn resolved_value(style: &ResolvedStyle, key: PropertyKey) -> Option<PropertyValue> {
    Some(match key {
        PropertyKey::FontFamily => PropertyValue::Text(style.font_family.clone()),
        PropertyKey::FontStyle => PropertyValue::FontStyle(style.font_style),
        PropertyKey::FontSize => PropertyValue::Number(style.font_size),
        PropertyKey::FillColor => PropertyValue::Color(style.fill_color),
        PropertyKey::StrokeColor => PropertyValue::Color(style.stroke_color),
        PropertyKey::StrokeWidth => PropertyValue::Measure(style.stroke_width),
        _ => return None,
    })
}
