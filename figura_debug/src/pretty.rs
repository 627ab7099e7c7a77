// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable event and tree output.
//!
//! [`PrettyPrinter`] implements [`ModelListener`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).
//! [`tree`] renders a node subtree as an indented outline.

use core::fmt::Write as _;
use std::io::Write;

use figura_core::listener::{ChangeKind, ModelEvent, ModelListener};
use figura_core::node::{NodeId, NodeStore};
use kurbo::Rect;
use parking_lot::Mutex;

/// Writes human-readable event lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrinter<W: Write + Send = Box<dyn Write + Send>> {
    writer: Mutex<W>,
}

impl<W: Write + Send> core::fmt::Debug for PrettyPrinter<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrettyPrinter").finish_non_exhaustive()
    }
}

impl PrettyPrinter {
    /// Creates a printer that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a printer that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> PrettyPrinter<W> {
    /// Creates a printer that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the printer and returns its destination.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

fn kind_name(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Reload => "reload",
        ChangeKind::InsertOrRemove => "insert-or-remove",
        ChangeKind::Define => "define",
        ChangeKind::Selection => "selection",
        ChangeKind::EditHistory => "history",
        ChangeKind::ModFlagReset => "mod-flag-reset",
    }
}

impl<W: Write + Send> ModelListener for PrettyPrinter<W> {
    fn model_changed(&self, e: &ModelEvent) {
        let nodes: Vec<String> = e.nodes.iter().map(|n| n.index().to_string()).collect();
        let damage = match e.damage_bounds() {
            Some(r) => fmt_rect(r),
            None => "-".to_owned(),
        };
        let _ = writeln!(
            self.writer.lock(),
            "[{}] model={} nodes=[{}] damage={damage}",
            kind_name(e.kind),
            e.model.get(),
            nodes.join(","),
        );
    }
}

/// Renders the subtree under `root` as an indented outline.
///
/// Each line shows the node type, its component role and object id if any,
/// and its evaluated bounds. Components are listed before regular children.
#[must_use]
pub fn tree(store: &NodeStore, root: NodeId) -> String {
    let mut out = String::new();
    write_node(store, root, 0, &mut out);
    out
}

fn write_node(store: &NodeStore, id: NodeId, depth: usize, out: &mut String) {
    let data = store.data(id);
    let _ = write!(out, "{:indent$}{}", "", data.kind().name(), indent = depth * 2);
    if let Some(role) = data.role() {
        let _ = write!(out, " ({role:?})");
    }
    if let Some(oid) = data.object_id() {
        let _ = write!(out, " #{oid}");
    }
    if let Some(b) = store.bounds(id) {
        let _ = write!(out, " {}", fmt_rect(b));
    }
    if store.effective_hidden(id) {
        out.push_str(" hidden");
    }
    out.push('\n');
    for c in store.components(id).chain(store.children(id)) {
        write_node(store, c, depth + 1, out);
    }
}

fn fmt_rect(r: Rect) -> String {
    format!("[{:.0} {:.0} {:.0} {:.0}]", r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use figura_core::clipboard::Clipboard;
    use figura_core::model::GraphicModel;
    use figura_core::node::{NodeKind, PropertyKey, PropertyValue};

    use super::*;

    #[test]
    fn prints_one_line_per_event() {
        let printer = PrettyPrinter::with_writer(Vec::<u8>::new());
        printer.model_changed(&ModelEvent::new(
            GraphicModel::new(Clipboard::new()).id(),
            ChangeKind::Selection,
        ));
        let output = String::from_utf8(printer.into_inner()).unwrap();
        assert!(output.starts_with("[selection] model="), "got: {output}");
        assert!(output.ends_with("nodes=[] damage=-\n"), "got: {output}");
    }

    #[test]
    fn listens_to_a_model() {
        let mut m = GraphicModel::new(Clipboard::new());
        let printer = Arc::new(PrettyPrinter::with_writer(Vec::<u8>::new()));
        m.add_listener(printer.clone());
        let root = m.root();
        let _ = m.insert_new(root, NodeKind::Label).unwrap();
        drop(m);
        let printer = Arc::try_unwrap(printer).unwrap();
        let output = String::from_utf8(printer.into_inner()).unwrap();
        assert!(output.contains("[insert-or-remove]"), "got: {output}");
        assert!(output.contains("[history]"), "got: {output}");
    }

    #[test]
    fn tree_lists_components_and_children() {
        let mut m = GraphicModel::new(Clipboard::new());
        let root = m.root();
        let g = m.insert_new(root, NodeKind::Graph).unwrap();
        assert!(m.set_property(g, PropertyKey::ObjectId, PropertyValue::Text("g1".into())));
        let out = tree(m.store(), root);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("figure [0 0 8500 11000]"));
        let graph = out.lines().find(|l| l.contains("#g1")).unwrap();
        assert!(graph.starts_with("  graph #g1 [750 750 3250 3250]"), "got: {graph}");
        assert!(out.contains("    axis (PrimaryAxis)"), "got: {out}");
    }
}
