// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshot of a node subtree.
//!
//! [`dump`] captures each node's type, role, evaluated bounds and stored
//! properties. Style attributes appear only where they are set explicitly,
//! except on the dumped root, which reports its fully resolved style so the
//! snapshot reads on its own.

use std::io::{self, Write};

use serde_json::{Map, Value, json};

use figura_core::node::{NodeId, NodeStore, PropertyKey, PropertyValue, supports};

/// Builds the JSON snapshot of the subtree under `root`.
#[must_use]
pub fn dump(store: &NodeStore, root: NodeId) -> Value {
    node_json(store, root, true)
}

/// Writes the snapshot of the subtree under `root` as pretty-printed JSON.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn write(store: &NodeStore, root: NodeId, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &dump(store, root))?;
    writeln!(writer)
}

fn node_json(store: &NodeStore, id: NodeId, is_root: bool) -> Value {
    let kind = store.kind(id);
    let mut props = Map::new();
    for key in PropertyKey::ALL {
        if !supports(kind, key) || (key.is_style() && !is_root && !store.is_style_explicit(id, key)) {
            continue;
        }
        if let Some(v) = store.property(id, key) {
            props.insert(format!("{key:?}"), value_json(&v));
        }
    }
    let components: Vec<Value> = store
        .components(id)
        .map(|c| node_json(store, c, false))
        .collect();
    let children: Vec<Value> = store
        .children(id)
        .map(|c| node_json(store, c, false))
        .collect();
    json!({
        "kind": kind.name(),
        "role": store.role(id).map(|r| format!("{r:?}")),
        "bounds": store.bounds(id).map(|b| [b.x0, b.y0, b.x1, b.y1]),
        "properties": props,
        "components": components,
        "children": children,
    })
}

fn value_json(v: &PropertyValue) -> Value {
    match v {
        PropertyValue::Bool(b) => json!(b),
        PropertyValue::Number(n) => json!(n),
        PropertyValue::Measure(m) => json!(m.to_string()),
        PropertyValue::Text(s) => json!(s),
        PropertyValue::Color(c) => json!(format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)),
        PropertyValue::FontStyle(s) => json!(format!("{s:?}")),
        PropertyValue::CoordSys(c) => json!(format!("{c:?}")),
        PropertyValue::Layout(l) => json!(format!("{l:?}")),
        PropertyValue::Orientation(o) => json!(format!("{o:?}")),
        PropertyValue::Shape(s) => json!(format!("{s:?}")),
        PropertyValue::Data(None) => Value::Null,
        PropertyValue::Data(Some(d)) => json!({
            "id": d.id(),
            "dim": d.dim(),
            "len": d.len(),
        }),
        PropertyValue::Numbers(ns) => json!(ns),
        PropertyValue::Inherit => json!("inherit"),
    }
}
