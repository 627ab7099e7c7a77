// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`EventRecorder`] implements [`ModelListener`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Record layout: kind tag (`u8`), model id (`u32`), node count (`u32`)
//! followed by `(index, generation)` pairs, damage count (`u32`) followed by
//! `x0 y0 x1 y1` as `f64`.

use figura_core::listener::{ChangeKind, ModelEvent, ModelListener};
use kurbo::Rect;
use parking_lot::Mutex;

// ---------------------------------------------------------------------------
// Event kind discriminants
// ---------------------------------------------------------------------------

const TAG_RELOAD: u8 = 1;
const TAG_INSERT_OR_REMOVE: u8 = 2;
const TAG_DEFINE: u8 = 3;
const TAG_SELECTION: u8 = 4;
const TAG_EDIT_HISTORY: u8 = 5;
const TAG_MOD_FLAG_RESET: u8 = 6;

// ---------------------------------------------------------------------------
// EventRecorder
// ---------------------------------------------------------------------------

/// A [`ModelListener`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct EventRecorder {
    buf: Mutex<Vec<u8>>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_inner()
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_len(buf: &mut Vec<u8>, len: usize) {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "list lengths capped at u32::MAX for recording"
    )]
    write_u32(buf, len.min(u32::MAX as usize) as u32);
}

fn kind_tag(kind: ChangeKind) -> u8 {
    match kind {
        ChangeKind::Reload => TAG_RELOAD,
        ChangeKind::InsertOrRemove => TAG_INSERT_OR_REMOVE,
        ChangeKind::Define => TAG_DEFINE,
        ChangeKind::Selection => TAG_SELECTION,
        ChangeKind::EditHistory => TAG_EDIT_HISTORY,
        ChangeKind::ModFlagReset => TAG_MOD_FLAG_RESET,
    }
}

impl ModelListener for EventRecorder {
    fn model_changed(&self, e: &ModelEvent) {
        let mut buf = self.buf.lock();
        buf.push(kind_tag(e.kind));
        write_u32(&mut buf, e.model.get());
        let nodes = &e.nodes[..e.nodes.len().min(u32::MAX as usize)];
        write_len(&mut buf, nodes.len());
        for n in nodes {
            write_u32(&mut buf, n.index());
            write_u32(&mut buf, n.generation());
        }
        let damage = &e.damage[..e.damage.len().min(u32::MAX as usize)];
        write_len(&mut buf, damage.len());
        for r in damage {
            write_f64(&mut buf, r.x0);
            write_f64(&mut buf, r.y0);
            write_f64(&mut buf, r.x1);
            write_f64(&mut buf, r.y1);
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A node handle as recorded: slot index and generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedNode {
    /// Slot index.
    pub index: u32,
    /// Generation counter.
    pub generation: u32,
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    /// Raw id of the model that changed.
    pub model: u32,
    /// The kind of change.
    pub kind: ChangeKind,
    /// The nodes the change applied to.
    pub nodes: Vec<RecordedNode>,
    /// Damaged regions.
    pub damage: Vec<Rect>,
}

/// Decodes a byte slice produced by [`EventRecorder`] into an iterator of
/// [`RecordedEvent`].
///
/// Decoding stops at the first truncated or unknown record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_kind(&mut self) -> Option<ChangeKind> {
        Some(match self.read_u8()? {
            TAG_RELOAD => ChangeKind::Reload,
            TAG_INSERT_OR_REMOVE => ChangeKind::InsertOrRemove,
            TAG_DEFINE => ChangeKind::Define,
            TAG_SELECTION => ChangeKind::Selection,
            TAG_EDIT_HISTORY => ChangeKind::EditHistory,
            TAG_MOD_FLAG_RESET => ChangeKind::ModFlagReset,
            _ => return None,
        })
    }

    fn decode_event(&mut self) -> Option<RecordedEvent> {
        let kind = self.read_kind()?;
        let model = self.read_u32()?;
        let n = self.read_u32()?;
        let mut nodes = Vec::new();
        for _ in 0..n {
            nodes.push(RecordedNode {
                index: self.read_u32()?,
                generation: self.read_u32()?,
            });
        }
        let n = self.read_u32()?;
        let mut damage = Vec::new();
        for _ in 0..n {
            damage.push(Rect::new(
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
            ));
        }
        Some(RecordedEvent {
            model,
            kind,
            nodes,
            damage,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<RecordedEvent> {
        if self.pos >= self.data.len() {
            return None;
        }
        let event = self.decode_event();
        if event.is_none() {
            self.pos = self.data.len();
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use figura_core::clipboard::Clipboard;
    use figura_core::model::GraphicModel;
    use figura_core::node::NodeKind;

    use super::*;

    #[test]
    fn records_model_events_in_order() {
        let mut m = GraphicModel::new(Clipboard::new());
        let rec = Arc::new(EventRecorder::new());
        m.add_listener(rec.clone());
        let root = m.root();
        let label = m.insert_new(root, NodeKind::Label).unwrap();
        m.reset();

        let events: Vec<_> = decode(&rec.to_bytes()).collect();
        assert!(events.iter().all(|e| e.model == m.id().get()));
        let insert = events
            .iter()
            .find(|e| e.kind == ChangeKind::InsertOrRemove)
            .unwrap();
        assert!(insert.nodes.contains(&RecordedNode {
            index: label.index(),
            generation: label.generation(),
        }));
        assert!(!insert.damage.is_empty());
        let reload = events.iter().position(|e| e.kind == ChangeKind::Reload).unwrap();
        let first_insert = events
            .iter()
            .position(|e| e.kind == ChangeKind::InsertOrRemove)
            .unwrap();
        assert!(first_insert < reload);
    }

    #[test]
    fn truncated_recordings_stop_cleanly() {
        let rec = EventRecorder::new();
        let model = GraphicModel::new(Clipboard::new()).id();
        let mut e = ModelEvent::new(model, ChangeKind::Define);
        e.damage.push(Rect::new(1.0, 2.0, 3.0, 4.0));
        rec.model_changed(&e);
        rec.model_changed(&ModelEvent::new(model, ChangeKind::ModFlagReset));
        let bytes = rec.into_bytes();

        let all: Vec<_> = decode(&bytes).collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].damage, vec![Rect::new(1.0, 2.0, 3.0, 4.0)]);
        assert_eq!(all[1].kind, ChangeKind::ModFlagReset);

        let cut: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(cut.len(), 1);
        assert!(decode(&[0xff, 0, 0]).next().is_none());
    }
}
