// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PostScript-style vector export.
//!
//! [`export`] walks the figure in render order and writes one block of
//! drawing operators per [`DrawItem`]. Coordinates are converted from
//! milli-inches to points; PostScript's y axis also points up, so no flip is
//! needed.

use core::fmt::{self, Write};

use figura_core::node::{NodeId, NodeStore, SymbolShape};
use figura_core::render::RenderTask;
use figura_core::style::Color;
use kurbo::{Point, Rect};

use crate::plan::{DrawItem, Primitive, RenderPlan};

/// Writes the evaluated figure under `root` as PostScript operators.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn export(store: &NodeStore, root: NodeId, out: &mut dyn Write) -> fmt::Result {
    let Some(plan) = RenderPlan::build(store, root, &RenderTask::new()) else {
        return Ok(());
    };
    let page = store.bounds(root).unwrap_or(Rect::ZERO);
    writeln!(out, "%!PS-Adobe-3.0")?;
    writeln!(
        out,
        "%%BoundingBox: {} {} {} {}",
        pt(page.x0).floor(),
        pt(page.y0).floor(),
        pt(page.x1).ceil(),
        pt(page.y1).ceil()
    )?;
    writeln!(out, "%%EndComments")?;
    for item in &plan.items {
        write_item(out, item)?;
    }
    writeln!(out, "showpage")?;
    writeln!(out, "%%EOF")?;
    tracing::debug!(items = plan.items.len(), "exported vector figure");
    Ok(())
}

fn write_item(out: &mut dyn Write, item: &DrawItem) -> fmt::Result {
    writeln!(out, "gsave")?;
    if let Some(clip) = item.clip {
        write_rect_path(out, clip)?;
        writeln!(out, "clip newpath")?;
    }
    writeln!(out, "{} setlinewidth", fmt_num(pt(item.stroke_width)))?;
    match &item.primitive {
        Primitive::Rect { rect, filled } => {
            write_rect_path(out, *rect)?;
            if *filled {
                set_color(out, item.fill)?;
                writeln!(out, "fill")?;
            } else {
                set_color(out, item.stroke)?;
                writeln!(out, "stroke")?;
            }
        }
        Primitive::Shape { rect, shape } => {
            set_color(out, item.stroke)?;
            write_shape_path(out, *rect, *shape)?;
            writeln!(out, "stroke")?;
        }
        Primitive::Polyline(points) => {
            set_color(out, item.stroke)?;
            write_polyline(out, points)?;
            writeln!(out, "stroke")?;
        }
        Primitive::Segments(lines) => {
            set_color(out, item.stroke)?;
            writeln!(out, "newpath")?;
            for l in lines {
                writeln!(out, "{} moveto {} lineto", fmt_pt(l.p0), fmt_pt(l.p1))?;
            }
            writeln!(out, "stroke")?;
        }
        Primitive::Markers { points, shape, size } => {
            set_color(out, item.stroke)?;
            for &p in points {
                let half = size / 2.0;
                let r = Rect::new(p.x - half, p.y - half, p.x + half, p.y + half);
                write_shape_path(out, r, *shape)?;
                writeln!(out, "stroke")?;
            }
        }
        Primitive::Text { at, text } => {
            set_color(out, item.fill)?;
            writeln!(out, "/Helvetica findfont {} scalefont setfont", fmt_num(pt(item.font_size)))?;
            writeln!(out, "{} moveto ({}) show", fmt_pt(*at), escape(text))?;
        }
    }
    writeln!(out, "grestore")
}

fn write_rect_path(out: &mut dyn Write, r: Rect) -> fmt::Result {
    write_polyline(out, &[
        Point::new(r.x0, r.y0),
        Point::new(r.x1, r.y0),
        Point::new(r.x1, r.y1),
        Point::new(r.x0, r.y1),
    ])?;
    writeln!(out, "closepath")
}

fn write_polyline(out: &mut dyn Write, points: &[Point]) -> fmt::Result {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };
    writeln!(out, "newpath {} moveto", fmt_pt(*first))?;
    for &p in rest {
        writeln!(out, "{} lineto", fmt_pt(p))?;
    }
    Ok(())
}

fn write_shape_path(out: &mut dyn Write, r: Rect, shape: SymbolShape) -> fmt::Result {
    let c = r.center();
    match shape {
        SymbolShape::Circle => {
            writeln!(
                out,
                "newpath matrix currentmatrix {} translate {} {} scale 0 0 1 0 360 arc closepath setmatrix",
                fmt_pt(c),
                fmt_num(pt(r.width() / 2.0)),
                fmt_num(pt(r.height() / 2.0))
            )
        }
        SymbolShape::Square => write_rect_path(out, r),
        SymbolShape::Triangle => {
            write_polyline(out, &[
                Point::new(r.x0, r.y0),
                Point::new(r.x1, r.y0),
                Point::new(c.x, r.y1),
            ])?;
            writeln!(out, "closepath")
        }
        SymbolShape::Diamond => {
            write_polyline(out, &[
                Point::new(c.x, r.y0),
                Point::new(r.x1, c.y),
                Point::new(c.x, r.y1),
                Point::new(r.x0, c.y),
            ])?;
            writeln!(out, "closepath")
        }
        SymbolShape::Cross => {
            writeln!(
                out,
                "newpath {} moveto {} lineto {} moveto {} lineto",
                fmt_pt(Point::new(r.x0, c.y)),
                fmt_pt(Point::new(r.x1, c.y)),
                fmt_pt(Point::new(c.x, r.y0)),
                fmt_pt(Point::new(c.x, r.y1))
            )
        }
    }
}

fn set_color(out: &mut dyn Write, c: Color) -> fmt::Result {
    writeln!(
        out,
        "{} {} {} setrgbcolor",
        fmt_num(f64::from(c.r) / 255.0),
        fmt_num(f64::from(c.g) / 255.0),
        fmt_num(f64::from(c.b) / 255.0)
    )
}

/// Milli-inches to points.
fn pt(milli_in: f64) -> f64 {
    milli_in * 72.0 / 1000.0
}

fn fmt_pt(p: Point) -> String {
    format!("{} {}", fmt_num(pt(p.x)), fmt_num(pt(p.y)))
}

/// Three fractional digits, without trailing zeros.
fn fmt_num(v: f64) -> String {
    let s = format!("{:.3}", if v.abs() < 5e-4 { 0.0 } else { v });
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_owned()
}

fn escape(text: &str) -> String {
    let mut s = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '(' | ')' | '\\') {
            s.push('\\');
        }
        s.push(ch);
    }
    s
}

#[cfg(test)]
mod tests {
    use figura_core::clipboard::Clipboard;
    use figura_core::model::GraphicModel;
    use figura_core::node::{NodeKind, PropertyKey, PropertyValue};

    use super::*;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(fmt_num(72.0), "72");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(1.23456), "1.235");
        assert_eq!(pt(1000.0), 72.0);
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape(r"f(x) \ g"), r"f\(x\) \\ g");
    }

    #[test]
    fn export_walks_in_render_order() {
        let mut m = GraphicModel::new(Clipboard::new());
        let root = m.root();
        let label = m.insert_new(root, NodeKind::Label).unwrap();
        assert!(m.set_property(label, PropertyKey::Text, PropertyValue::Text("(a)".into())));
        let _ = m.insert_new(root, NodeKind::Graph).unwrap();

        let mut out = String::new();
        export(m.store(), root, &mut out).unwrap();
        assert!(out.starts_with("%!PS-Adobe-3.0\n%%BoundingBox: 0 0 612 792\n"));
        assert!(out.trim_end().ends_with("%%EOF"));
        let text = out.find(r"(\(a\)) show").unwrap();
        let frame = out.find("closepath").unwrap();
        assert!(frame < text, "figure outline precedes the label");
        assert_eq!(out.matches("gsave").count(), out.matches("grestore").count());
    }
}
