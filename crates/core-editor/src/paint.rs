//! Paint instructions derived from the current layout.
//!
//! Regions and the caret rectangle are expressed in view coordinates (the
//! scroll offset already subtracted). The clip area is the view grown by the
//! lines' ink overhang.

use crate::caret::CaretPosition;
use core_layout::{Alignment, Fixed, Point, Rect, Size, VisualLine, align, text_padding};

/// One visible line: draw `lines[line]` with its pen origin at `offset`,
/// clipped to `clip` (relative to `offset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRegion {
    pub line: usize,
    pub offset: Point,
    pub clip: Rect,
}

fn view_clip(lines: &[VisualLine], view: Size) -> Rect {
    let mut clip = text_padding(lines);
    clip.max = clip.max + Point::new(view.width, view.height);
    clip
}

/// Regions for the lines that intersect the clip area.
pub fn text_regions(
    lines: &[VisualLine],
    alignment: Alignment,
    view: Size,
    scroll: Point,
) -> Vec<TextRegion> {
    let clip = view_clip(lines, view);
    let mut out = Vec::new();
    let mut y = 0;
    let mut prev_desc = Fixed::ZERO;
    for (n, l) in lines.iter().enumerate() {
        y += (prev_desc + l.ascent).ceil();
        prev_desc = l.descent;
        let x = align(alignment, l.width, view.width).floor();
        let offset = Point::new(x - scroll.x, y - scroll.y);
        let oy = Fixed::from_int(offset.y);
        if (oy + l.bounds.min_y).floor() > clip.max.y {
            break;
        }
        if (oy + l.bounds.max_y).ceil() < clip.min.y {
            continue;
        }
        out.push(TextRegion {
            line: n,
            offset,
            clip: clip.translate(Point::new(-offset.x, -offset.y)),
        });
    }
    out
}

/// Caret bar centered on the caret x, spanning the line's ink height.
pub fn caret_rect(
    lines: &[VisualLine],
    caret: &CaretPosition,
    caret_width: Fixed,
    view: Size,
    scroll: Point,
) -> Option<Rect> {
    let l = lines.get(caret.line)?;
    let x = caret.x - caret_width / 2;
    let asc = -l.bounds.min_y;
    let desc = l.bounds.max_y;
    let rect = Rect::new(
        Point::new(x.ceil(), caret.y - asc.ceil()),
        Point::new(x.ceil() + caret_width.ceil(), caret.y + desc.ceil()),
    )
    .translate(Point::new(-scroll.x, -scroll.y));
    let mut clip = text_padding(lines);
    let half = (caret_width / 2).ceil();
    clip.max.x = clip.max.x.max(half);
    clip.min.x = clip.min.x.min(-half);
    clip.max = clip.max + Point::new(view.width, view.height);
    let r = clip.intersect(&rect);
    (!r.is_empty()).then_some(r)
}
