//! Viewport offset clamped to content bounds.

use crate::caret::CaretPosition;
use core_layout::{Point, Rect, Size, VisualLine};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct ScrollController {
    offset: Point,
    single_line: bool,
    content: Size,
    view: Size,
    /// Floor of the first line's alignment offset (single-line only).
    lead: i32,
}

impl ScrollController {
    pub fn new(single_line: bool) -> Self {
        Self {
            single_line,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn view(&self) -> Size {
        self.view
    }

    /// Record new content and view sizes, then re-clamp the offset.
    pub fn set_extent(&mut self, content: Size, view: Size, lead: i32) {
        self.content = content;
        self.view = view;
        self.lead = lead;
        self.reclamp();
    }

    /// Allowed offsets, both ends inclusive. A range whose maximum falls
    /// below its minimum collapses onto the minimum.
    pub fn bounds(&self) -> Rect {
        let mut b = Rect::default();
        if self.single_line {
            b.min.x = self.lead.min(0);
            b.max.x = self.content.width + b.min.x - self.view.width;
        } else {
            b.max.y = self.content.height - self.view.height;
        }
        b.max.x = b.max.x.max(b.min.x);
        b.max.y = b.max.y.max(b.min.y);
        b
    }

    pub fn scroll_rel(&mut self, dx: i32, dy: i32) {
        self.scroll_abs(self.offset.x + dx, self.offset.y + dy);
    }

    pub fn scroll_abs(&mut self, x: i32, y: i32) {
        let b = self.bounds();
        let clamped = Point::new(x.clamp(b.min.x, b.max.x), y.clamp(b.min.y, b.max.y));
        if clamped != Point::new(x, y) {
            trace!(target: "editor.scroll", x, y, to_x = clamped.x, to_y = clamped.y, "scroll_clamped");
        }
        self.offset = clamped;
    }

    pub fn reclamp(&mut self) {
        self.scroll_abs(self.offset.x, self.offset.y);
    }

    /// Scroll the minimum distance that brings the caret's line extent into
    /// view. Returns the distance applied along the scroll axis.
    pub fn scroll_to_caret(&mut self, caret: &CaretPosition, line: &VisualLine) -> i32 {
        let dist = if self.single_line {
            let left = caret.x.floor() - self.offset.x;
            let right = caret.x.ceil() - (self.offset.x + self.view.width);
            if left < 0 {
                left
            } else if right > 0 {
                right
            } else {
                0
            }
        } else {
            let top = caret.y - line.ascent.ceil() - self.offset.y;
            let bottom = caret.y + line.descent.ceil() - (self.offset.y + self.view.height);
            if top < 0 {
                top
            } else if bottom > 0 {
                bottom
            } else {
                0
            }
        };
        if dist != 0 {
            trace!(target: "editor.scroll", dist, "scroll_to_caret");
            if self.single_line {
                self.scroll_rel(dist, 0);
            } else {
                self.scroll_rel(0, dist);
            }
        }
        dist
    }
}
