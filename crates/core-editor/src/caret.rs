//! Caret ↔ layout coordinate mapping and layout-aware caret movement.
//!
//! Positions are always derived from the buffer caret and the current lines;
//! nothing here caches a (line, column) pair. Every movement returns the new
//! remembered horizontal offset so the caller owns that piece of state.
//!
//! Boundary rule: on a non-final line the position after its last rune is
//! the next line's start. Only the final line exposes a trailing position.

use core_layout::{Alignment, Fixed, INF, Point, VisualLine, align};
use core_text::TextBuffer;

/// Derived caret location. `y` is the baseline of `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretPosition {
    pub line: usize,
    pub col: usize,
    pub x: Fixed,
    pub y: i32,
}

/// Read-only view over the lines used by every movement.
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    lines: &'a [VisualLine],
    alignment: Alignment,
    view_width: i32,
}

impl<'a> Navigator<'a> {
    pub fn new(lines: &'a [VisualLine], alignment: Alignment, view_width: i32) -> Self {
        Self {
            lines,
            alignment,
            view_width,
        }
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn line_align(&self, line: &VisualLine) -> Fixed {
        align(self.alignment, line.width, self.view_width)
    }

    pub fn locate(&self, caret: usize) -> CaretPosition {
        let mut pos = CaretPosition::default();
        if self.lines.is_empty() {
            return pos;
        }
        let last = self.last_line();
        let mut idx = 0usize;
        let mut prev_desc = Fixed::ZERO;
        for (n, l) in self.lines.iter().enumerate() {
            pos.line = n;
            pos.y += (prev_desc + l.ascent).ceil();
            prev_desc = l.descent;
            if n == last || idx + l.byte_len() > caret {
                for (c, adv) in l.text.chars().zip(&l.advances) {
                    if idx >= caret {
                        break;
                    }
                    pos.x += *adv;
                    idx += c.len_utf8();
                    pos.col += 1;
                }
                break;
            }
            idx += l.byte_len();
        }
        pos.x += self.line_align(&self.lines[pos.line]);
        pos
    }

    /// Move the caret onto `target` (clamped) at the rune boundary closest to
    /// `desired_x`. Returns `desired_x - actual_x`.
    pub fn move_to_line(&self, buf: &mut TextBuffer, desired_x: Fixed, target: isize) -> Fixed {
        if self.lines.is_empty() {
            return Fixed::ZERO;
        }
        let cur = self.locate(buf.caret());
        let target = target.clamp(0, self.last_line() as isize) as usize;
        let mut caret = buf.caret();
        for _ in 0..cur.col {
            if let Some((_, size)) = buf.rune_before(caret) {
                caret -= size;
            }
        }
        if target > cur.line {
            caret += self.lines[cur.line..target]
                .iter()
                .map(VisualLine::byte_len)
                .sum::<usize>();
        } else {
            let back: usize = self.lines[target..cur.line]
                .iter()
                .map(VisualLine::byte_len)
                .sum();
            caret = caret.saturating_sub(back);
        }
        let l2 = &self.lines[target];
        let mut x2 = self.line_align(l2);
        let end = usize::from(target < self.last_line());
        let runes = l2.text.chars().zip(&l2.advances);
        for (c, &adv) in runes.take(l2.rune_count().saturating_sub(end)) {
            if x2 >= desired_x {
                break;
            }
            // Stop when the next boundary is no closer than the current one.
            if x2 + adv - desired_x >= desired_x - x2 {
                break;
            }
            x2 += adv;
            caret += c.len_utf8();
        }
        buf.set_caret(caret);
        desired_x - x2
    }

    /// Move by `pages` viewport heights, keeping horizontal intent.
    pub fn move_pages(
        &self,
        buf: &mut TextBuffer,
        pages: i32,
        view_height: i32,
        remembered: Fixed,
    ) -> Fixed {
        let Some(first) = self.lines.first() else {
            return remembered;
        };
        let pos = self.locate(buf.caret());
        let y = pos.y + pages * view_height;
        let mut y2 = first.ascent.ceil();
        let mut prev_desc = first.descent;
        let mut target = 0isize;
        for l in &self.lines[1..] {
            if y2 >= y {
                break;
            }
            let h = (prev_desc + l.ascent).ceil();
            prev_desc = l.descent;
            if y2 + h - y >= y - y2 {
                break;
            }
            y2 += h;
            target += 1;
        }
        self.move_to_line(buf, pos.x + remembered, target)
    }

    /// Move to the first column of the caret's line. Returns the remembered
    /// offset relative to the line's aligned start.
    pub fn move_start(&self, buf: &mut TextBuffer) -> Fixed {
        if self.lines.is_empty() {
            return Fixed::ZERO;
        }
        let pos = self.locate(buf.caret());
        let advances = &self.lines[pos.line].advances;
        let mut x = pos.x;
        let mut caret = buf.caret();
        for adv in advances[..pos.col].iter().rev() {
            if let Some((_, size)) = buf.rune_before(caret) {
                caret -= size;
            }
            x -= *adv;
        }
        buf.set_caret(caret);
        -x
    }

    /// Move to the last column of the caret's line. Returns the remembered
    /// offset relative to the line's aligned end.
    pub fn move_end(&self, buf: &mut TextBuffer) -> Fixed {
        if self.lines.is_empty() {
            return Fixed::ZERO;
        }
        let pos = self.locate(buf.caret());
        let l = &self.lines[pos.line];
        let end = usize::from(pos.line < self.last_line());
        let mut x = pos.x;
        let mut caret = buf.caret();
        let runes = l.text.chars().zip(&l.advances);
        for (c, adv) in runes.take(l.rune_count().saturating_sub(end)).skip(pos.col) {
            caret += c.len_utf8();
            x += *adv;
        }
        buf.set_caret(caret);
        l.width + self.line_align(l) - x
    }

    /// Place the caret under a view-relative point.
    pub fn move_coord(&self, buf: &mut TextBuffer, at: Point, scroll: Point) -> Fixed {
        let (tx, ty) = (content_coord(at.x, scroll.x), content_coord(at.y, scroll.y));
        let mut prev_desc = Fixed::ZERO;
        let mut y = 0;
        let mut line = 0isize;
        for l in self.lines {
            y += (prev_desc + l.ascent).ceil();
            prev_desc = l.descent;
            if y + prev_desc.ceil() >= ty {
                break;
            }
            line += 1;
        }
        self.move_to_line(buf, Fixed::from_int(tx), line)
    }
}

/// `view + scroll`, clamped to `±INF` so it survives the 26.6 conversion.
fn content_coord(view: i32, scroll: i32) -> i32 {
    let bound = i64::from(INF);
    (i64::from(view) + i64::from(scroll)).clamp(-bound, bound) as i32
}
