//! Memoized line layout.
//!
//! The cache is a pure function of (buffer content, max width, mode, shaper
//! metrics) that only recomputes when one of its inputs changed. Buffer
//! mutations do not reach the cache directly: the owner calls
//! [`LineLayoutCache::invalidate`] after every edit.
//!
//! Invariants:
//! * `lines()` is never empty once `ensure` ran (empty text → one empty line).
//! * `dims()` always describes `lines()`.

use crate::{Alignment, Fixed, LayoutOptions, Rect, Shaper, Size, VisualLine};
use core_text::TextBuffer;
use tracing::trace;

/// Width used in single-line mode, wide enough to never wrap.
pub const INF: i32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub size: Size,
    /// Distance from the bottom edge to the first line's baseline.
    pub baseline: i32,
}

#[derive(Debug, Default)]
pub struct LineLayoutCache {
    lines: Vec<VisualLine>,
    dims: Dimensions,
    valid: bool,
    max_width: i32,
    single_line: bool,
    metrics_key: u64,
}

impl LineLayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn lines(&self) -> &[VisualLine] {
        &self.lines
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Width the lines were wrapped to (`INF` in single-line mode).
    pub fn max_width(&self) -> i32 {
        self.max_width
    }

    /// Bring the cache up to date. Returns true when a recompute happened.
    pub fn ensure(
        &mut self,
        buffer: &TextBuffer,
        max_width: i32,
        single_line: bool,
        shaper: &dyn Shaper,
    ) -> bool {
        let max_width = if single_line { INF } else { max_width };
        let key = shaper.metrics_key();
        if max_width != self.max_width || single_line != self.single_line || key != self.metrics_key {
            self.max_width = max_width;
            self.single_line = single_line;
            self.metrics_key = key;
            self.valid = false;
        }
        if self.valid {
            return false;
        }
        let opts = LayoutOptions {
            max_width,
            single_line,
        };
        let text = buffer.text();
        let mut lines = shaper.layout(&text, opts);
        if lines.is_empty() {
            lines = shaper.layout("", opts);
        }
        if lines.is_empty() {
            lines.push(VisualLine::empty(Fixed::ZERO, Fixed::ZERO));
        }
        let mut dims = lines_dimens(&lines);
        // A soft-wrapped line is assumed to fill the available width so the
        // layout size does not flicker while the line is being edited.
        let soft_wrapped = lines[..lines.len() - 1]
            .iter()
            .any(|l| !l.text.is_empty() && !l.ends_in_break());
        if soft_wrapped {
            dims.size.width = max_width;
        }
        trace!(
            target: "editor.layout",
            lines = lines.len(),
            text_len = text.len(),
            width = dims.size.width,
            height = dims.size.height,
            "layout_recomputed"
        );
        self.lines = lines;
        self.dims = dims;
        self.valid = true;
        true
    }
}

/// Horizontal offset of a line of `width` inside `max_width`.
pub fn align(alignment: Alignment, width: Fixed, max_width: i32) -> Fixed {
    let mw = Fixed::from_int(max_width);
    match alignment {
        Alignment::Start => Fixed::ZERO,
        Alignment::Middle => Fixed::from_int(((mw - width) / 2).floor()),
        Alignment::End => Fixed::from_int((mw - width).floor()),
    }
}

/// Logical size of a stack of lines.
pub fn lines_dimens(lines: &[VisualLine]) -> Dimensions {
    let Some(first) = lines.first() else {
        return Dimensions::default();
    };
    let mut width = Fixed::ZERO;
    let mut height = 0;
    let mut prev_desc = Fixed::ZERO;
    for l in lines {
        height += (prev_desc + l.ascent).ceil();
        prev_desc = l.descent;
        width = width.max(l.width);
    }
    height += prev_desc.ceil();
    let baseline = first.ascent.ceil();
    Dimensions {
        size: Size::new(width.ceil(), height),
        baseline: height - baseline,
    }
}

/// Ink overhang outside the logical box, as a rectangle whose non-zero
/// components extend the `[0, size)` box: negative `min`, positive `max`.
pub fn text_padding(lines: &[VisualLine]) -> Rect {
    let mut padding = Rect::default();
    let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
        return padding;
    };
    let d = first.ascent + first.bounds.min_y;
    if d < Fixed::ZERO {
        padding.min.y = d.ceil();
    }
    let d = last.bounds.max_y - last.descent;
    if d > Fixed::ZERO {
        padding.max.y = d.ceil();
    }
    let d = first.bounds.min_x;
    if d < Fixed::ZERO {
        padding.min.x = d.ceil();
    }
    let d = first.bounds.max_x - first.width;
    if d > Fixed::ZERO {
        padding.max.x = d.ceil();
    }
    padding
}
