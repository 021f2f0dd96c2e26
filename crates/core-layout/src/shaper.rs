//! Shaping capability and the reference monospace implementation.
//!
//! A [`Shaper`] turns text plus a width constraint into wrapped
//! [`VisualLine`]s. Real hosts plug in a font engine; the editor core only
//! relies on the contract below.
//!
//! Contract:
//! * Concatenating `line.text` over all returned lines yields the input text.
//! * `line.advances.len()` equals the number of scalar values in `line.text`.
//! * A hard break `\n` is the last rune of its line.
//! * Text that is empty or ends in `\n` produces a trailing empty line.
//! * `single_line` returns exactly one line.

use crate::Fixed;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Maximum line width in pixels.
    pub max_width: i32,
    pub single_line: bool,
}

/// Ink extent of a line relative to its origin (pen start on the baseline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InkBounds {
    pub min_x: Fixed,
    pub min_y: Fixed,
    pub max_x: Fixed,
    pub max_y: Fixed,
}

/// One wrapped, renderable segment of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLine {
    pub text: String,
    /// One advance per scalar value of `text`.
    pub advances: Vec<Fixed>,
    pub ascent: Fixed,
    pub descent: Fixed,
    pub width: Fixed,
    pub bounds: InkBounds,
}

impl VisualLine {
    /// Build a line whose width is the sum of its advances and whose ink box
    /// equals its logical box.
    pub fn new(text: String, advances: Vec<Fixed>, ascent: Fixed, descent: Fixed) -> Self {
        debug_assert_eq!(advances.len(), text.chars().count());
        let width: Fixed = advances.iter().copied().sum();
        Self {
            text,
            advances,
            ascent,
            descent,
            width,
            bounds: InkBounds {
                min_x: Fixed::ZERO,
                min_y: -ascent,
                max_x: width,
                max_y: descent,
            },
        }
    }

    pub fn empty(ascent: Fixed, descent: Fixed) -> Self {
        Self::new(String::new(), Vec::new(), ascent, descent)
    }

    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    pub fn rune_count(&self) -> usize {
        self.advances.len()
    }

    /// Whether the line was terminated by an explicit `\n`.
    pub fn ends_in_break(&self) -> bool {
        self.text.ends_with('\n')
    }
}

pub trait Shaper {
    fn layout(&self, text: &str, opts: LayoutOptions) -> Vec<VisualLine>;

    /// Changes whenever font or scale changes so cached layouts can be dropped.
    fn metrics_key(&self) -> u64 {
        0
    }
}

/// Fixed-pitch shaper: every cell is `cell_width` wide, East Asian wide
/// characters take two cells, zero-width and control characters none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceShaper {
    cell_width: Fixed,
    ascent: Fixed,
    descent: Fixed,
}

impl MonospaceShaper {
    pub fn new(cell_width: i32, ascent: i32, descent: i32) -> Self {
        Self {
            cell_width: Fixed::from_int(cell_width),
            ascent: Fixed::from_int(ascent),
            descent: Fixed::from_int(descent),
        }
    }

    pub fn advance(&self, c: char) -> Fixed {
        if c == '\n' {
            return Fixed::ZERO;
        }
        let cells = c.width().unwrap_or(0) as i32;
        self.cell_width * cells
    }

    fn line(&self, text: &str) -> VisualLine {
        let advances = text.chars().map(|c| self.advance(c)).collect();
        VisualLine::new(text.to_string(), advances, self.ascent, self.descent)
    }

    fn wrap_paragraph(&self, para: &str, max: Fixed, out: &mut Vec<VisualLine>) {
        let mut start = 0usize;
        let mut end = 0usize;
        let mut width = Fixed::ZERO;
        for (idx, seg) in para.split_word_bound_indices() {
            let seg_width: Fixed = seg.chars().map(|c| self.advance(c)).sum();
            // Whitespace may hang past the edge; lines never start with it.
            let hangs = seg.chars().all(char::is_whitespace);
            if !hangs && end > start && width + seg_width > max {
                out.push(self.line(&para[start..end]));
                start = end;
                width = Fixed::ZERO;
            }
            if !hangs && seg_width > max {
                for (off, c) in seg.char_indices() {
                    let adv = self.advance(c);
                    if end > start && width + adv > max {
                        out.push(self.line(&para[start..end]));
                        start = end;
                        width = Fixed::ZERO;
                    }
                    end = idx + off + c.len_utf8();
                    width += adv;
                }
                continue;
            }
            end = idx + seg.len();
            width += seg_width;
        }
        if end > start {
            out.push(self.line(&para[start..end]));
        }
    }
}

impl Shaper for MonospaceShaper {
    fn layout(&self, text: &str, opts: LayoutOptions) -> Vec<VisualLine> {
        if opts.single_line {
            return vec![self.line(text)];
        }
        let max = Fixed::from_int(opts.max_width.max(0));
        let mut out = Vec::new();
        for para in text.split_inclusive('\n') {
            self.wrap_paragraph(para, max, &mut out);
        }
        if text.is_empty() || text.ends_with('\n') {
            out.push(VisualLine::empty(self.ascent, self.descent));
        }
        out
    }

    fn metrics_key(&self) -> u64 {
        let w = self.cell_width.to_bits() as u32 as u64;
        let a = self.ascent.to_bits() as u16 as u64;
        let d = self.descent.to_bits() as u16 as u64;
        (w << 32) | (a << 16) | d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shaper() -> MonospaceShaper {
        MonospaceShaper::new(10, 12, 4)
    }

    fn texts(lines: &[VisualLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn wrapped(text: &str, max_width: i32) -> Vec<VisualLine> {
        shaper().layout(
            text,
            LayoutOptions {
                max_width,
                single_line: false,
            },
        )
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let lines = wrapped("", 100);
        assert_eq!(texts(&lines), vec![""]);
        assert_eq!(lines[0].ascent, Fixed::from_int(12));
    }

    #[test]
    fn hard_breaks_end_their_lines() {
        let lines = wrapped("ab\ncd", 1000);
        assert_eq!(texts(&lines), vec!["ab\n", "cd"]);
        assert_eq!(lines[0].advances.len(), 3);
        assert_eq!(lines[0].width, Fixed::from_int(20));
    }

    #[test]
    fn trailing_break_adds_empty_line() {
        let lines = wrapped("ab\n", 1000);
        assert_eq!(texts(&lines), vec!["ab\n", ""]);
    }

    #[test]
    fn wraps_at_word_bounds_with_hanging_space() {
        // 5 cells per line.
        let lines = wrapped("hello world", 50);
        assert_eq!(texts(&lines), vec!["hello ", "world"]);
    }

    #[test]
    fn long_words_break_by_rune() {
        let lines = wrapped("abcdefgh", 30);
        assert_eq!(texts(&lines), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn wide_characters_take_two_cells() {
        let s = shaper();
        assert_eq!(s.advance('漢'), Fixed::from_int(20));
        assert_eq!(s.advance('a'), Fixed::from_int(10));
        assert_eq!(s.advance('\n'), Fixed::ZERO);
    }

    #[test]
    fn single_line_never_wraps() {
        let lines = shaper().layout(
            "hello world",
            LayoutOptions {
                max_width: 20,
                single_line: true,
            },
        );
        assert_eq!(texts(&lines), vec!["hello world"]);
    }

    #[test]
    fn lines_concatenate_to_input() {
        let input = "one two three\nfour 漢字漢字 five\n\nsix";
        let lines = wrapped(input, 40);
        let joined: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined, input);
        for l in &lines {
            assert_eq!(l.advances.len(), l.text.chars().count());
        }
    }

    #[test]
    fn metrics_key_tracks_font_size() {
        assert_ne!(
            MonospaceShaper::new(10, 12, 4).metrics_key(),
            MonospaceShaper::new(11, 12, 4).metrics_key()
        );
    }
}
