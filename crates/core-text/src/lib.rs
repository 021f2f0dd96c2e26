//! Rope-backed text buffer with a single byte-offset caret.
//!
//! The buffer owns the editable text and the insertion point. All positions are
//! absolute UTF-8 byte offsets; the caret is kept on a scalar-value boundary by
//! every operation (`set_caret` snaps down when handed a mid-character offset).
//!
//! Change tracking: every mutating call sets a `changed` flag which stays set
//! until a consumer calls [`TextBuffer::take_changed`]. The editor dispatcher
//! uses this to emit at most one change notification per frame.
//!
//! Navigation here is strictly scalar-value based (one `char` per step). Layout
//! aware movement (lines, columns, pixels) lives in `core-editor::caret`.

use ropey::Rope;

pub mod normalize;

/// Remove every line break (`\r\n`, `\n`, `\r`) from `text`.
///
/// Used by single-line editors before text reaches the buffer.
pub fn strip_line_breaks(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Mutable text plus caret.
#[derive(Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    caret: usize,
    changed: bool,
}

impl std::fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Content is intentionally summarized; logs never carry buffer text.
        f.debug_struct("TextBuffer")
            .field("len", &self.len())
            .field("caret", &self.caret)
            .field("changed", &self.changed)
            .finish()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a buffer holding `content` with the caret at offset 0.
    pub fn from_str(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            caret: 0,
            changed: false,
        }
    }

    /// Byte length of the contents.
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Full contents as an owned string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Current caret byte offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret to `offset`, clamped to `[0, len]` and snapped down to the
    /// start of the scalar value containing it.
    pub fn set_caret(&mut self, offset: usize) {
        let offset = offset.min(self.len());
        let char_idx = self.rope.byte_to_char(offset);
        self.caret = self.rope.char_to_byte(char_idx);
    }

    /// Whether a mutation happened since the last `take_changed`.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Read and clear the change flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Replace all content and reset the caret to 0.
    pub fn set_text(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
        self.caret = 0;
        self.changed = true;
    }

    /// Insert `text` at the caret and advance the caret past it.
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.prepend(text);
        self.caret += text.len();
    }

    /// Insert `text` at the caret without moving the caret.
    pub fn prepend(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let char_idx = self.rope.byte_to_char(self.caret);
        self.rope.insert(char_idx, text);
        self.changed = true;
    }

    /// Remove the scalar value before the caret (backspace). No-op at offset 0.
    pub fn delete_before(&mut self) {
        let Some((_, size)) = self.rune_before(self.caret) else {
            return;
        };
        let end = self.rope.byte_to_char(self.caret);
        self.rope.remove(end - 1..end);
        self.caret -= size;
        self.changed = true;
    }

    /// Remove the scalar value after the caret (forward delete). No-op at the end.
    pub fn delete_after(&mut self) {
        if self.rune_at(self.caret).is_none() {
            return;
        }
        let start = self.rope.byte_to_char(self.caret);
        self.rope.remove(start..start + 1);
        self.changed = true;
    }

    /// The scalar value ending at byte `offset` and its UTF-8 length.
    pub fn rune_before(&self, offset: usize) -> Option<(char, usize)> {
        let offset = offset.min(self.len());
        let char_idx = self.rope.byte_to_char(offset);
        if char_idx == 0 {
            return None;
        }
        let c = self.rope.char(char_idx - 1);
        Some((c, c.len_utf8()))
    }

    /// The scalar value starting at byte `offset` and its UTF-8 length.
    pub fn rune_at(&self, offset: usize) -> Option<(char, usize)> {
        if offset >= self.len() {
            return None;
        }
        let char_idx = self.rope.byte_to_char(offset);
        let c = self.rope.char(char_idx);
        Some((c, c.len_utf8()))
    }

    /// Step the caret back one scalar value.
    pub fn move_left(&mut self) {
        if let Some((_, size)) = self.rune_before(self.caret) {
            self.caret -= size;
        }
    }

    /// Step the caret forward one scalar value.
    pub fn move_right(&mut self) {
        if let Some((_, size)) = self.rune_at(self.caret) {
            self.caret += size;
        }
    }
}
