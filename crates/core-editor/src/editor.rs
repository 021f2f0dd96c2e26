//! The editor state object and its frame entry point.

use crate::blink::Blink;
use crate::caret::{CaretPosition, Navigator};
use crate::dispatcher;
use crate::gesture::{ClickGesture, GestureTuning, ScrollGesture};
use crate::paint::{self, TextRegion};
use crate::queue::EventQueue;
use crate::scroll::ScrollController;
use core_config::{AlignmentSetting, Config, ModifierSetting};
use core_events::{EditorEvent, InputEvent, ModMask, PointerEvent};
use core_layout::{
    Alignment, Constraints, Fixed, LineLayoutCache, Point, Rect, Shaper, Size, VisualLine, align,
};
use core_text::{TextBuffer, strip_line_breaks};
use std::time::{Duration, Instant};
use tracing::debug;

/// Behavior switches and tuning, usually derived from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    pub single_line: bool,
    /// Enter with `submit_modifier` held emits `Submit` instead of a break.
    pub submit: bool,
    pub submit_modifier: ModMask,
    pub alignment: Alignment,
    pub caret_width: Fixed,
    pub blinks_per_second: u16,
    pub max_blink: Duration,
    pub gesture: GestureTuning,
    pub queue_capacity: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl EditorOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let editor = &cfg.file.editor;
        Self {
            single_line: editor.single_line,
            submit: editor.submit,
            submit_modifier: match editor.submit_modifier {
                ModifierSetting::Shift => ModMask::SHIFT,
                ModifierSetting::Ctrl => ModMask::CTRL,
                ModifierSetting::Alt => ModMask::ALT,
                ModifierSetting::Meta => ModMask::META,
            },
            alignment: match editor.alignment {
                AlignmentSetting::Start => Alignment::Start,
                AlignmentSetting::Middle => Alignment::Middle,
                AlignmentSetting::End => Alignment::End,
            },
            caret_width: Fixed::from_int(i32::from(cfg.effective_caret_width)),
            blinks_per_second: cfg.effective_blinks_per_second,
            max_blink: Duration::from_millis(cfg.file.caret.max_blink_ms),
            gesture: GestureTuning::from(&cfg.file.gesture),
            queue_capacity: cfg.effective_queue_capacity,
        }
    }
}

/// Everything the host supplies for one frame.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub now: Instant,
    pub constraints: Constraints,
    pub pointer: Vec<PointerEvent>,
    pub keys: Vec<InputEvent>,
}

impl FrameInput {
    pub fn new(now: Instant, constraints: Constraints) -> Self {
        Self {
            now,
            constraints,
            pointer: Vec::new(),
            keys: Vec::new(),
        }
    }

    pub fn with_pointer(mut self, ev: PointerEvent) -> Self {
        self.pointer.push(ev);
        self
    }

    pub fn with_key(mut self, ev: InputEvent) -> Self {
        self.keys.push(ev);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutput {
    /// Size of the view, the layout size clamped into the constraints.
    pub size: Size,
    /// Distance from the bottom of the view to the first baseline.
    pub baseline: i32,
    /// When the host should schedule another frame without new input.
    pub redraw_at: Option<Instant>,
    /// A click asked for keyboard focus; the host should deliver `FocusGained`.
    pub focus_requested: bool,
}

/// Recorded selection start. Tracked only; nothing highlights or acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub col: usize,
    pub line: usize,
}

/// An editable, scrollable text area.
#[derive(Debug)]
pub struct Editor {
    pub(crate) opts: EditorOptions,
    pub(crate) buffer: TextBuffer,
    pub(crate) cache: LineLayoutCache,
    pub(crate) scroll: ScrollController,
    pub(crate) scroller: ScrollGesture,
    pub(crate) clicker: ClickGesture,
    pub(crate) blink: Blink,
    pub(crate) focused: bool,
    pub(crate) request_focus: bool,
    pub(crate) caret_scroll: bool,
    caret_on: bool,
    /// Remembered horizontal offset for vertical and page moves.
    pub(crate) remembered: Fixed,
    pub(crate) anchor: Option<Anchor>,
    constraints: Constraints,
    pub(crate) events: EventQueue,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

pub(crate) fn navigator<'a>(
    cache: &'a LineLayoutCache,
    opts: &EditorOptions,
    view: Size,
) -> Navigator<'a> {
    Navigator::new(cache.lines(), opts.alignment, view.width)
}

impl Editor {
    pub fn new(opts: EditorOptions) -> Self {
        Self {
            buffer: TextBuffer::new(),
            cache: LineLayoutCache::new(),
            scroll: ScrollController::new(opts.single_line),
            scroller: ScrollGesture::new(opts.gesture),
            clicker: ClickGesture::new(opts.gesture),
            blink: Blink::new(opts.blinks_per_second, opts.max_blink),
            focused: false,
            request_focus: false,
            caret_scroll: false,
            caret_on: false,
            remembered: Fixed::ZERO,
            anchor: None,
            constraints: Constraints::default(),
            events: EventQueue::new(opts.queue_capacity),
            opts,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(EditorOptions::from_config(cfg))
    }

    pub fn options(&self) -> &EditorOptions {
        &self.opts
    }

    /// Ask the host for keyboard focus on the next frame.
    pub fn focus(&mut self) {
        self.request_focus = true;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Replace the contents. The next frame reports one `Change`.
    pub fn set_text(&mut self, text: &str) {
        let text = if self.opts.single_line {
            strip_line_breaks(text)
        } else {
            text.to_string()
        };
        self.buffer.set_text(&text);
        self.remembered = Fixed::ZERO;
        self.anchor = None;
        self.cache.invalidate();
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Caret byte offset.
    pub fn caret(&self) -> usize {
        self.buffer.caret()
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    /// Lines of the most recent layout.
    pub fn lines(&self) -> &[VisualLine] {
        self.cache.lines()
    }

    pub fn caret_position(&self) -> CaretPosition {
        navigator(&self.cache, &self.opts, self.scroll.view()).locate(self.buffer.caret())
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll.offset()
    }

    pub fn selection_anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Selections are never active; the anchor is bookkeeping only.
    pub fn has_selection(&self) -> bool {
        false
    }

    pub fn set_caret_width(&mut self, width: u16) {
        self.opts.caret_width = Fixed::from_int(i32::from(width));
    }

    /// Run one frame: consume input, bring the layout up to date and
    /// prepare paint state.
    pub fn layout(&mut self, frame: &FrameInput, shaper: &dyn Shaper) -> FrameOutput {
        self.events.begin_frame();
        self.constraints = frame.constraints;
        self.refresh_layout(shaper);
        dispatcher::process_pointer(self, &frame.pointer, frame.now);
        dispatcher::process_keys(self, &frame.keys, frame.now, shaper);
        self.refresh_layout(shaper);
        if self.focused && self.caret_scroll {
            self.caret_scroll = false;
            let pos = self.caret_position();
            if let Some(line) = self.cache.lines().get(pos.line) {
                self.scroll.scroll_to_caret(&pos, line);
            }
        }
        let phase = self.blink.phase(frame.now, self.focused);
        self.caret_on = phase.on;
        let redraw_at = if self.scroller.is_flinging() {
            Some(frame.now)
        } else {
            phase.next_toggle
        };
        let dims = self.cache.dims();
        let view = self.scroll.view();
        FrameOutput {
            size: view,
            baseline: dims.baseline + view.height - dims.size.height,
            redraw_at,
            focus_requested: std::mem::take(&mut self.request_focus),
        }
    }

    pub fn paint_text(&self) -> Vec<TextRegion> {
        paint::text_regions(
            self.cache.lines(),
            self.opts.alignment,
            self.scroll.view(),
            self.scroll.offset(),
        )
    }

    /// Caret rectangle in view coordinates, `None` in the off phase.
    pub fn paint_caret(&self) -> Option<Rect> {
        if !self.caret_on {
            return None;
        }
        paint::caret_rect(
            self.cache.lines(),
            &self.caret_position(),
            self.opts.caret_width,
            self.scroll.view(),
            self.scroll.offset(),
        )
    }

    /// Recompute the layout if dirty and keep scroll bounds in sync with it.
    pub(crate) fn refresh_layout(&mut self, shaper: &dyn Shaper) {
        let relaid = self.cache.ensure(
            &self.buffer,
            self.constraints.max.width,
            self.opts.single_line,
            shaper,
        );
        let dims = self.cache.dims();
        let view = self.constraints.constrain(dims.size);
        if relaid || view != self.scroll.view() {
            let lead = self
                .cache
                .lines()
                .first()
                .map_or(0, |l| align(self.opts.alignment, l.width, view.width).floor());
            self.scroll.set_extent(dims.size, view, lead);
        }
    }

    /// Insert typed text at the caret.
    pub(crate) fn insert_text(&mut self, text: &str) {
        if self.opts.single_line {
            self.buffer.insert(&strip_line_breaks(text));
        } else {
            self.buffer.insert(text);
        }
        self.edited();
    }

    pub(crate) fn edited(&mut self) {
        self.remembered = Fixed::ZERO;
        self.cache.invalidate();
    }

    /// Record the caret as selection anchor unless one exists.
    pub(crate) fn mark_anchor(&mut self) {
        if self.anchor.is_none() {
            let pos = self.caret_position();
            debug!(target: "editor.dispatch", line = pos.line, col = pos.col, "anchor_set");
            self.anchor = Some(Anchor {
                col: pos.col,
                line: pos.line,
            });
        }
    }
}
