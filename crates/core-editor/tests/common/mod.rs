#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_editor::{Editor, EditorOptions, FrameInput, FrameOutput};
use core_events::{
    Clock, EditorEvent, InputEvent, KeyEvent, ModMask, NamedKey, PointerEvent, PointerKind,
    PointerPos, PointerSource,
};
use core_layout::{Constraints, MonospaceShaper, Size};
use std::cell::Cell;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

/// Monospace metrics used throughout: 10 px cells, 16 px lines, baseline
/// 12 px below each line top.
pub const CELL: i32 = 10;
pub const ASCENT: i32 = 12;
pub const DESCENT: i32 = 4;
pub const LINE: i32 = ASCENT + DESCENT;

pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

pub struct Harness {
    pub editor: Editor,
    pub clock: ManualClock,
    pub shaper: MonospaceShaper,
    pub size: Size,
}

impl Harness {
    pub fn new(opts: EditorOptions, width: i32, height: i32) -> Self {
        Self {
            editor: Editor::new(opts),
            clock: ManualClock::new(),
            shaper: MonospaceShaper::new(CELL, ASCENT, DESCENT),
            size: Size::new(width, height),
        }
    }

    pub fn multi_line(width: i32, height: i32) -> Self {
        Self::new(EditorOptions::default(), width, height)
    }

    pub fn single_line(width: i32) -> Self {
        let opts = EditorOptions {
            single_line: true,
            ..EditorOptions::default()
        };
        Self::new(opts, width, LINE)
    }

    /// Same as `new`, with focus delivered and the queue drained.
    pub fn focused(opts: EditorOptions, width: i32, height: i32) -> Self {
        let mut h = Self::new(opts, width, height);
        h.frame(vec![InputEvent::FocusGained]);
        h.drain();
        h
    }

    pub fn constraints(&self) -> Constraints {
        Constraints::new(Size::new(self.size.width, 0), self.size)
    }

    pub fn frame_with(&mut self, pointer: Vec<PointerEvent>, keys: Vec<InputEvent>) -> FrameOutput {
        let mut input = FrameInput::new(self.clock.now(), self.constraints());
        input.pointer = pointer;
        input.keys = keys;
        self.editor.layout(&input, &self.shaper)
    }

    pub fn frame(&mut self, keys: Vec<InputEvent>) -> FrameOutput {
        self.frame_with(Vec::new(), keys)
    }

    pub fn idle(&mut self) -> FrameOutput {
        self.frame(Vec::new())
    }

    pub fn type_text(&mut self, text: &str) -> FrameOutput {
        self.frame(vec![InputEvent::TextCommit(text.to_string())])
    }

    pub fn press(&mut self, key: NamedKey) -> FrameOutput {
        self.frame(vec![press(key)])
    }

    pub fn press_with(&mut self, key: NamedKey, mods: ModMask) -> FrameOutput {
        self.frame(vec![press_with(key, mods)])
    }

    pub fn click(&mut self, x: f32, y: f32) -> FrameOutput {
        let ev = PointerEvent::mouse_press(x, y, self.clock.now());
        self.frame_with(vec![ev], Vec::new())
    }

    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.editor.drain_events()
    }

    /// Replace the text, lay it out and put the caret at `caret`.
    pub fn load(&mut self, text: &str, caret: usize) {
        self.editor.set_text(text);
        self.idle();
        while self.editor.caret() < caret {
            self.press(NamedKey::Right);
        }
        self.drain();
    }

    pub fn caret_line_col(&self) -> (usize, usize) {
        let p = self.editor.caret_position();
        (p.line, p.col)
    }
}

pub fn press(key: NamedKey) -> InputEvent {
    InputEvent::Key(KeyEvent::plain(key))
}

pub fn press_with(key: NamedKey, mods: ModMask) -> InputEvent {
    InputEvent::Key(KeyEvent::new(key, mods))
}

pub fn text(s: &str) -> InputEvent {
    InputEvent::TextCommit(s.to_string())
}

pub fn touch(kind: PointerKind, x: f32, y: f32, at: Instant) -> PointerEvent {
    PointerEvent::new(
        kind,
        PointerSource::Touch,
        PointerPos::new(x, y),
        ModMask::empty(),
        at,
    )
}

pub fn wheel(dy: f32, at: Instant) -> PointerEvent {
    PointerEvent::new(
        PointerKind::Scroll { dx: 0.0, dy },
        PointerSource::Mouse,
        PointerPos::default(),
        ModMask::empty(),
        at,
    )
}

/// `n` numbered lines: "0\n1\n...".
pub fn numbered_lines(n: usize) -> String {
    (0..n).map(|i| i.to_string()).collect::<Vec<_>>().join("\n")
}

// Tracing capture, same shape as the config crate's tests.

#[derive(Clone)]
pub struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

pub struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

pub fn capture_logs<F: FnOnce()>(level: Level, f: F) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let writer = BufferWriter { inner: buf.clone() };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();
    with_default(subscriber, f);
    let out = buf.lock().expect("log buffer poisoned").clone();
    String::from_utf8(out).expect("utf8 logs")
}
