//! Input and output event types shared by the editor core and its host.
//!
//! The host collects raw platform input for one frame into two ordered streams:
//! pointer events and keyboard events. The editor drains them in that order
//! and reports discrete [`EditorEvent`]s back through a bounded queue.

use std::fmt;
use std::time::Instant;

// -------------------------------------------------------------------------------------------------
// Queue Policy
// -------------------------------------------------------------------------------------------------
// Editor events accumulate in a bounded queue drained once per frame by the host. A host that never
// drains would otherwise grow the queue without limit; on overflow the oldest event is dropped and a
// warning is logged by the owner of the queue. Capacity comes from `[events] queue_capacity`.
// -------------------------------------------------------------------------------------------------

/// Discrete notifications produced by an editor for its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorEvent {
    /// The buffer contents changed during the frame.
    Change,
    /// Submit key combination pressed (Submit mode only).
    Submit,
    /// Caret tried to leave through the top; host may focus the previous editor.
    Up,
    /// Caret tried to leave through the bottom; host may focus the next editor.
    Down,
}

// -------------------------------------------------------------------------------------------------
// Clock
// -------------------------------------------------------------------------------------------------

/// Source of the current instant for blink and fling timing.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// -------------------------------------------------------------------------------------------------
// Keyboard
// -------------------------------------------------------------------------------------------------

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ModMask: u16 { const CTRL=1; const ALT=2; const SHIFT=4; const META=8; const SUPER=16; }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    /// Keypad / secondary return key.
    Return,
    Esc,
    Backspace,
    Delete,
    Tab,
    Insert,
    F(u8),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: NamedKey,
    pub mods: ModMask,
}

impl KeyEvent {
    pub fn new(key: NamedKey, mods: ModMask) -> Self {
        Self { key, mods }
    }

    pub fn plain(key: NamedKey) -> Self {
        Self::new(key, ModMask::empty())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.key, self.mods)
    }
}

/// Keyboard-stream events, processed after pointer events each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    FocusGained,
    FocusLost,
    /// Named (non-printing) key press.
    Key(KeyEvent),
    /// Literal text ready for insertion. Never logged verbatim; log the length.
    TextCommit(String),
}

// -------------------------------------------------------------------------------------------------
// Pointer
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerKind {
    Press,
    Release,
    /// Motion while a button or finger is down.
    Drag,
    /// Wheel / trackpad scroll by the given amount in pixels.
    Scroll { dx: f32, dy: f32 },
    /// Gesture aborted by the platform.
    Cancel,
}

/// Pointer-stream event, relative to the editor's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub source: PointerSource,
    pub position: PointerPos,
    pub mods: ModMask,
    pub timestamp: Instant,
}

impl PointerEvent {
    pub fn new(
        kind: PointerKind,
        source: PointerSource,
        position: PointerPos,
        mods: ModMask,
        timestamp: Instant,
    ) -> Self {
        Self {
            kind,
            source,
            position,
            mods,
            timestamp,
        }
    }

    /// Mouse button press at `(x, y)` without modifiers.
    pub fn mouse_press(x: f32, y: f32, timestamp: Instant) -> Self {
        Self::new(
            PointerKind::Press,
            PointerSource::Mouse,
            PointerPos::new(x, y),
            ModMask::empty(),
            timestamp,
        )
    }

    pub fn with_mods(mut self, mods: ModMask) -> Self {
        self.mods = mods;
        self
    }
}
