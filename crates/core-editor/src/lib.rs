//! Editing engine: caret navigation, scrolling, gestures, input dispatch and
//! paint geometry around a [`core_text::TextBuffer`].
//!
//! The host drives an [`Editor`] once per frame through [`Editor::layout`],
//! then reads paint instructions and drains [`core_events::EditorEvent`]s.

pub mod blink;
pub mod caret;
mod dispatcher;
mod editor;
pub mod gesture;
pub mod paint;
mod queue;
pub mod scroll;

pub use caret::{CaretPosition, Navigator};
pub use editor::{Anchor, Editor, EditorOptions, FrameInput, FrameOutput};
pub use paint::TextRegion;
pub use queue::EventQueue;
