//! Per-frame input dispatch.
//!
//! Pointer events are handled before keyboard events so that a click and
//! typing delivered in the same frame insert at the clicked position.
//! Keyboard events run in order; a Submit ends keyboard processing for the
//! frame. Buffer changes are reported as a single `Change` per frame.

use crate::editor::{Editor, navigator};
use crate::gesture::{Axis, ClickKind};
use core_events::{EditorEvent, InputEvent, KeyEvent, ModMask, NamedKey, PointerEvent, PointerSource};
use core_layout::{Fixed, Point, Shaper};
use core_text::normalize;
use std::time::Instant;
use tracing::{debug, trace};

/// How a named key was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    /// A command ran.
    Handled,
    /// The caret would leave the editor; the host may move focus.
    Boundary(EditorEvent),
    Submit,
    /// No command for this key.
    Ignored,
}

pub(crate) fn process_pointer(ed: &mut Editor, events: &[PointerEvent], now: Instant) {
    if events.is_empty() && !ed.scroller.is_flinging() {
        return;
    }
    let axis = if ed.opts.single_line {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };
    let bounds = ed.scroll.bounds();
    let (smin, smax) = match axis {
        Axis::Horizontal => (bounds.min.x, bounds.max.x),
        Axis::Vertical => (bounds.min.y, bounds.max.y),
    };
    let was_flinging = ed.scroller.is_flinging();
    let dist = ed.scroller.scroll(events, now, axis);
    if dist != 0 {
        match axis {
            Axis::Horizontal => ed.scroll.scroll_rel(dist, 0),
            Axis::Vertical => ed.scroll.scroll_rel(0, dist),
        }
    }
    let off = match axis {
        Axis::Horizontal => ed.scroll.offset().x,
        Axis::Vertical => ed.scroll.offset().y,
    };
    for click in ed.clicker.update(events) {
        let accepted = matches!(
            (click.kind, click.source),
            (ClickKind::Press, PointerSource::Mouse) | (ClickKind::Click, PointerSource::Touch)
        );
        if !accepted {
            continue;
        }
        ed.blink.reset(now);
        if click.mods.contains(ModMask::SHIFT) {
            ed.mark_anchor();
        }
        let at = Point::new(
            click.position.x.round() as i32,
            click.position.y.round() as i32,
        );
        let scroll = ed.scroll.offset();
        navigator(&ed.cache, &ed.opts, ed.scroll.view()).move_coord(&mut ed.buffer, at, scroll);
        ed.remembered = Fixed::ZERO;
        ed.request_focus = true;
        if !was_flinging {
            ed.caret_scroll = true;
        }
        ed.scroller.stop();
        debug!(target: "editor.dispatch", x = at.x, y = at.y, caret = ed.buffer.caret(), "click");
    }
    if (dist > 0 && off >= smax) || (dist < 0 && off <= smin) {
        ed.scroller.stop();
    }
}

pub(crate) fn process_keys(
    ed: &mut Editor,
    events: &[InputEvent],
    now: Instant,
    shaper: &dyn Shaper,
) {
    for (i, ev) in events.iter().enumerate() {
        ed.blink.reset(now);
        match ev {
            InputEvent::FocusGained | InputEvent::FocusLost => {
                let focused = matches!(ev, InputEvent::FocusGained);
                if focused != ed.focused {
                    debug!(target: "editor.dispatch", focused, "focus_changed");
                }
                ed.focused = focused;
            }
            InputEvent::Key(k) if ed.focused => {
                ed.refresh_layout(shaper);
                let outcome = handle_key(ed, k);
                trace!(target: "editor.dispatch", key = %k, ?outcome, "key");
                match outcome {
                    KeyOutcome::Submit => {
                        flush_change(ed);
                        ed.events.push(EditorEvent::Submit);
                        let dropped = events.len() - i - 1;
                        debug!(target: "editor.dispatch", dropped, "submit");
                        return;
                    }
                    KeyOutcome::Boundary(b) => ed.events.push(b),
                    KeyOutcome::Handled => {
                        ed.caret_scroll = true;
                        ed.scroller.stop();
                    }
                    KeyOutcome::Ignored => {}
                }
            }
            InputEvent::TextCommit(text) if ed.focused => {
                trace!(
                    target: "editor.dispatch",
                    len = text.len(),
                    clusters = normalize::cluster_count(text),
                    "text_commit"
                );
                ed.caret_scroll = true;
                ed.scroller.stop();
                ed.insert_text(text);
            }
            InputEvent::Key(_) | InputEvent::TextCommit(_) => {}
        }
    }
    flush_change(ed);
}

fn flush_change(ed: &mut Editor) {
    if ed.buffer.take_changed() {
        ed.events.push(EditorEvent::Change);
    }
}

/// Resolve a named key against a fresh layout.
fn handle_key(ed: &mut Editor, k: &KeyEvent) -> KeyOutcome {
    let enter = matches!(k.key, NamedKey::Enter | NamedKey::Return);
    if enter && ed.opts.submit && k.mods.contains(ed.opts.submit_modifier) {
        return KeyOutcome::Submit;
    }
    let pos = ed.caret_position();
    let last = ed.cache.lines().len().saturating_sub(1);
    let at_start = ed.buffer.caret() == 0;
    let at_end = ed.buffer.caret() == ed.buffer.len();
    let boundary = match k.key {
        NamedKey::Up if pos.line == 0 => Some(EditorEvent::Up),
        NamedKey::Left if at_start => Some(EditorEvent::Up),
        NamedKey::Down if pos.line == last => Some(EditorEvent::Down),
        NamedKey::Right if at_end => Some(EditorEvent::Down),
        _ => None,
    };
    if let Some(b) = boundary {
        return KeyOutcome::Boundary(b);
    }
    if command(ed, k) {
        KeyOutcome::Handled
    } else {
        KeyOutcome::Ignored
    }
}

fn command(ed: &mut Editor, k: &KeyEvent) -> bool {
    let shift = k.mods.contains(ModMask::SHIFT);
    let view = ed.scroll.view();
    match k.key {
        NamedKey::Enter | NamedKey::Return => ed.insert_text("\n"),
        NamedKey::Backspace => {
            ed.buffer.delete_before();
            ed.edited();
        }
        NamedKey::Delete => {
            ed.buffer.delete_after();
            ed.edited();
        }
        NamedKey::Up | NamedKey::Down => {
            if shift {
                ed.mark_anchor();
            }
            let pos = ed.caret_position();
            let step = if k.key == NamedKey::Up { -1 } else { 1 };
            let nav = navigator(&ed.cache, &ed.opts, view);
            ed.remembered =
                nav.move_to_line(&mut ed.buffer, pos.x + ed.remembered, pos.line as isize + step);
        }
        NamedKey::Left | NamedKey::Right => {
            if shift {
                ed.mark_anchor();
            } else {
                ed.anchor = None;
            }
            if k.key == NamedKey::Left {
                ed.buffer.move_left();
            } else {
                ed.buffer.move_right();
            }
            ed.remembered = Fixed::ZERO;
        }
        NamedKey::PageUp | NamedKey::PageDown => {
            let pages = if k.key == NamedKey::PageUp { -1 } else { 1 };
            let nav = navigator(&ed.cache, &ed.opts, view);
            ed.remembered = nav.move_pages(&mut ed.buffer, pages, view.height, ed.remembered);
        }
        NamedKey::Home => {
            ed.remembered = navigator(&ed.cache, &ed.opts, view).move_start(&mut ed.buffer);
        }
        NamedKey::End => {
            ed.remembered = navigator(&ed.cache, &ed.opts, view).move_end(&mut ed.buffer);
        }
        NamedKey::Esc | NamedKey::Tab | NamedKey::Insert | NamedKey::F(_) => return false,
    }
    true
}
