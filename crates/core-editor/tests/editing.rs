mod common;

use common::{Harness, LINE, capture_logs, press, press_with, text};
use core_editor::{Anchor, EditorOptions};
use core_events::{Clock, EditorEvent, InputEvent, ModMask, NamedKey, PointerEvent};
use pretty_assertions::assert_eq;
use tracing::Level;

fn focused() -> Harness {
    Harness::focused(EditorOptions::default(), 200, 160)
}

#[test]
fn insert_then_backspace_restores_text_and_caret() {
    let mut h = focused();
    h.load("hello", 2);
    h.type_text("X");
    assert_eq!(h.editor.text(), "heXllo");
    assert_eq!(h.editor.caret(), 3);
    h.press(NamedKey::Backspace);
    assert_eq!(h.editor.text(), "hello");
    assert_eq!(h.editor.caret(), 2);
}

#[test]
fn delete_removes_rune_after_caret() {
    let mut h = focused();
    h.load("a漢b", 1);
    h.press(NamedKey::Delete);
    assert_eq!(h.editor.text(), "ab");
    assert_eq!(h.editor.caret(), 1);
}

#[test]
fn set_text_empty_reads_back_empty() {
    let mut h = focused();
    h.load("something", 4);
    h.editor.set_text("");
    assert_eq!(h.editor.text(), "");
    assert_eq!(h.editor.len(), 0);
    h.idle();
    assert_eq!(h.editor.lines().len(), 1);
    assert_eq!(h.editor.caret(), 0);
}

#[test]
fn host_set_text_reports_one_change() {
    let mut h = Harness::multi_line(200, 160);
    h.editor.set_text("abc");
    h.frame(vec![InputEvent::FocusGained]);
    assert_eq!(h.drain(), vec![EditorEvent::Change]);
    h.idle();
    assert_eq!(h.drain(), vec![]);
    h.editor.set_text("x");
    h.editor.set_text("yz");
    h.idle();
    assert_eq!(h.drain(), vec![EditorEvent::Change]);
    assert_eq!(h.editor.text(), "yz");
}

#[test]
fn up_on_first_line_emits_up_without_moving() {
    let mut h = focused();
    h.load("ab\ncd", 1);
    h.press(NamedKey::Up);
    assert_eq!(h.drain(), vec![EditorEvent::Up]);
    assert_eq!(h.editor.text(), "ab\ncd");
    assert_eq!(h.editor.caret(), 1);
}

#[test]
fn left_at_start_emits_up_and_right_at_end_emits_down() {
    let mut h = focused();
    h.load("ab\ncd", 0);
    h.press(NamedKey::Left);
    assert_eq!(h.drain(), vec![EditorEvent::Up]);
    assert_eq!(h.editor.caret(), 0);

    h.load("ab\ncd", 5);
    h.press(NamedKey::Right);
    assert_eq!(h.drain(), vec![EditorEvent::Down]);
    assert_eq!(h.editor.caret(), 5);
}

#[test]
fn down_on_last_line_emits_down() {
    let mut h = focused();
    h.load("ab\ncd", 3);
    h.press(NamedKey::Down);
    assert_eq!(h.drain(), vec![EditorEvent::Down]);
    assert_eq!(h.editor.caret(), 3);
}

#[test]
fn left_inside_text_moves_without_boundary_event() {
    let mut h = focused();
    h.load("ab\ncd", 3);
    h.press(NamedKey::Left);
    assert_eq!(h.drain(), vec![]);
    assert_eq!(h.editor.caret(), 2);
}

#[test]
fn shift_enter_submits_without_inserting_a_break() {
    let mut h = focused();
    h.frame(vec![text("line1"), press_with(NamedKey::Enter, ModMask::SHIFT)]);
    let events = h.drain();
    assert_eq!(events, vec![EditorEvent::Change, EditorEvent::Submit]);
    assert_eq!(events.iter().filter(|e| **e == EditorEvent::Submit).count(), 1);
    assert_eq!(h.editor.text(), "line1");
}

#[test]
fn shift_enter_inserts_break_when_submit_disabled() {
    let opts = EditorOptions {
        submit: false,
        ..EditorOptions::default()
    };
    let mut h = Harness::focused(opts, 200, 160);
    h.frame(vec![text("line1"), press_with(NamedKey::Enter, ModMask::SHIFT)]);
    assert_eq!(h.drain(), vec![EditorEvent::Change]);
    assert_eq!(h.editor.text(), "line1\n");
}

#[test]
fn plain_enter_inserts_break_in_submit_mode() {
    let mut h = focused();
    h.type_text("a");
    h.frame(vec![press(NamedKey::Return), text("b")]);
    assert_eq!(h.editor.text(), "a\nb");
}

#[test]
fn submit_modifier_is_configurable() {
    let opts = EditorOptions {
        submit_modifier: ModMask::CTRL,
        ..EditorOptions::default()
    };
    let mut h = Harness::focused(opts, 200, 160);
    h.press_with(NamedKey::Enter, ModMask::SHIFT);
    assert_eq!(h.editor.text(), "\n");
    h.drain();
    h.press_with(NamedKey::Enter, ModMask::CTRL);
    assert_eq!(h.drain(), vec![EditorEvent::Submit]);
    assert_eq!(h.editor.text(), "\n");
}

#[test]
fn submit_discards_rest_of_frame() {
    let mut h = focused();
    h.frame(vec![press_with(NamedKey::Enter, ModMask::SHIFT), text("x")]);
    assert_eq!(h.drain(), vec![EditorEvent::Submit]);
    assert_eq!(h.editor.text(), "");
}

#[test]
fn undrained_submit_is_kept_for_one_extra_frame() {
    let mut h = focused();
    h.press_with(NamedKey::Enter, ModMask::SHIFT);
    h.idle();
    assert_eq!(h.drain(), vec![EditorEvent::Submit]);

    h.press_with(NamedKey::Enter, ModMask::SHIFT);
    h.idle();
    h.idle();
    assert_eq!(h.drain(), vec![]);
}

#[test]
fn single_line_strips_breaks() {
    let opts = EditorOptions {
        single_line: true,
        ..EditorOptions::default()
    };
    let mut h = Harness::focused(opts, 100, LINE);
    h.type_text("a\nb");
    assert_eq!(h.editor.text(), "ab");
    h.type_text("\r\n");
    assert_eq!(h.editor.text(), "ab");
    h.press(NamedKey::Enter);
    assert_eq!(h.editor.text(), "ab");
    h.editor.set_text("x\ny");
    assert_eq!(h.editor.text(), "xy");
    h.idle();
    assert_eq!(h.editor.lines().len(), 1);
}

#[test]
fn at_most_one_change_per_frame() {
    let mut h = focused();
    h.frame(vec![text("a"), text("b"), press(NamedKey::Backspace), text("c")]);
    assert_eq!(h.drain(), vec![EditorEvent::Change]);
    assert_eq!(h.editor.text(), "ac");
}

#[test]
fn noop_delete_reports_no_change() {
    let mut h = focused();
    h.press(NamedKey::Backspace);
    h.press(NamedKey::Delete);
    assert_eq!(h.drain(), vec![]);
}

#[test]
fn unknown_keys_are_ignored() {
    let mut h = focused();
    h.load("ab", 1);
    h.frame(vec![
        press(NamedKey::Tab),
        press(NamedKey::Esc),
        press(NamedKey::F(5)),
        press(NamedKey::Insert),
    ]);
    assert_eq!(h.drain(), vec![]);
    assert_eq!(h.editor.text(), "ab");
    assert_eq!(h.editor.caret(), 1);
}

#[test]
fn text_commits_are_inserted_verbatim() {
    let mut h = focused();
    h.load("ab", 2);
    h.type_text("e\u{301}");
    assert_eq!(h.editor.text(), "abe\u{301}");
    assert_eq!(h.editor.caret(), 5);
    h.press(NamedKey::Backspace);
    h.press(NamedKey::Backspace);
    assert_eq!(h.editor.text(), "ab");
    assert_eq!(h.editor.caret(), 2);

    h.type_text("\u{F900}");
    assert_eq!(h.editor.text().as_bytes(), "ab\u{F900}".as_bytes());
}

#[test]
fn keyboard_ignored_while_unfocused() {
    let mut h = Harness::multi_line(200, 160);
    h.frame(vec![text("abc"), press(NamedKey::Enter)]);
    assert_eq!(h.editor.text(), "");
    assert_eq!(h.drain(), vec![]);
    h.frame(vec![InputEvent::FocusGained, text("abc"), InputEvent::FocusLost, text("d")]);
    assert_eq!(h.editor.text(), "abc");
    assert!(!h.editor.is_focused());
}

#[test]
fn click_while_unfocused_moves_caret_and_requests_focus() {
    let mut h = Harness::multi_line(200, 160);
    h.editor.set_text("abc");
    h.idle();
    let out = h.click(25.0, 5.0);
    assert_eq!(h.editor.caret(), 2);
    assert!(out.focus_requested);
    assert!(!h.idle().focus_requested);
}

#[test]
fn focus_call_is_reported_once() {
    let mut h = Harness::multi_line(200, 160);
    h.editor.focus();
    assert!(h.idle().focus_requested);
    assert!(!h.idle().focus_requested);
}

#[test]
fn shift_arrows_track_anchor_and_plain_arrows_clear_it() {
    let mut h = focused();
    h.load("abc\ndef", 2);
    h.press_with(NamedKey::Left, ModMask::SHIFT);
    assert_eq!(h.editor.selection_anchor(), Some(Anchor { col: 2, line: 0 }));
    assert_eq!(h.editor.caret(), 1);
    h.press_with(NamedKey::Down, ModMask::SHIFT);
    assert_eq!(h.editor.selection_anchor(), Some(Anchor { col: 2, line: 0 }));
    assert!(!h.editor.has_selection());
    h.press(NamedKey::Right);
    assert_eq!(h.editor.selection_anchor(), None);
}

#[test]
fn shift_click_sets_anchor_at_previous_caret() {
    let mut h = focused();
    h.load("abc\ndef", 1);
    let now = h.clock.now();
    let ev = PointerEvent::mouse_press(25.0, 20.0, now).with_mods(ModMask::SHIFT);
    h.frame_with(vec![ev], vec![]);
    assert_eq!(h.editor.selection_anchor(), Some(Anchor { col: 1, line: 0 }));
    assert_eq!(h.editor.caret(), 6);
    assert!(!h.editor.has_selection());
}

#[test]
fn logs_never_carry_text() {
    let mut h = focused();
    let log = capture_logs(Level::TRACE, || {
        h.frame(vec![text("secret"), press_with(NamedKey::Enter, ModMask::SHIFT)]);
    });
    assert!(log.contains("editor.dispatch"));
    assert!(log.contains("text_commit"));
    assert!(log.contains("len=6"));
    assert!(log.contains("submit"));
    assert!(!log.contains("secret"));
}
