//! Line-oriented input scripts for the demo host.
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! focus
//! text hello\nworld      # \n, \t and \\ escapes
//! key shift+enter
//! click 25 5 [shift]
//! touch press 10 100     # press | drag | release | cancel
//! scroll 30 [dx]
//! frame                  # deliver everything queued so far
//! wait 100               # advance the clock (ms)
//! resize 200 48
//! set replacement text   # host-side set_text
//! blur
//! ```

use core_events::{KeyEvent, ModMask, NamedKey, PointerKind};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: `{command}` is missing an argument")]
    MissingArgument { line: usize, command: String },

    #[error("line {line}: `{value}` is not a number")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: unknown key `{key}`")]
    UnknownKey { line: usize, key: String },

    #[error("line {line}: unknown modifier `{modifier}`")]
    UnknownModifier { line: usize, modifier: String },

    #[error("line {line}: unknown touch phase `{phase}`")]
    UnknownTouch { line: usize, phase: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Text(String),
    Key(KeyEvent),
    Click { x: f32, y: f32, mods: ModMask },
    Touch { kind: PointerKind, x: f32, y: f32 },
    Scroll { dx: f32, dy: f32 },
    Focus,
    Blur,
    Frame,
    Wait(Duration),
    Resize { width: u32, height: u32 },
    Set(String),
}

/// Parse a whole script. Blank lines and comments are skipped.
pub fn parse(src: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let body = strip_comment(raw).trim();
        if body.is_empty() {
            continue;
        }
        let (command, rest) = match body.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (body, ""),
        };
        steps.push(parse_step(line, command, rest)?);
    }
    Ok(steps)
}

fn parse_step(line: usize, command: &str, rest: &str) -> Result<Step, ScriptError> {
    let mut args = rest.split_whitespace();
    let mut arg = || {
        args.next().ok_or_else(|| ScriptError::MissingArgument {
            line,
            command: command.to_string(),
        })
    };
    let step = match command {
        "text" => Step::Text(unescape(rest)),
        "set" => Step::Set(unescape(rest)),
        "key" => Step::Key(parse_key(line, arg()?)?),
        "click" => {
            let x = number(line, arg()?)?;
            let y = number(line, arg()?)?;
            let mods = match rest.split_whitespace().nth(2) {
                Some(m) => parse_mods(line, m)?,
                None => ModMask::empty(),
            };
            Step::Click { x, y, mods }
        }
        "touch" => {
            let phase = arg()?;
            let kind = match phase {
                "press" => PointerKind::Press,
                "drag" => PointerKind::Drag,
                "release" => PointerKind::Release,
                "cancel" => PointerKind::Cancel,
                other => {
                    return Err(ScriptError::UnknownTouch {
                        line,
                        phase: other.to_string(),
                    });
                }
            };
            let (x, y) = if kind == PointerKind::Cancel {
                (0.0, 0.0)
            } else {
                (number(line, arg()?)?, number(line, arg()?)?)
            };
            Step::Touch { kind, x, y }
        }
        "scroll" => {
            let dy = number(line, arg()?)?;
            let dx = match rest.split_whitespace().nth(1) {
                Some(v) => number(line, v)?,
                None => 0.0,
            };
            Step::Scroll { dx, dy }
        }
        "focus" => Step::Focus,
        "blur" => Step::Blur,
        "frame" => Step::Frame,
        "wait" => Step::Wait(Duration::from_millis(number(line, arg()?)?)),
        "resize" => Step::Resize {
            width: number(line, arg()?)?,
            height: number(line, arg()?)?,
        },
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    Ok(step)
}

/// Drop a trailing `# comment` unless the `#` is escaped.
fn strip_comment(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1] != b'\\') {
            return &raw[..i];
        }
    }
    raw
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn number<T: std::str::FromStr>(line: usize, s: &str) -> Result<T, ScriptError> {
    s.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: s.to_string(),
    })
}

fn parse_mods(line: usize, s: &str) -> Result<ModMask, ScriptError> {
    let mut mods = ModMask::empty();
    for part in s.split('+') {
        mods |= modifier(line, part)?;
    }
    Ok(mods)
}

fn modifier(line: usize, s: &str) -> Result<ModMask, ScriptError> {
    Ok(match s.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => ModMask::CTRL,
        "alt" => ModMask::ALT,
        "shift" => ModMask::SHIFT,
        "meta" | "cmd" => ModMask::META,
        "super" => ModMask::SUPER,
        _ => {
            return Err(ScriptError::UnknownModifier {
                line,
                modifier: s.to_string(),
            });
        }
    })
}

/// `shift+enter`, `pagedown`, `ctrl+f5`: modifiers first, key last.
fn parse_key(line: usize, s: &str) -> Result<KeyEvent, ScriptError> {
    let mut parts: Vec<&str> = s.split('+').collect();
    let name = parts.pop().unwrap_or_default();
    let mut mods = ModMask::empty();
    for m in parts {
        mods |= modifier(line, m)?;
    }
    let lower = name.to_ascii_lowercase();
    let key = match lower.as_str() {
        "enter" => NamedKey::Enter,
        "return" => NamedKey::Return,
        "esc" | "escape" => NamedKey::Esc,
        "backspace" => NamedKey::Backspace,
        "delete" | "del" => NamedKey::Delete,
        "tab" => NamedKey::Tab,
        "insert" => NamedKey::Insert,
        "up" => NamedKey::Up,
        "down" => NamedKey::Down,
        "left" => NamedKey::Left,
        "right" => NamedKey::Right,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        "pageup" => NamedKey::PageUp,
        "pagedown" => NamedKey::PageDown,
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n) if (1..=24).contains(&n) => NamedKey::F(n),
            _ => {
                return Err(ScriptError::UnknownKey {
                    line,
                    key: name.to_string(),
                });
            }
        },
        _ => {
            return Err(ScriptError::UnknownKey {
                line,
                key: name.to_string(),
            });
        }
    };
    Ok(KeyEvent::new(key, mods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_typical_session() {
        let src = "\
# open and type
focus
text hello\\nworld   # two lines
key shift+enter
click 25 5
frame
wait 100
";
        let steps = parse(src).unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Focus,
                Step::Text("hello\nworld".to_string()),
                Step::Key(KeyEvent::new(NamedKey::Enter, ModMask::SHIFT)),
                Step::Click {
                    x: 25.0,
                    y: 5.0,
                    mods: ModMask::empty()
                },
                Step::Frame,
                Step::Wait(Duration::from_millis(100)),
            ]
        );
    }

    #[test]
    fn key_names_and_modifiers() {
        let steps = parse("key PageDown\nkey ctrl+alt+f5\nkey Return").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Key(KeyEvent::plain(NamedKey::PageDown)),
                Step::Key(KeyEvent::new(NamedKey::F(5), ModMask::CTRL | ModMask::ALT)),
                Step::Key(KeyEvent::plain(NamedKey::Return)),
            ]
        );
    }

    #[test]
    fn pointer_commands() {
        let steps = parse("click 1 2 shift\ntouch drag 3 4\ntouch cancel\nscroll -16 4").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Click {
                    x: 1.0,
                    y: 2.0,
                    mods: ModMask::SHIFT
                },
                Step::Touch {
                    kind: PointerKind::Drag,
                    x: 3.0,
                    y: 4.0
                },
                Step::Touch {
                    kind: PointerKind::Cancel,
                    x: 0.0,
                    y: 0.0
                },
                Step::Scroll { dx: 4.0, dy: -16.0 },
            ]
        );
    }

    #[test]
    fn escapes_keep_literal_hash_and_spaces() {
        let steps = parse("text a\\#b\\s\nset x\\\\y").unwrap();
        assert_eq!(
            steps,
            vec![Step::Text("a#b ".to_string()), Step::Set("x\\y".to_string())]
        );
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(
            parse("focus\njump 3"),
            Err(ScriptError::UnknownCommand {
                line: 2,
                command: "jump".to_string()
            })
        );
        assert_eq!(
            parse("\n\nclick 4"),
            Err(ScriptError::MissingArgument {
                line: 3,
                command: "click".to_string()
            })
        );
        assert_eq!(
            parse("wait soon"),
            Err(ScriptError::InvalidNumber {
                line: 1,
                value: "soon".to_string()
            })
        );
        assert_eq!(
            parse("key hyper+up"),
            Err(ScriptError::UnknownModifier {
                line: 1,
                modifier: "hyper".to_string()
            })
        );
        assert_eq!(
            parse("key f99"),
            Err(ScriptError::UnknownKey {
                line: 1,
                key: "f99".to_string()
            })
        );
        assert_eq!(
            parse("touch hover 1 1"),
            Err(ScriptError::UnknownTouch {
                line: 1,
                phase: "hover".to_string()
            })
        );
    }

    #[test]
    fn error_messages_render() {
        let err = parse("resize 10").unwrap_err();
        assert_eq!(err.to_string(), "line 1: `resize` is missing an argument");
    }
}
