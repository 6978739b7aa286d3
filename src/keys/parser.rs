use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::{NoteError, Result};

/// Parses strings such as `Ctrl+Shift+n` or `Cmd+\` into a key event.
pub fn parse_key(input: &str) -> Result<KeyEvent> {
    let parts: Vec<&str> = input.split('+').collect();
    let mut modifiers = KeyModifiers::NONE;
    let mut key_part = None;

    for (i, part) in parts.iter().enumerate() {
        let normalized = part.trim();
        match normalized.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" | "option" => modifiers |= KeyModifiers::ALT,
            "cmd" | "super" | "meta" => modifiers |= KeyModifiers::SUPER,
            _ => {
                if i == parts.len() - 1 {
                    key_part = Some(normalized);
                } else {
                    return Err(NoteError::Config(format!(
                        "Unknown modifier '{}' in key '{}'",
                        normalized, input
                    )));
                }
            }
        }
    }

    let key_str = key_part
        .filter(|k| !k.is_empty())
        .ok_or_else(|| NoteError::Config(format!("No key code found in '{}'", input)))?;

    let code = parse_key_code(key_str)?;

    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    match s.to_lowercase().as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "space" => Ok(KeyCode::Char(' ')),
        "backslash" => Ok(KeyCode::Char('\\')),
        s if s.starts_with('f') && s.len() > 1 => {
            let num: u8 = s[1..]
                .parse()
                .map_err(|_| NoteError::Config(format!("Invalid function key: {}", s)))?;
            if !(1..=12).contains(&num) {
                return Err(NoteError::Config(format!(
                    "Function key out of range: F{}",
                    num
                )));
            }
            Ok(KeyCode::F(num))
        }
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(KeyCode::Char(ch)),
                _ => Err(NoteError::Config(format!("Unknown key: {}", s))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_char() {
        let key = parse_key("s").unwrap();
        assert_eq!(key.code, KeyCode::Char('s'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn parse_ctrl_shift_combo() {
        let key = parse_key("Ctrl+Shift+n").unwrap();
        assert_eq!(key.code, KeyCode::Char('n'));
        assert_eq!(key.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
    }

    #[test]
    fn parse_cmd_aliases_to_super() {
        for input in ["Cmd+e", "Super+e", "Meta+e"] {
            let key = parse_key(input).unwrap();
            assert_eq!(key.code, KeyCode::Char('e'));
            assert_eq!(key.modifiers, KeyModifiers::SUPER);
        }
    }

    #[test]
    fn parse_backslash_forms() {
        assert_eq!(parse_key("Cmd+\\").unwrap().code, KeyCode::Char('\\'));
        assert_eq!(parse_key("Ctrl+Backslash").unwrap().code, KeyCode::Char('\\'));
    }

    #[test]
    fn parse_special_keys() {
        assert_eq!(parse_key("Delete").unwrap().code, KeyCode::Delete);
        assert_eq!(parse_key("Esc").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key("Space").unwrap().code, KeyCode::Char(' '));
        assert_eq!(parse_key("F2").unwrap().code, KeyCode::F(2));
    }

    #[test]
    fn parse_case_insensitive_modifiers() {
        let key = parse_key("ctrl+ALT+k").unwrap();
        assert_eq!(key.modifiers, KeyModifiers::CONTROL | KeyModifiers::ALT);
    }

    #[test]
    fn parse_invalid_key_returns_error() {
        assert!(parse_key("").is_err());
        assert!(parse_key("Ctrl+").is_err());
        assert!(parse_key("F13").is_err());
        assert!(parse_key("Hyper+x").is_err());
        assert!(parse_key("Ctrl+nope").is_err());
    }
}
