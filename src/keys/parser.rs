use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::{AssistError, Result};

/// Parses a binding such as `Ctrl+Shift+k`, `Alt+Enter` or `F1`.
pub fn parse_key(input: &str) -> Result<KeyEvent> {
    let input = input.trim();
    let (mods, key) = match input.strip_suffix("++") {
        Some(rest) => (rest, "+"),
        None => match input.rsplit_once('+') {
            Some((mods, key)) => (mods, key.trim()),
            None => ("", input),
        },
    };
    if key.is_empty() {
        return Err(AssistError::Config(format!("No key code found in '{input}'")));
    }

    let mut modifiers = KeyModifiers::NONE;
    for part in mods.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" | "meta" | "option" => KeyModifiers::ALT,
            _ => {
                return Err(AssistError::Config(format!(
                    "Unknown modifier '{part}' in key '{input}'"
                )))
            }
        };
    }

    Ok(KeyEvent::new(parse_key_code(key)?, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    let lower = s.to_lowercase();
    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" | "bs" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" | "↑" => KeyCode::Up,
        "down" | "↓" => KeyCode::Down,
        "left" | "←" => KeyCode::Left,
        "right" | "→" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        f if f.len() > 1 && f.starts_with('f') && f[1..].chars().all(|c| c.is_ascii_digit()) => {
            match f[1..].parse::<u8>() {
                Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
                _ => return Err(AssistError::Config(format!("Function key out of range: {s}"))),
            }
        }
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(AssistError::Config(format!("Unknown key: {s}"))),
            }
        }
    };
    Ok(code)
}
