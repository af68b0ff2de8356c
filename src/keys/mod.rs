pub mod parser;
pub mod preset;

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::{AssistError, Result};
use crate::suggest::MenuKey;
use preset::{get_preset, Action};

pub struct KeybindingMap {
    bindings: HashMap<KeyEvent, Action>,
}

impl KeybindingMap {
    pub fn from_preset(name: &str, overrides: &HashMap<String, String>) -> Result<Self> {
        let mut bindings = get_preset(name)
            .ok_or_else(|| AssistError::Config(format!("Unknown keybinding preset: {name}")))?;

        for (action_name, key_str) in overrides {
            let action = Action::from_str(action_name)
                .ok_or_else(|| AssistError::Config(format!("Unknown action: {action_name}")))?;
            let key_event = parser::parse_key(key_str)?;

            bindings.retain(|_, v| *v != action);
            bindings.insert(key_event, action);
        }

        Ok(Self { bindings })
    }

    /// Looks a key up by code and modifiers only; kind and state flags are ignored.
    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Translates a key for an open popup. Navigation follows the cursor bindings,
    /// so emacs users get Ctrl+p/Ctrl+n in the menu too.
    pub fn menu_key(&self, key: &KeyEvent) -> MenuKey {
        if key.code == KeyCode::Esc && key.modifiers == KeyModifiers::NONE {
            return MenuKey::Escape;
        }
        match self.resolve(key) {
            Some(Action::CursorUp) => MenuKey::ArrowUp,
            Some(Action::CursorDown) => MenuKey::ArrowDown,
            Some(Action::SplitBlock) => MenuKey::Enter,
            _ => MenuKey::Other,
        }
    }

    pub fn hints(&self) -> Vec<(String, &'static str)> {
        let important = [
            Action::Quit,
            Action::Help,
            Action::ExitBlock,
            Action::TogglePaste,
        ];

        let mut hints = Vec::new();
        for action in important {
            let mut keys: Vec<&KeyEvent> = self
                .bindings
                .iter()
                .filter(|(_, a)| **a == action)
                .map(|(k, _)| k)
                .collect();
            keys.sort_by_key(|k| format_key_event(k));
            if let Some(key_event) = keys.first() {
                hints.push((format_key_event(key_event), action.hint_text()));
            }
        }
        hints
    }
}

pub fn format_key_event(key: &KeyEvent) -> String {
    let mut parts = Vec::new();

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift".to_string());
    }

    let key_str = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    };
    parts.push(key_str);

    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn default_map() -> KeybindingMap {
        KeybindingMap::from_preset("default", &HashMap::new()).unwrap()
    }

    #[test]
    fn resolves_enter_to_split_block() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(default_map().resolve(&key), Some(Action::SplitBlock));
    }

    #[test]
    fn resolve_ignores_event_kind_and_state() {
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Repeat;
        key.state = KeyEventState::NUM_LOCK;
        assert_eq!(default_map().resolve(&key), Some(Action::Quit));
    }

    #[test]
    fn override_replaces_existing_binding() {
        let mut overrides = HashMap::new();
        overrides.insert("quit".into(), "Ctrl+x".into());
        let map = KeybindingMap::from_preset("default", &overrides).unwrap();

        let old_key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(map.resolve(&old_key), None);
        let new_key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(map.resolve(&new_key), Some(Action::Quit));
    }

    #[test]
    fn unknown_preset_or_action_is_an_error() {
        assert!(KeybindingMap::from_preset("vim", &HashMap::new()).is_err());

        let mut overrides = HashMap::new();
        overrides.insert("search".into(), "Ctrl+s".into());
        assert!(KeybindingMap::from_preset("default", &overrides).is_err());
    }

    #[test]
    fn menu_keys_follow_cursor_bindings() {
        let map = KeybindingMap::from_preset("emacs", &HashMap::new()).unwrap();
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(map.menu_key(&ctrl_n), MenuKey::ArrowDown);
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(map.menu_key(&up), MenuKey::ArrowUp);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(map.menu_key(&enter), MenuKey::Enter);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(map.menu_key(&esc), MenuKey::Escape);
        let a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(map.menu_key(&a), MenuKey::Other);
    }

    #[test]
    fn shift_enter_is_not_a_menu_commit() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(default_map().menu_key(&key), MenuKey::Other);
    }

    #[test]
    fn hints_pick_a_stable_key_per_action() {
        let hints = default_map().hints();
        assert!(hints.contains(&("Ctrl+q".to_string(), "quit")));
        assert!(hints.contains(&("Alt+Enter".to_string(), "exit block")));
        assert!(hints.contains(&("F1".to_string(), "help")));
    }

    #[test]
    fn format_key_event_combos() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(format_key_event(&key), "Ctrl+c");
        let key = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(format_key_event(&key), "↑");
        let key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(format_key_event(&key), "Space");
    }
}
