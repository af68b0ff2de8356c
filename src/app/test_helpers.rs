use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::input::handle_key;
use super::AppState;
use crate::config::AppConfig;
use crate::keys::KeybindingMap;
use crate::mention::Member;

pub fn test_state() -> AppState {
    let mut config = AppConfig::default();
    config.mention.members = vec![
        Member::new("u1", "Ada Lovelace"),
        Member::new("u2", "Grace Hopper"),
        Member::new("u3", "Alan Turing"),
    ];
    AppState::new(&config, "test.md", vec![], None)
}

pub fn test_keymap() -> KeybindingMap {
    KeybindingMap::from_preset("default", &HashMap::new()).unwrap()
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn type_str(state: &mut AppState, keys: &KeybindingMap, text: &str) {
    for c in text.chars() {
        handle_key(state, &key(KeyCode::Char(c)), keys);
    }
}
